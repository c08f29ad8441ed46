#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies along the direction field.
//!
//! Enemies travel from tile centre to tile centre. They only change heading
//! after reaching a centre, so corners are taken cleanly regardless of how the
//! elapsed time is sliced into ticks.

use corridor_defence_core::{Command, DirectionFieldView, EnemyId, EnemySnapshot, EnemyView, Event};
use glam::Vec2;

/// Pure system that consumes world events and emits enemy step commands.
#[derive(Debug, Default)]
pub struct Movement {
    fresh: Vec<EnemyId>,
}

impl Movement {
    /// Creates a new movement system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Proposes one step for every enemy that moves during the tick.
    ///
    /// Enemies announced by an `EnemySpawned` event in the same batch are left
    /// in place; they start moving on the following tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        field: DirectionFieldView<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut seconds = 0.0_f32;
        self.fresh.clear();
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => seconds += dt.as_secs_f32(),
                Event::EnemySpawned { enemy, .. } => self.fresh.push(*enemy),
                _ => {}
            }
        }

        if seconds <= 0.0 || enemies.is_empty() {
            return;
        }

        for enemy in enemies.iter() {
            if self.fresh.contains(&enemy.id) {
                continue;
            }

            if let Some(step) = walk(enemy, &field, enemy.speed * seconds) {
                out.push(step);
            }
        }
    }
}

fn walk(enemy: &EnemySnapshot, field: &DirectionFieldView<'_>, distance: f32) -> Option<Command> {
    if distance <= 0.0 {
        return None;
    }

    let objective = field.objective();
    let mut remaining = distance;
    let mut cell = enemy.cell;
    let mut position = enemy.position;
    let mut heading = None;

    let waypoint_limit = (distance.ceil() as usize).saturating_add(2);
    for _ in 0..waypoint_limit {
        if remaining <= 0.0 || cell == objective {
            break;
        }

        let Some(direction) = field.heading(cell) else {
            break;
        };
        heading = Some(direction);

        let waypoint = cell.step(direction);
        let target = waypoint.center();
        let gap = position.distance(target);

        if gap <= remaining {
            position = target;
            cell = waypoint;
            remaining -= gap;
        } else {
            position += (target - position) * (remaining / gap);
            remaining = 0.0;
        }
    }

    if position == enemy.position {
        return None;
    }

    let velocity = heading.map_or(Vec2::ZERO, |direction| {
        direction.unit_vector() * enemy.speed
    });

    Some(Command::StepEnemy {
        enemy: enemy.id,
        cell,
        position,
        velocity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_defence_core::{CellCoord, Direction, EnemyKind, Health, TileGrid};
    use std::time::Duration;

    // 3x3 grid: east along the top row, then south down the right column.
    const HEADINGS: [Option<Direction>; 9] = [
        Some(Direction::East),
        Some(Direction::East),
        Some(Direction::South),
        None,
        None,
        Some(Direction::South),
        None,
        None,
        None,
    ];

    fn field() -> DirectionFieldView<'static> {
        DirectionFieldView::new(
            &HEADINGS,
            TileGrid::new(3, 3),
            Some(Direction::East),
            CellCoord::new(2, 2),
        )
    }

    fn enemy(id: u32, cell: CellCoord, position: Vec2) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::default(),
            position,
            velocity: Vec2::ZERO,
            cell,
            health: Health::new(3),
            speed: 1.0,
            size: 0.6,
        }
    }

    fn tick(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    fn steps(out: &[Command]) -> Vec<(EnemyId, CellCoord, Vec2)> {
        out.iter()
            .filter_map(|command| match command {
                Command::StepEnemy {
                    enemy,
                    cell,
                    position,
                    ..
                } => Some((*enemy, *cell, *position)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn partial_step_moves_toward_next_centre() {
        let mut movement = Movement::new();
        let start = CellCoord::new(0, 0);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, start, start.center())]);
        let mut out = Vec::new();

        movement.handle(&[tick(500)], &enemies, field(), &mut out);

        assert_eq!(steps(&out), vec![(EnemyId::new(1), start, Vec2::new(1.0, 0.5))]);
    }

    #[test]
    fn corner_is_taken_at_the_tile_centre() {
        let mut movement = Movement::new();
        let start = CellCoord::new(0, 0);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, start, start.center())]);
        let mut out = Vec::new();

        movement.handle(&[tick(2_500)], &enemies, field(), &mut out);

        let moved = steps(&out);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].1, CellCoord::new(2, 0));
        assert_eq!(moved[0].2, Vec2::new(2.5, 1.0));
        assert_eq!(
            out[0],
            Command::StepEnemy {
                enemy: EnemyId::new(1),
                cell: CellCoord::new(2, 0),
                position: Vec2::new(2.5, 1.0),
                velocity: Vec2::new(0.0, 1.0),
            }
        );
    }

    #[test]
    fn enemies_stop_at_the_objective_centre() {
        let mut movement = Movement::new();
        let start = CellCoord::new(2, 1);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, start, start.center())]);
        let mut out = Vec::new();

        movement.handle(&[tick(10_000)], &enemies, field(), &mut out);

        assert_eq!(
            steps(&out),
            vec![(EnemyId::new(1), CellCoord::new(2, 2), Vec2::new(2.5, 2.5))]
        );
    }

    #[test]
    fn freshly_spawned_enemies_hold_position() {
        let mut movement = Movement::new();
        let start = CellCoord::new(0, 0);
        let enemies = EnemyView::from_snapshots(vec![
            enemy(1, start, start.center()),
            enemy(2, start, start.center()),
        ]);
        let spawned = Event::EnemySpawned {
            enemy: EnemyId::new(2),
            kind: EnemyKind::default(),
            position: start.center(),
        };
        let mut out = Vec::new();

        movement.handle(&[tick(100), spawned], &enemies, field(), &mut out);

        let moved: Vec<_> = steps(&out).into_iter().map(|step| step.0).collect();
        assert_eq!(moved, vec![EnemyId::new(1)]);
    }

    #[test]
    fn zero_length_tick_emits_nothing() {
        let mut movement = Movement::new();
        let start = CellCoord::new(0, 0);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, start, start.center())]);
        let mut out = Vec::new();

        movement.handle(&[tick(0)], &enemies, field(), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn outside_spawn_walks_in_along_entry_heading() {
        let mut movement = Movement::new();
        let start = CellCoord::new(-1, 0);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, start, start.center())]);
        let mut out = Vec::new();

        movement.handle(&[tick(1_000)], &enemies, field(), &mut out);

        assert_eq!(
            steps(&out),
            vec![(EnemyId::new(1), CellCoord::new(0, 0), Vec2::new(0.5, 0.5))]
        );
    }

    #[test]
    fn tick_slicing_does_not_change_the_route() {
        let start = CellCoord::new(0, 0);
        let mut coarse = enemy(1, start, start.center());
        let mut fine = coarse;
        let mut movement = Movement::new();

        for (snapshot, slices) in [(&mut coarse, vec![2_250_u64]), (&mut fine, vec![250; 9])] {
            for millis in slices {
                let view = EnemyView::from_snapshots(vec![*snapshot]);
                let mut out = Vec::new();
                movement.handle(&[tick(millis)], &view, field(), &mut out);
                if let Some((_, cell, position)) = steps(&out).pop() {
                    snapshot.cell = cell;
                    snapshot.position = position;
                }
            }
        }

        assert_eq!(coarse.cell, fine.cell);
        assert!(coarse.position.distance(fine.position) < 1e-4);
        assert_eq!(coarse.cell, CellCoord::new(2, 0));
    }
}
