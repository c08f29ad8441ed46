//! Built-in level played by the command-line adapter.

use std::time::Duration;

use corridor_defence_core::{CellCoord, SpawnSequence, WavePlan};
use corridor_defence_world::LevelLayout;

/// Serpentine corridor entered from the left edge of the top row.
const TILES: [[u8; 8]; 6] = [
    [1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 0, 0, 0, 0, 0, 0],
    [0, 1, 1, 1, 1, 1, 2, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const SPAWN: CellCoord = CellCoord::new(-1, 0);

/// Assembles the demo level with three escalating waves.
pub(crate) fn level() -> LevelLayout {
    let tiles = TILES.iter().map(|row| row.to_vec()).collect();
    LevelLayout::new(tiles, SPAWN, waves())
}

fn waves() -> Vec<WavePlan> {
    let ms = Duration::from_millis;
    vec![
        WavePlan::from_sequences(&[SpawnSequence::new("basic", 5, ms(1_500), ms(0))]),
        WavePlan::from_sequences(&[
            SpawnSequence::new("basic", 6, ms(1_200), ms(0)),
            SpawnSequence::new("fast", 4, ms(1_000), ms(3_000)),
        ]),
        WavePlan::from_sequences(&[
            SpawnSequence::new("tank", 3, ms(2_500), ms(0)),
            SpawnSequence::new("fast", 6, ms(600), ms(1_000)),
            SpawnSequence::new("basic", 6, ms(900), ms(4_000)),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_defence_world::{query, World, WorldConfig};

    #[test]
    fn demo_level_builds_a_world() {
        let world = World::new(level(), WorldConfig::default()).expect("demo level is valid");

        assert_eq!(query::wave_count(&world), 3);
        assert_eq!(query::objective_cell(&world), CellCoord::new(6, 4));
    }

    #[test]
    fn demo_corridor_reaches_the_objective() {
        let world = World::new(level(), WorldConfig::default()).expect("demo level is valid");
        let field = query::direction_field(&world);

        let mut cell = SPAWN;
        for _ in 0..64 {
            if cell == field.objective() {
                break;
            }
            let Some(heading) = field.heading(cell) else {
                panic!("corridor breaks at {cell}");
            };
            cell = cell.step(heading);
        }

        assert_eq!(cell, field.objective());
    }

    #[test]
    fn every_demo_enemy_is_in_the_default_catalog() {
        let catalog = corridor_defence_core::EnemyCatalog::default();
        for plan in waves() {
            for instruction in plan.instructions() {
                assert!(catalog.resolve(instruction.enemy()).is_some());
            }
        }
    }
}
