#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands for ready towers.

use corridor_defence_core::{Command, TowerCooldownView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` entries for towers whose cooldown expired.
    ///
    /// Towers fire along their kind's fixed heading, so any live enemy makes
    /// the target set non-empty. Without live enemies nothing is fired and the
    /// cooldowns stay expired until one appears.
    pub fn handle(
        &mut self,
        tower_cooldowns: &TowerCooldownView,
        live_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        if live_enemies == 0 {
            log::trace!("no live enemies, towers hold fire");
            return;
        }

        self.scratch.clear();
        self.scratch.extend(
            tower_cooldowns
                .iter()
                .filter(|snapshot| snapshot.ready_in.is_zero())
                .map(|snapshot| Command::FireProjectile {
                    tower: snapshot.tower,
                }),
        );

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_defence_core::{TowerCooldownSnapshot, TowerId, TowerKind};
    use std::time::Duration;

    fn snapshot(tower: u32, ready_in: Duration) -> TowerCooldownSnapshot {
        TowerCooldownSnapshot {
            tower: TowerId::new(tower),
            kind: TowerKind::Basic,
            ready_in,
        }
    }

    #[test]
    fn empty_target_set_suppresses_firing() {
        let mut system = TowerCombat::new();
        let cooldowns = TowerCooldownView::from_snapshots(vec![snapshot(1, Duration::ZERO)]);
        let mut out = Vec::new();

        system.handle(&cooldowns, 0, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn firing_respects_cooldown_readiness() {
        let mut system = TowerCombat::new();
        let cooldowns = TowerCooldownView::from_snapshots(vec![
            snapshot(2, Duration::ZERO),
            snapshot(3, Duration::from_millis(250)),
            snapshot(5, Duration::ZERO),
        ]);
        let mut out = Vec::new();

        system.handle(&cooldowns, 4, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireProjectile {
                    tower: TowerId::new(2),
                },
                Command::FireProjectile {
                    tower: TowerId::new(5),
                },
            ],
        );
    }

    #[test]
    fn commands_are_appended_after_existing_output() {
        let mut system = TowerCombat::new();
        let cooldowns = TowerCooldownView::from_snapshots(vec![snapshot(7, Duration::ZERO)]);
        let mut out = vec![Command::AdvanceWave];

        system.handle(&cooldowns, 1, &mut out);

        assert_eq!(
            out,
            vec![
                Command::AdvanceWave,
                Command::FireProjectile {
                    tower: TowerId::new(7),
                },
            ],
        );
    }
}
