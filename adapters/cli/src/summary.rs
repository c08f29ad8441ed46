use std::fmt;

use corridor_defence_core::Event;

/// Running totals gathered from the events of a headless session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) waves_started: u32,
    pub(crate) waves_cleared: u32,
    pub(crate) spawned: u32,
    pub(crate) spawns_rejected: u32,
    pub(crate) killed: u32,
    pub(crate) leaked: u32,
    pub(crate) fired: u32,
    pub(crate) hits: u32,
    pub(crate) expired: u32,
    pub(crate) destroyed: bool,
}

impl Tally {
    /// Folds a batch of events into the totals.
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveStarted { .. } => self.waves_started += 1,
                Event::WaveCleared { .. } => self.waves_cleared += 1,
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::SpawnRejected { .. } => self.spawns_rejected += 1,
                Event::EnemyKilled { .. } => self.killed += 1,
                Event::EnemyReachedObjective { enemy, damage } => {
                    self.leaked += 1;
                    log::debug!("enemy {} reached the objective for {damage}", enemy.get());
                }
                Event::ProjectileFired { .. } => self.fired += 1,
                Event::EnemyHit { .. } => self.hits += 1,
                Event::ProjectileExpired { .. } => self.expired += 1,
                Event::ObjectiveDestroyed => self.destroyed = true,
                _ => {}
            }
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "waves: {} started, {} cleared",
            self.waves_started, self.waves_cleared
        )?;
        writeln!(
            f,
            "enemies: {} spawned, {} killed, {} reached the objective, {} rejected",
            self.spawned, self.killed, self.leaked, self.spawns_rejected
        )?;
        write!(
            f,
            "projectiles: {} fired, {} hits, {} expired",
            self.fired, self.hits, self.expired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_defence_core::{EnemyId, Health, ProjectileId, TowerId, WaveNumber};

    #[test]
    fn counts_combat_and_wave_events() {
        let mut tally = Tally::default();
        tally.record(&[
            Event::WaveStarted {
                wave: WaveNumber::new(1),
            },
            Event::ProjectileFired {
                projectile: ProjectileId::new(0),
                tower: TowerId::new(0),
            },
            Event::EnemyHit {
                enemy: EnemyId::new(0),
                projectile: ProjectileId::new(0),
                damage: 3,
                remaining: Health::new(0),
            },
            Event::EnemyKilled {
                enemy: EnemyId::new(0),
            },
            Event::EnemyReachedObjective {
                enemy: EnemyId::new(1),
                damage: 10,
            },
            Event::SelectionCleared,
        ]);

        assert_eq!(tally.waves_started, 1);
        assert_eq!(tally.fired, 1);
        assert_eq!(tally.hits, 1);
        assert_eq!(tally.killed, 1);
        assert_eq!(tally.leaked, 1);
        assert!(!tally.destroyed);
    }

    #[test]
    fn destroyed_objective_is_remembered() {
        let mut tally = Tally::default();
        tally.record(&[Event::ObjectiveDestroyed]);
        tally.record(&[]);

        assert!(tally.destroyed);
    }
}
