#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler responsible for emitting enemy spawn commands.
//!
//! The scheduler owns the ordered list of waves and a cursor into the current
//! one. Every `TimeAdvanced` event extends the elapsed wave time, after which
//! every instruction that has fallen due is released, so irregular or dropped
//! frames never starve the spawn queue.

use std::time::Duration;

use corridor_defence_core::{Command, Event, WaveError, WaveNumber, WavePhase, WavePlan};

#[derive(Clone, Debug)]
struct Wave {
    plan: WavePlan,
    cursor: usize,
    phase: WavePhase,
}

impl Wave {
    fn new(plan: WavePlan) -> Self {
        Self {
            plan,
            cursor: 0,
            phase: WavePhase::Pending,
        }
    }

    fn start(&mut self) {
        self.phase = if self.plan.is_empty() {
            WavePhase::Complete
        } else {
            WavePhase::Spawning
        };
    }

    fn drain_due(&mut self, elapsed: Duration, out: &mut Vec<Command>) {
        while let Some(instruction) = self.plan.instructions().get(self.cursor) {
            if instruction.offset() > elapsed {
                break;
            }
            out.push(Command::SpawnEnemy {
                enemy: instruction.enemy().to_owned(),
            });
            self.cursor += 1;
        }

        if self.cursor >= self.plan.len() {
            self.phase = WavePhase::Complete;
        }
    }
}

/// Pure system that releases spawn instructions as wave time elapses.
#[derive(Clone, Debug)]
pub struct WaveScheduler {
    waves: Vec<Wave>,
    current: usize,
    elapsed: Duration,
}

impl WaveScheduler {
    /// Creates a scheduler positioned at the start of the first wave.
    #[must_use]
    pub fn new(plans: Vec<WavePlan>) -> Self {
        Self {
            waves: plans.into_iter().map(Wave::new).collect(),
            current: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Consumes the tick's events and emits wave start and spawn commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        let mut ticked = false;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
                ticked = true;
            }
        }

        if !ticked {
            return;
        }

        let number = self.wave_number();
        let Some(wave) = self.waves.get_mut(self.current) else {
            return;
        };

        if wave.phase == WavePhase::Pending {
            out.push(Command::StartWave { wave: number });
            wave.start();
        }

        self.elapsed = self.elapsed.saturating_add(accumulated);

        if wave.phase == WavePhase::Spawning {
            wave.drain_due(self.elapsed, out);
            if wave.phase == WavePhase::Complete {
                log::debug!("wave {} released its last spawn", number.get());
            }
        }
    }

    /// Moves to the next wave and restarts the wave clock.
    ///
    /// The caller decides whether the current wave is finished; the scheduler
    /// only refuses when no further wave exists.
    pub fn advance(&mut self) -> Result<WaveNumber, WaveError> {
        let next = self.current + 1;
        if next >= self.waves.len() {
            return Err(WaveError::UnknownWave);
        }

        self.current = next;
        self.elapsed = Duration::ZERO;
        Ok(self.wave_number())
    }

    /// One-based number of the current wave.
    #[must_use]
    pub fn wave_number(&self) -> WaveNumber {
        WaveNumber::new(u32::try_from(self.current + 1).unwrap_or(u32::MAX))
    }

    /// Time elapsed since the current wave started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Lifecycle phase of the current wave.
    ///
    /// A scheduler without waves reports `Complete`.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        self.waves
            .get(self.current)
            .map_or(WavePhase::Complete, |wave| wave.phase)
    }

    /// Reports whether every instruction of the current wave has been emitted.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.phase() == WavePhase::Complete
    }

    /// Total number of waves known to the scheduler.
    #[must_use]
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }
}
