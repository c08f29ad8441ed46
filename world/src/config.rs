//! Level data and tuning knobs injected at world construction.

use corridor_defence_core::{CellCoord, EnemyCatalog, Health, WavePlan};

/// Objective health a fresh session starts with.
pub const DEFAULT_OBJECTIVE_HEALTH: u32 = 100;

/// Travel speed of an enemy with a speed multiplier of one, in tiles per second.
pub const DEFAULT_ENEMY_SPEED: f32 = 1.0;

/// Tuning applied to every level played in a session.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    objective_health: Health,
    base_enemy_speed: f32,
    catalog: EnemyCatalog,
}

impl WorldConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub fn new(objective_health: u32, base_enemy_speed: f32, catalog: EnemyCatalog) -> Self {
        Self {
            objective_health: Health::new(objective_health),
            base_enemy_speed,
            catalog,
        }
    }

    /// Replaces the objective's starting health.
    #[must_use]
    pub fn with_objective_health(mut self, health: u32) -> Self {
        self.objective_health = Health::new(health);
        self
    }

    /// Replaces the base enemy speed.
    #[must_use]
    pub fn with_base_enemy_speed(mut self, speed: f32) -> Self {
        self.base_enemy_speed = speed;
        self
    }

    /// Replaces the enemy catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: EnemyCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Health the objective starts with.
    #[must_use]
    pub const fn objective_health(&self) -> Health {
        self.objective_health
    }

    /// Speed of an enemy with a multiplier of one, in tiles per second.
    #[must_use]
    pub const fn base_enemy_speed(&self) -> f32 {
        self.base_enemy_speed
    }

    /// Enemy types spawn instructions may refer to.
    #[must_use]
    pub fn catalog(&self) -> &EnemyCatalog {
        &self.catalog
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_OBJECTIVE_HEALTH,
            DEFAULT_ENEMY_SPEED,
            EnemyCatalog::default(),
        )
    }
}

/// In-memory level handed over by a loader.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelLayout {
    tiles: Vec<Vec<u8>>,
    spawn: CellCoord,
    waves: Vec<WavePlan>,
}

impl LevelLayout {
    /// Creates a level from row-major tile codes, a spawn point and its waves.
    #[must_use]
    pub fn new(tiles: Vec<Vec<u8>>, spawn: CellCoord, waves: Vec<WavePlan>) -> Self {
        Self {
            tiles,
            spawn,
            waves,
        }
    }

    /// Row-major tile codes.
    #[must_use]
    pub fn tiles(&self) -> &[Vec<u8>] {
        &self.tiles
    }

    /// Cell enemies spawn on; may lie outside the grid.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    /// Waves in play order.
    #[must_use]
    pub fn waves(&self) -> &[WavePlan] {
        &self.waves
    }

    pub(crate) fn into_waves(self) -> Vec<WavePlan> {
        self.waves
    }
}
