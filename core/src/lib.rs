#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Corridor Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values for systems and
//! presentation collaborators to react to. Systems consume event streams,
//! query immutable views, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of the square collision box carried by every projectile, in tiles.
pub const PROJECTILE_SIZE: f32 = 0.25;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Marks the start of the provided wave.
    StartWave {
        /// One-based number of the wave that begins.
        wave: WaveNumber,
    },
    /// Requests that an enemy of the named type enter the corridor at the spawn point.
    SpawnEnemy {
        /// Catalog name of the enemy type.
        enemy: String,
    },
    /// Moves an enemy to a new position along the corridor.
    StepEnemy {
        /// Identifier of the enemy being moved.
        enemy: EnemyId,
        /// Last tile whose centre the enemy reached.
        cell: CellCoord,
        /// Continuous position after the step, in tile units.
        position: Vec2,
        /// Velocity the enemy travelled with during the step, in tiles per second.
        velocity: Vec2,
    },
    /// Requests that a ready tower launch a projectile.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
    },
    /// Starts placing a tower of the provided kind.
    BeginPlacement {
        /// Kind of tower that will be placed by the next placement request.
        kind: TowerKind,
    },
    /// Drops any pending placement and tower selection.
    CancelPlacement,
    /// Requests placement of a tower on the tile containing `position`.
    PlaceTower {
        /// Requested location in tile units.
        position: Vec2,
    },
    /// Requests selection of the tower on the tile containing `position`.
    SelectTower {
        /// Requested location in tile units.
        position: Vec2,
    },
    /// Requests that the next wave begins.
    AdvanceWave,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a wave began spawning.
    WaveStarted {
        /// One-based number of the wave.
        wave: WaveNumber,
    },
    /// Announces that the current wave has no pending spawns and no live enemies.
    WaveCleared {
        /// One-based number of the wave.
        wave: WaveNumber,
    },
    /// Reports that a request to advance the wave was rejected.
    WaveAdvanceRejected {
        /// Specific reason the request failed.
        reason: WaveError,
    },
    /// Confirms that an enemy entered the corridor.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Catalog entry describing the enemy.
        kind: EnemyKind,
        /// Position the enemy occupies after spawning.
        position: Vec2,
    },
    /// Reports that a spawn instruction was skipped.
    SpawnRejected {
        /// Enemy type named by the instruction.
        enemy: String,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that a projectile struck an enemy.
    EnemyHit {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Projectile that struck the enemy.
        projectile: ProjectileId,
        /// Damage applied by the hit.
        damage: u32,
        /// Health left after the hit.
        remaining: Health,
    },
    /// Confirms that an enemy ran out of health and left the corridor.
    EnemyKilled {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
    /// Confirms that an enemy reached the objective and left the corridor.
    EnemyReachedObjective {
        /// Enemy that was removed.
        enemy: EnemyId,
        /// Contact damage dealt to the objective.
        damage: u32,
    },
    /// Reports that the objective lost health.
    ObjectiveDamaged {
        /// Health removed from the objective.
        damage: u32,
        /// Health left after the damage.
        remaining: Health,
    },
    /// Announces that the objective has no health left and the session is over.
    ObjectiveDestroyed,
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
    },
    /// Confirms that a projectile left the playable area.
    ProjectileExpired {
        /// Projectile that was removed.
        projectile: ProjectileId,
    },
    /// Confirms that a tower placement started.
    PlacementStarted {
        /// Kind of tower being placed.
        kind: TowerKind,
    },
    /// Confirms that a pending placement was dropped.
    PlacementCancelled,
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Tile targeted by the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower became selected.
    TowerSelected {
        /// Tower that is now selected.
        tower: TowerId,
    },
    /// Confirms that no tower is selected any more.
    SelectionCleared,
}

impl Event {
    /// Stable kebab-case name that audio and other subscribers key on.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TimeAdvanced { .. } => "time-advanced",
            Self::WaveStarted { .. } => "wave-start",
            Self::WaveCleared { .. } => "wave-cleared",
            Self::WaveAdvanceRejected { .. } => "wave-advance-rejected",
            Self::EnemySpawned { .. } => "enemy-spawned",
            Self::SpawnRejected { .. } => "spawn-rejected",
            Self::EnemyHit { .. } => "enemy-hit",
            Self::EnemyKilled { .. } => "enemy-killed",
            Self::EnemyReachedObjective { .. } => "enemy-reached-objective",
            Self::ObjectiveDamaged { .. } => "objective-damaged",
            Self::ObjectiveDestroyed => "objective-destroyed",
            Self::ProjectileFired { .. } => "projectile-fired",
            Self::ProjectileExpired { .. } => "projectile-expired",
            Self::PlacementStarted { .. } => "placement-started",
            Self::PlacementCancelled => "placement-cancelled",
            Self::TowerPlaced { .. } => "tower-placed",
            Self::TowerPlacementRejected { .. } => "tower-placement-rejected",
            Self::TowerSelected { .. } => "tower-selected",
            Self::SelectionCleared => "selection-cleared",
        }
    }
}

/// Cardinal headings used by the direction field.
///
/// Rows grow downwards, so `North` decreases the row index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Unit grid step `(columns, rows)` taken when moving in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction obtained by turning 90° counter-clockwise on screen.
    #[must_use]
    pub const fn rotate_counter_clockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Continuous unit vector matching [`Direction::delta`].
    #[must_use]
    pub fn unit_vector(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32)
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One-based wave counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// Creates a wave number wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying one-based wave number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row coordinates.
///
/// Coordinates are signed so that spawn points outside the grid can be named.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Neighbouring cell reached by a single step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.column + dx, self.row + dy)
    }

    /// Cell that contains the provided continuous point.
    #[must_use]
    pub fn containing(point: Vec2) -> Self {
        Self::new(point.x.floor() as i32, point.y.floor() as i32)
    }

    /// Centre of the cell in tile units.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }

    /// Region covered by the cell.
    #[must_use]
    pub fn bounds(self) -> Bounds {
        Bounds::centered(self.center(), Vec2::ONE)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Axis-aligned box used for every collision test in the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    /// Creates a box of the provided size centred on `center`.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Reports whether two boxes share interior area.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Reports whether the point lies inside the box, including the lower edges.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x < self.max.x
            && point.y >= self.min.y
            && point.y < self.max.y
    }
}

/// Semantic tile behaviour decoded from the level's integer codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Impassable scenery.
    Wall,
    /// Corridor tile that enemies walk along.
    Path,
    /// The protected objective.
    Objective,
}

/// Lookup table from level code to tile behaviour; the index is the code.
const TILE_CODES: [TileKind; 3] = [TileKind::Wall, TileKind::Path, TileKind::Objective];

impl TileKind {
    /// Decodes a level tile code, returning `None` for unknown codes.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        TILE_CODES.get(usize::from(code)).copied()
    }

    /// Level code that encodes this tile behaviour.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Wall => 0,
            Self::Path => 1,
            Self::Objective => 2,
        }
    }
}

/// Immutable tile stored in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    cell: CellCoord,
    kind: TileKind,
}

impl Tile {
    /// Creates a tile located at the provided cell.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: TileKind) -> Self {
        Self { cell, kind }
    }

    /// Cell occupied by the tile.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Behaviour of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Centre of the tile in tile units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.cell.center()
    }
}

/// Describes the dimensions of the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total width of the grid in tile units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32
    }

    /// Total height of the grid in tile units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        u32::try_from(cell.column()).map_or(false, |column| column < self.columns)
            && u32::try_from(cell.row()).map_or(false, |row| row < self.rows)
    }

    /// Reports whether the continuous point lies inside the playable area.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.width() && point.y < self.height()
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Remaining hit points of an enemy or of the objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the remaining hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Health left after absorbing `damage`, never dropping below zero.
    #[must_use]
    pub const fn damaged(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }
}

/// Statistics shared by every enemy of a catalog entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    speed_multiplier: f32,
    max_health: u32,
    damage: u32,
    size: f32,
}

impl EnemyStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(speed_multiplier: f32, max_health: u32, damage: u32, size: f32) -> Self {
        Self {
            speed_multiplier,
            max_health,
            damage,
            size,
        }
    }

    /// Factor applied to the world's base enemy speed.
    #[must_use]
    pub const fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Health the enemy spawns with.
    #[must_use]
    pub const fn max_health(&self) -> Health {
        Health::new(self.max_health)
    }

    /// Contact damage dealt when the enemy reaches the objective.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Side length of the enemy's square collision box, in tiles.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }
}

/// Index of an entry inside the [`EnemyCatalog`].
///
/// The default kind is the first catalog entry.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EnemyKind(u16);

impl EnemyKind {
    /// Retrieves the catalog index.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
struct CatalogEntry {
    name: String,
    stats: EnemyStats,
}

/// Table of enemy types keyed by the names used in spawn instructions.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyCatalog {
    entries: Vec<CatalogEntry>,
}

impl EnemyCatalog {
    /// Creates a catalog without any enemy types.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers an enemy type, replacing the stats of an existing entry with the same name.
    #[must_use]
    pub fn with_enemy(mut self, name: impl Into<String>, stats: EnemyStats) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.stats = stats,
            None => self.entries.push(CatalogEntry { name, stats }),
        }
        self
    }

    /// Looks up the kind registered under `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<EnemyKind> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .and_then(|index| u16::try_from(index).ok())
            .map(EnemyKind)
    }

    /// Stats registered for `kind`.
    #[must_use]
    pub fn stats(&self, kind: EnemyKind) -> Option<&EnemyStats> {
        self.entries
            .get(usize::from(kind.get()))
            .map(|entry| &entry.stats)
    }

    /// Name registered for `kind`.
    #[must_use]
    pub fn name(&self, kind: EnemyKind) -> Option<&str> {
        self.entries
            .get(usize::from(kind.get()))
            .map(|entry| entry.name.as_str())
    }

    /// Number of registered enemy types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self::empty()
            .with_enemy("basic", EnemyStats::new(1.0, 3, 10, 0.6))
            .with_enemy("fast", EnemyStats::new(2.0, 2, 5, 0.5))
            .with_enemy("tank", EnemyStats::new(0.5, 10, 25, 0.8))
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Basic tower with default attack parameters.
    Basic,
}

impl TowerKind {
    /// Radius of the tower's range indicator, in tiles.
    #[must_use]
    pub const fn range_in_tiles(self) -> f32 {
        match self {
            Self::Basic => 3.0,
        }
    }

    /// Damage carried by each projectile the tower fires.
    #[must_use]
    pub const fn projectile_damage(self) -> u32 {
        match self {
            Self::Basic => 1,
        }
    }

    /// Time between two shots.
    #[must_use]
    pub const fn fire_interval(self) -> Duration {
        match self {
            Self::Basic => Duration::from_millis(3_000),
        }
    }

    /// Projectile speed in tiles per second.
    #[must_use]
    pub const fn projectile_speed(self) -> f32 {
        match self {
            Self::Basic => 8.0,
        }
    }

    /// Fixed heading every projectile of this kind travels along.
    ///
    /// Towers do not track targets; they fire along this heading whenever an
    /// enemy is alive anywhere in the corridor.
    #[must_use]
    pub const fn heading(self) -> Direction {
        match self {
            Self::Basic => Direction::North,
        }
    }

    /// Initial projectile velocity in tiles per second.
    #[must_use]
    pub fn projectile_velocity(self) -> Vec2 {
        self.heading().unit_vector() * self.projectile_speed()
    }
}

/// Lifecycle of a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// The wave has not started yet.
    Pending,
    /// Some spawn instructions remain.
    Spawning,
    /// Every spawn instruction has been emitted.
    Complete,
}

/// Timed request to spawn one enemy, relative to the start of its wave.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpawnInstruction {
    enemy: String,
    offset: Duration,
}

impl SpawnInstruction {
    /// Creates a new spawn instruction.
    #[must_use]
    pub fn new(enemy: impl Into<String>, offset: Duration) -> Self {
        Self {
            enemy: enemy.into(),
            offset,
        }
    }

    /// Catalog name of the enemy to spawn.
    #[must_use]
    pub fn enemy(&self) -> &str {
        &self.enemy
    }

    /// Time after the wave start at which the enemy spawns.
    #[must_use]
    pub const fn offset(&self) -> Duration {
        self.offset
    }
}

/// Burst of identical enemies released at a fixed cadence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpawnSequence {
    enemy: String,
    count: u32,
    interval: Duration,
    start: Duration,
}

impl SpawnSequence {
    /// Creates a sequence of `count` enemies starting at `start`, one every `interval`.
    #[must_use]
    pub fn new(enemy: impl Into<String>, count: u32, interval: Duration, start: Duration) -> Self {
        Self {
            enemy: enemy.into(),
            count,
            interval,
            start,
        }
    }

    /// Expands the sequence into individual spawn instructions.
    pub fn instructions(&self) -> impl Iterator<Item = SpawnInstruction> + '_ {
        (0..self.count).map(move |index| {
            let offset = self.start.saturating_add(self.interval.saturating_mul(index));
            SpawnInstruction::new(self.enemy.clone(), offset)
        })
    }
}

/// Ordered list of spawn instructions that make up one wave.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WavePlan {
    instructions: Vec<SpawnInstruction>,
}

impl WavePlan {
    /// Creates a plan, ordering the instructions by ascending offset.
    ///
    /// The sort is stable, so instructions sharing an offset keep the order
    /// they were supplied in.
    #[must_use]
    pub fn new(mut instructions: Vec<SpawnInstruction>) -> Self {
        instructions.sort_by_key(SpawnInstruction::offset);
        Self { instructions }
    }

    /// Creates a plan from bursts of enemies.
    #[must_use]
    pub fn from_sequences(sequences: &[SpawnSequence]) -> Self {
        Self::new(
            sequences
                .iter()
                .flat_map(|sequence| sequence.instructions())
                .collect(),
        )
    }

    /// Instructions in spawn order.
    #[must_use]
    pub fn instructions(&self) -> &[SpawnInstruction] {
        &self.instructions
    }

    /// Number of instructions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Reports whether the plan spawns nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Catalog entry describing the enemy.
    pub kind: EnemyKind,
    /// Continuous position in tile units.
    pub position: Vec2,
    /// Most recent velocity in tiles per second.
    pub velocity: Vec2,
    /// Last tile centre the enemy reached.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: Health,
    /// Travel speed in tiles per second.
    pub speed: f32,
    /// Side length of the collision box, in tiles.
    pub size: f32,
}

/// Read-only snapshot describing all live enemies, oldest first.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view; snapshots keep the order they were supplied in.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Continuous position in tile units.
    pub position: Vec2,
    /// Velocity in tiles per second.
    pub velocity: Vec2,
    /// Damage dealt on impact.
    pub damage: u32,
}

/// Read-only snapshot describing all projectiles in flight, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile occupied by the tower.
    pub cell: CellCoord,
    /// Range indicator radius in tiles.
    pub range: f32,
}

/// Read-only snapshot describing all towers placed within the level.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<TowerSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no tower was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Remaining cooldown of a placed tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the cooldown belongs to.
    pub tower: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Time until the tower may fire again; zero when ready.
    pub ready_in: Duration,
}

/// Read-only snapshot of every tower's cooldown, in placement order.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured cooldowns.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Read-only view of the per-cell headings that lead enemies to the objective.
#[derive(Clone, Copy, Debug)]
pub struct DirectionFieldView<'a> {
    headings: &'a [Option<Direction>],
    grid: TileGrid,
    entry: Option<Direction>,
    objective: CellCoord,
}

impl<'a> DirectionFieldView<'a> {
    /// Captures a view over row-major headings.
    ///
    /// `entry` is the inward heading applied to cells outside the grid, which
    /// only matters when the spawn point lies outside.
    #[must_use]
    pub fn new(
        headings: &'a [Option<Direction>],
        grid: TileGrid,
        entry: Option<Direction>,
        objective: CellCoord,
    ) -> Self {
        Self {
            headings,
            grid,
            entry,
            objective,
        }
    }

    /// Heading recorded for the cell, if the cell lies on the path.
    #[must_use]
    pub fn heading(&self, cell: CellCoord) -> Option<Direction> {
        match self.grid.index(cell) {
            Some(index) => self.headings.get(index).copied().flatten(),
            None => self.entry,
        }
    }

    /// Unit step recorded for the cell; `(0, 0)` for cells off the path.
    #[must_use]
    pub fn step(&self, cell: CellCoord) -> (i32, i32) {
        self.heading(cell).map_or((0, 0), Direction::delta)
    }

    /// Cell holding the objective, where every path ends.
    #[must_use]
    pub const fn objective(&self) -> CellCoord {
        self.objective
    }

    /// Dimensions of the underlying grid.
    #[must_use]
    pub const fn grid(&self) -> TileGrid {
        self.grid
    }

    /// Iterator over every in-grid heading in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Option<Direction>> + 'a {
        self.headings.iter().copied()
    }
}

/// Reasons a level cannot be turned into a playable map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The tile grid has no rows or no columns.
    #[error("level grid has no tiles")]
    Empty,
    /// A row has a different length than the first one.
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        /// Offending row.
        row: u32,
        /// Length of the first row.
        expected: u32,
        /// Length of the offending row.
        found: u32,
    },
    /// A tile code has no known behaviour.
    #[error("unknown tile code {code} at {cell}")]
    UnknownTile {
        /// Code found in the level.
        code: u8,
        /// Location of the code.
        cell: CellCoord,
    },
    /// No tile is marked as the objective.
    #[error("level has no objective tile")]
    MissingObjective,
    /// More than one tile is marked as the objective.
    #[error("level has objective tiles at {first} and {second}")]
    MultipleObjectives {
        /// First objective found in row-major order.
        first: CellCoord,
        /// Second objective found in row-major order.
        second: CellCoord,
    },
    /// The spawn point sits on a wall.
    #[error("spawn point {cell} is a wall")]
    SpawnBlocked {
        /// Spawn point.
        cell: CellCoord,
    },
    /// The spawn point is the objective itself.
    #[error("spawn point {cell} is the objective")]
    SpawnOnObjective {
        /// Spawn point.
        cell: CellCoord,
    },
    /// Walking inward from an outside spawn point never enters the grid.
    #[error("spawn point {cell} never reaches the grid")]
    SpawnOutsideReach {
        /// Spawn point.
        cell: CellCoord,
    },
    /// The corridor ends somewhere other than the objective.
    #[error("path dead-ends at {cell}")]
    DeadEnd {
        /// Cell where every heading is blocked.
        cell: CellCoord,
    },
    /// The objective was not reached within the step budget.
    #[error("objective not reached within {budget} steps")]
    Unreachable {
        /// Number of steps attempted.
        budget: usize,
    },
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested tile lies outside the grid.
    #[error("tile lies outside the grid")]
    OutOfBounds,
    /// The requested tile is a wall.
    #[error("tile is a wall")]
    Wall,
    /// The requested tile holds the objective.
    #[error("tile holds the objective")]
    Objective,
    /// Another tower already occupies the tile.
    #[error("tile is occupied by another tower")]
    Occupied,
}

/// Reasons a spawn instruction may be skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SpawnError {
    /// The instruction names an enemy type missing from the catalog.
    #[error("enemy type is not in the catalog")]
    UnknownEnemyType,
}

/// Reasons a wave request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum WaveError {
    /// No wave follows the current one.
    #[error("no such wave")]
    UnknownWave,
    /// The current wave still has spawns pending or enemies alive.
    #[error("current wave is still in progress")]
    WaveInProgress,
}
