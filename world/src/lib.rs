#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Corridor Defence.
//!
//! The world owns the static grid, the direction field traced from it, the
//! entity store and the objective. [`World::tick`] drives the pure systems in a
//! fixed order and executes their command batches through [`apply`], which is
//! also the entry point adapters use for player requests.

mod config;
mod entities;
mod grid;
mod navigation;

use std::time::Duration;

use corridor_defence_core::{
    CellCoord, Command, EnemyId, EnemyView, Event, Health, MapError, PlacementError, SpawnError,
    TileKind, TowerCooldownView, TowerId, TowerKind, WaveError, WaveNumber,
};
use corridor_defence_system_movement::Movement;
use corridor_defence_system_spawning::WaveScheduler;
use corridor_defence_system_tower_combat::TowerCombat;
use glam::Vec2;

pub use config::{LevelLayout, WorldConfig, DEFAULT_ENEMY_SPEED, DEFAULT_OBJECTIVE_HEALTH};

use entities::EntityStore;
use grid::Grid;
use navigation::DirectionField;

/// Represents the authoritative Corridor Defence world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    field: DirectionField,
    spawn: CellCoord,
    config: WorldConfig,
    entities: EntityStore,
    scheduler: WaveScheduler,
    movement: Movement,
    combat: TowerCombat,
    objective_health: Health,
    announced: Option<WaveNumber>,
    cleared_reported: bool,
    game_over: bool,
    pending_placement: Option<TowerKind>,
    selected_tower: Option<TowerId>,
}

impl World {
    /// Builds a world for the provided level.
    ///
    /// The grid is validated and the direction field traced before any tick is
    /// accepted; a level without a usable corridor is rejected here.
    pub fn new(level: LevelLayout, config: WorldConfig) -> Result<Self, MapError> {
        let grid = Grid::from_codes(level.tiles())?;
        let spawn = level.spawn();
        let field = DirectionField::trace(&grid, spawn)?;
        let dimensions = grid.dimensions();

        log::info!(
            "level ready: {}x{} tiles, spawn {}, objective {}, {} waves",
            dimensions.columns(),
            dimensions.rows(),
            spawn,
            grid.objective(),
            level.waves().len()
        );

        Ok(Self {
            grid,
            field,
            spawn,
            objective_health: config.objective_health(),
            config,
            entities: EntityStore::default(),
            scheduler: WaveScheduler::new(level.into_waves()),
            movement: Movement::new(),
            combat: TowerCombat::new(),
            announced: None,
            cleared_reported: false,
            game_over: false,
            pending_placement: None,
            selected_tower: None,
        })
    }

    /// Advances the simulation by `dt`, reporting every outcome to `out_events`.
    ///
    /// Phases run in a fixed order: scheduling, enemy movement, projectiles,
    /// towers, wave status. A zero-length tick only settles the schedule.
    pub fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.game_over {
            log::trace!("tick ignored, the objective has fallen");
            return;
        }

        let batch = out_events.len();
        out_events.push(Event::TimeAdvanced { dt });
        let mut commands = Vec::new();

        self.scheduler.handle(&out_events[batch..], &mut commands);
        self.execute(&mut commands, out_events);

        if !dt.is_zero() {
            let enemies = EnemyView::from_snapshots(self.entities.enemy_snapshots());
            self.movement.handle(
                &out_events[batch..],
                &enemies,
                self.field.view(),
                &mut commands,
            );
            self.execute(&mut commands, out_events);
            self.entities.compact();

            if self.game_over {
                return;
            }

            self.advance_projectiles(dt, out_events);
            self.entities.compact();

            self.cool_down_towers(dt);
            let cooldowns = TowerCooldownView::from_snapshots(self.entities.cooldown_snapshots());
            self.combat
                .handle(&cooldowns, self.entities.enemies.live_count(), &mut commands);
            self.execute(&mut commands, out_events);
        }

        self.report_wave_status(out_events);
    }

    fn execute(&mut self, commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            if self.game_over {
                break;
            }
            apply(self, command, out_events);
        }
    }

    fn wave_complete(&self) -> bool {
        self.scheduler.is_drained() && self.entities.enemies.live_count() == 0
    }

    fn report_wave_status(&mut self, out_events: &mut Vec<Event>) {
        if self.cleared_reported || !self.wave_complete() {
            return;
        }

        self.cleared_reported = true;
        let wave = self.scheduler.wave_number();
        log::info!("wave {} cleared", wave.get());
        out_events.push(Event::WaveCleared { wave });
    }

    fn spawn_enemy(&mut self, name: String, out_events: &mut Vec<Event>) {
        let catalog = self.config.catalog();
        let resolved = catalog
            .resolve(&name)
            .and_then(|kind| catalog.stats(kind).map(|stats| (kind, *stats)));

        let Some((kind, stats)) = resolved else {
            log::warn!("skipping spawn of unknown enemy type `{name}`");
            out_events.push(Event::SpawnRejected {
                enemy: name,
                reason: SpawnError::UnknownEnemyType,
            });
            return;
        };

        let speed = self.config.base_enemy_speed() * stats.speed_multiplier();
        let enemy = self.entities.add_enemy(kind, &stats, speed, self.spawn);
        out_events.push(Event::EnemySpawned {
            enemy,
            kind,
            position: self.spawn.center(),
        });
    }

    fn step_enemy(
        &mut self,
        enemy: EnemyId,
        cell: CellCoord,
        position: Vec2,
        velocity: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self
            .entities
            .enemies
            .position(|candidate| candidate.id == enemy)
        else {
            return;
        };
        let Some(entry) = self.entities.enemies.get_mut(index) else {
            return;
        };

        entry.cell = cell;
        entry.position = position;
        entry.velocity = velocity;
        let damage = entry.damage;

        if !self.grid.objective().bounds().contains(position) {
            return;
        }

        let _ = self.entities.enemies.retire(index);
        out_events.push(Event::EnemyReachedObjective { enemy, damage });
        self.damage_objective(damage, out_events);
    }

    fn damage_objective(&mut self, damage: u32, out_events: &mut Vec<Event>) {
        self.objective_health = self.objective_health.damaged(damage);
        out_events.push(Event::ObjectiveDamaged {
            damage,
            remaining: self.objective_health,
        });

        if self.objective_health.is_zero() && !self.game_over {
            self.game_over = true;
            log::info!(
                "objective destroyed during wave {}",
                self.scheduler.wave_number().get()
            );
            out_events.push(Event::ObjectiveDestroyed);
        }
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let dimensions = self.grid.dimensions();

        for index in 0..self.entities.projectiles.slot_count() {
            let Some(projectile) = self.entities.projectiles.get_mut(index) else {
                continue;
            };
            projectile.position += projectile.velocity * seconds;
            let (id, damage, bounds) = (projectile.id, projectile.damage, projectile.bounds());

            if !dimensions.contains_point(projectile.position) {
                let _ = self.entities.projectiles.retire(index);
                out_events.push(Event::ProjectileExpired { projectile: id });
                continue;
            }

            let Some(target) = self
                .entities
                .enemies
                .iter_indexed()
                .find(|(_, enemy)| bounds.overlaps(&enemy.bounds()))
                .map(|(target, _)| target)
            else {
                continue;
            };

            let _ = self.entities.projectiles.retire(index);
            let Some(enemy) = self.entities.enemies.get_mut(target) else {
                continue;
            };
            enemy.health = enemy.health.damaged(damage);
            let (enemy_id, remaining) = (enemy.id, enemy.health);

            out_events.push(Event::EnemyHit {
                enemy: enemy_id,
                projectile: id,
                damage,
                remaining,
            });

            if remaining.is_zero() {
                let _ = self.entities.enemies.retire(target);
                out_events.push(Event::EnemyKilled { enemy: enemy_id });
            }
        }
    }

    fn cool_down_towers(&mut self, dt: Duration) {
        for tower in self.entities.towers.iter_mut() {
            tower.cooldown = tower.cooldown.saturating_sub(dt);
        }
    }

    fn fire_projectile(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let live_enemies = self.entities.enemies.live_count();
        let Some(index) = self
            .entities
            .towers
            .position(|candidate| candidate.id == tower)
        else {
            return;
        };
        let Some(entry) = self.entities.towers.get_mut(index) else {
            return;
        };

        if live_enemies == 0 {
            log::trace!("tower {} holds fire without targets", tower.get());
            return;
        }
        if !entry.cooldown.is_zero() {
            log::debug!("tower {} is still cooling down", tower.get());
            return;
        }

        entry.cooldown = entry.kind.fire_interval();
        let (kind, origin) = (entry.kind, entry.cell.center());
        let projectile = self.entities.add_projectile(
            tower,
            origin,
            kind.projectile_velocity(),
            kind.projectile_damage(),
        );
        out_events.push(Event::ProjectileFired { projectile, tower });
    }

    fn start_wave(&mut self, wave: WaveNumber, out_events: &mut Vec<Event>) {
        if wave != self.scheduler.wave_number() || self.announced == Some(wave) {
            log::warn!("ignoring start of wave {}", wave.get());
            return;
        }

        self.announced = Some(wave);
        self.cleared_reported = false;
        log::info!("wave {} started", wave.get());
        out_events.push(Event::WaveStarted { wave });
    }

    fn advance_wave(&mut self, out_events: &mut Vec<Event>) {
        let result = if self.wave_complete() {
            self.scheduler.advance()
        } else {
            Err(WaveError::WaveInProgress)
        };

        match result {
            Ok(wave) => {
                for tower in self.entities.towers.iter_mut() {
                    tower.cooldown = tower.kind.fire_interval();
                }
                log::info!("advanced to wave {}", wave.get());
            }
            Err(reason) => {
                log::warn!("wave advance rejected: {reason}");
                out_events.push(Event::WaveAdvanceRejected { reason });
            }
        }
    }

    fn placement_target(&self, position: Vec2) -> Result<CellCoord, PlacementError> {
        let cell = CellCoord::containing(position);
        match self.grid.kind(cell) {
            None => Err(PlacementError::OutOfBounds),
            Some(TileKind::Wall) => Err(PlacementError::Wall),
            Some(TileKind::Objective) => Err(PlacementError::Objective),
            Some(TileKind::Path) if self.entities.tower_at(cell).is_some() => {
                Err(PlacementError::Occupied)
            }
            Some(TileKind::Path) => Ok(cell),
        }
    }

    fn place_tower(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let kind = self.pending_placement.unwrap_or(TowerKind::Basic);

        match self.placement_target(position) {
            Ok(cell) => {
                let tower = self.entities.add_tower(kind, cell);
                self.pending_placement = None;
                log::debug!("tower {} placed at {cell}", tower.get());
                out_events.push(Event::TowerPlaced { tower, kind, cell });
            }
            Err(reason) => {
                let cell = CellCoord::containing(position);
                if reason == PlacementError::OutOfBounds {
                    self.pending_placement = None;
                }
                log::debug!("tower placement at {cell} rejected: {reason}");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        }
    }

    fn select_tower(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let target = if self.pending_placement.is_some() {
            None
        } else {
            self.entities.tower_at(CellCoord::containing(position))
        };

        match target {
            Some(tower) => {
                self.selected_tower = Some(tower);
                log::debug!("tower {} selected", tower.get());
                out_events.push(Event::TowerSelected { tower });
            }
            None => self.clear_selection(out_events),
        }
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        if self.selected_tower.take().is_some() {
            out_events.push(Event::SelectionCleared);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::StartWave { wave } => world.start_wave(wave, out_events),
        Command::SpawnEnemy { enemy } => world.spawn_enemy(enemy, out_events),
        Command::StepEnemy {
            enemy,
            cell,
            position,
            velocity,
        } => world.step_enemy(enemy, cell, position, velocity, out_events),
        Command::FireProjectile { tower } => world.fire_projectile(tower, out_events),
        Command::BeginPlacement { kind } => {
            world.pending_placement = Some(kind);
            out_events.push(Event::PlacementStarted { kind });
        }
        Command::CancelPlacement => {
            if world.pending_placement.take().is_some() {
                out_events.push(Event::PlacementCancelled);
            }
            world.clear_selection(out_events);
        }
        Command::PlaceTower { position } => world.place_tower(position, out_events),
        Command::SelectTower { position } => world.select_tower(position, out_events),
        Command::AdvanceWave => world.advance_wave(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use corridor_defence_core::{
        CellCoord, DirectionFieldView, EnemyCatalog, EnemyView, Health, PlacementError,
        ProjectileView, Tile, TileGrid, TowerCooldownView, TowerId, TowerKind, TowerView,
        WaveNumber,
    };
    use glam::Vec2;

    /// Every tile of the level in row-major order.
    #[must_use]
    pub fn tiles(world: &World) -> &[Tile] {
        world.grid.tiles()
    }

    /// Dimensions of the level's tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> TileGrid {
        world.grid.dimensions()
    }

    /// Per-cell headings leading from the spawn point to the objective.
    #[must_use]
    pub fn direction_field(world: &World) -> DirectionFieldView<'_> {
        world.field.view()
    }

    /// Cell enemies spawn on.
    #[must_use]
    pub fn spawn_cell(world: &World) -> CellCoord {
        world.spawn
    }

    /// Captures a read-only view of the live enemies, oldest first.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.entities.enemy_snapshots())
    }

    /// Captures a read-only view of the projectiles in flight, oldest first.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(world.entities.projectile_snapshots())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.entities.tower_snapshots())
    }

    /// Captures the remaining cooldown of every placed tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(world.entities.cooldown_snapshots())
    }

    /// Health the objective has left.
    #[must_use]
    pub fn objective_health(world: &World) -> Health {
        world.objective_health
    }

    /// Cell holding the objective.
    #[must_use]
    pub fn objective_cell(world: &World) -> CellCoord {
        world.grid.objective()
    }

    /// One-based number of the current wave.
    #[must_use]
    pub fn wave_number(world: &World) -> WaveNumber {
        world.scheduler.wave_number()
    }

    /// Number of waves the level defines.
    #[must_use]
    pub fn wave_count(world: &World) -> usize {
        world.scheduler.wave_count()
    }

    /// Time elapsed since the current wave started.
    #[must_use]
    pub fn wave_elapsed(world: &World) -> Duration {
        world.scheduler.elapsed()
    }

    /// Reports whether the current wave has no pending spawns and no live enemies.
    ///
    /// Only a complete wave may be followed by `Command::AdvanceWave`.
    #[must_use]
    pub fn wave_complete(world: &World) -> bool {
        world.wave_complete()
    }

    /// Reports whether the objective has been destroyed.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Tower currently selected, if any.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<TowerId> {
        world.selected_tower
    }

    /// Tower kind awaiting placement, if any.
    #[must_use]
    pub fn pending_placement(world: &World) -> Option<TowerKind> {
        world.pending_placement
    }

    /// Cell a tower would occupy if placed at `position`, or why it cannot be.
    pub fn placement_preview(world: &World, position: Vec2) -> Result<CellCoord, PlacementError> {
        world.placement_target(position)
    }

    /// Enemy types the level's spawn instructions may refer to.
    #[must_use]
    pub fn enemy_catalog(world: &World) -> &EnemyCatalog {
        world.config.catalog()
    }
}
