//! Entity store holding enemies, projectiles and towers in spawn order.
//!
//! Removal is deferred: retiring an entry leaves a tombstone so indices held
//! by an in-progress pass stay valid, and `compact` drops the tombstones once
//! the phase finishes. Collections are never re-ordered.

use std::time::Duration;

use corridor_defence_core::{
    Bounds, CellCoord, EnemyId, EnemyKind, EnemySnapshot, EnemyStats, Health, ProjectileId,
    ProjectileSnapshot, TowerCooldownSnapshot, TowerId, TowerKind, TowerSnapshot,
    PROJECTILE_SIZE,
};
use glam::Vec2;

/// Insertion-ordered collection with tombstoned removal.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub(crate) fn push(&mut self, value: T) {
        self.slots.push(Some(value));
    }

    /// Tombstones the entry at `index`, returning it if it was still live.
    pub(crate) fn retire(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Drops every tombstone while preserving the order of live entries.
    pub(crate) fn compact(&mut self) {
        self.slots.retain(Option::is_some);
    }

    /// Number of slots, tombstones included; bounds index-based passes.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Live entries with their slot indices, oldest first.
    pub(crate) fn iter_indexed(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().flatten()
    }

    pub(crate) fn position(&self, predicate: impl Fn(&T) -> bool) -> Option<usize> {
        self.iter_indexed()
            .find(|(_, value)| predicate(value))
            .map(|(index, _)| index)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.iter().count()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) cell: CellCoord,
    pub(crate) health: Health,
    pub(crate) speed: f32,
    pub(crate) damage: u32,
    pub(crate) size: f32,
}

impl Enemy {
    pub(crate) fn bounds(&self) -> Bounds {
        Bounds::centered(self.position, Vec2::splat(self.size))
    }

    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity,
            cell: self.cell,
            health: self.health,
            speed: self.speed,
            size: self.size,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) damage: u32,
}

impl Projectile {
    pub(crate) fn bounds(&self) -> Bounds {
        Bounds::centered(self.position, Vec2::splat(PROJECTILE_SIZE))
    }

    fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            position: self.position,
            velocity: self.velocity,
            damage: self.damage,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) cell: CellCoord,
    pub(crate) cooldown: Duration,
}

impl Tower {
    fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            range: self.kind.range_in_tiles(),
        }
    }

    fn cooldown_snapshot(&self) -> TowerCooldownSnapshot {
        TowerCooldownSnapshot {
            tower: self.id,
            kind: self.kind,
            ready_in: self.cooldown,
        }
    }
}

/// Live entity collections plus their monotonic identifier counters.
#[derive(Clone, Debug, Default)]
pub(crate) struct EntityStore {
    pub(crate) enemies: Arena<Enemy>,
    pub(crate) projectiles: Arena<Projectile>,
    pub(crate) towers: Arena<Tower>,
    next_enemy: u32,
    next_projectile: u32,
    next_tower: u32,
}

impl EntityStore {
    pub(crate) fn add_enemy(
        &mut self,
        kind: EnemyKind,
        stats: &EnemyStats,
        speed: f32,
        cell: CellCoord,
    ) -> EnemyId {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.saturating_add(1);
        self.enemies.push(Enemy {
            id,
            kind,
            position: cell.center(),
            velocity: Vec2::ZERO,
            cell,
            health: stats.max_health(),
            speed,
            damage: stats.damage(),
            size: stats.size(),
        });
        id
    }

    pub(crate) fn add_projectile(
        &mut self,
        tower: TowerId,
        position: Vec2,
        velocity: Vec2,
        damage: u32,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.saturating_add(1);
        self.projectiles.push(Projectile {
            id,
            tower,
            position,
            velocity,
            damage,
        });
        id
    }

    /// Places a tower whose first shot waits a full fire interval.
    pub(crate) fn add_tower(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = TowerId::new(self.next_tower);
        self.next_tower = self.next_tower.saturating_add(1);
        self.towers.push(Tower {
            id,
            kind,
            cell,
            cooldown: kind.fire_interval(),
        });
        id
    }

    pub(crate) fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.towers
            .iter()
            .find(|tower| tower.cell == cell)
            .map(|tower| tower.id)
    }

    pub(crate) fn compact(&mut self) {
        self.enemies.compact();
        self.projectiles.compact();
        self.towers.compact();
    }

    pub(crate) fn enemy_snapshots(&self) -> Vec<EnemySnapshot> {
        self.enemies.iter().map(Enemy::snapshot).collect()
    }

    pub(crate) fn projectile_snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.projectiles.iter().map(Projectile::snapshot).collect()
    }

    pub(crate) fn tower_snapshots(&self) -> Vec<TowerSnapshot> {
        self.towers.iter().map(Tower::snapshot).collect()
    }

    pub(crate) fn cooldown_snapshots(&self) -> Vec<TowerCooldownSnapshot> {
        self.towers.iter().map(Tower::cooldown_snapshot).collect()
    }
}
