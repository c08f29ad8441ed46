use std::time::Duration;

use corridor_defence_core::{
    CellCoord, Command, Event, SpawnInstruction, SpawnSequence, WaveError, WaveNumber, WavePlan,
};
use corridor_defence_world::{self as world, query, LevelLayout, World, WorldConfig};
use glam::Vec2;

fn corridor(waves: Vec<WavePlan>) -> World {
    let tiles = vec![
        vec![0, 0, 1, 0, 0],
        vec![0, 0, 1, 0, 0],
        vec![0, 0, 1, 0, 0],
        vec![0, 0, 1, 0, 0],
        vec![0, 0, 2, 0, 0],
    ];
    World::new(
        LevelLayout::new(tiles, CellCoord::new(2, 0), waves),
        WorldConfig::default().with_objective_health(1_000),
    )
    .expect("valid level")
}

fn basic_at(offsets: &[u64]) -> WavePlan {
    WavePlan::new(
        offsets
            .iter()
            .map(|offset| SpawnInstruction::new("basic", Duration::from_millis(*offset)))
            .collect(),
    )
}

fn spawned(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count()
}

fn advance(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::AdvanceWave, &mut events);
    events
}

#[test]
fn irregular_ticks_spawn_every_instruction_exactly_once() {
    let offsets = [0_u64, 15, 15, 40, 41, 300, 301, 999];
    let mut world = corridor(vec![basic_at(&offsets)]);
    let mut events = Vec::new();
    let mut elapsed = 0;

    for millis in [0_u64, 7, 0, 33, 1, 260, 2, 500, 0, 400] {
        elapsed += millis;
        world.tick(Duration::from_millis(millis), &mut events);
        let due = offsets.iter().filter(|offset| **offset <= elapsed).count();
        assert_eq!(spawned(&events), due, "after {elapsed} ms");
    }

    assert_eq!(spawned(&events), offsets.len());
    assert_eq!(query::enemy_view(&world).len(), offsets.len());
}

#[test]
fn spawns_wait_for_their_offset() {
    let mut world = corridor(vec![WavePlan::from_sequences(&[SpawnSequence::new(
        "fast",
        3,
        Duration::from_millis(500),
        Duration::from_millis(100),
    )])]);
    let mut events = Vec::new();

    world.tick(Duration::from_millis(99), &mut events);
    assert_eq!(spawned(&events), 0);

    world.tick(Duration::from_millis(1), &mut events);
    assert_eq!(spawned(&events), 1);

    world.tick(Duration::from_millis(1_000), &mut events);
    assert_eq!(spawned(&events), 3);
}

#[test]
fn first_tick_announces_the_wave() {
    let mut world = corridor(vec![basic_at(&[0])]);
    let mut events = Vec::new();

    world.tick(Duration::ZERO, &mut events);

    assert_eq!(
        &events[..2],
        &[
            Event::TimeAdvanced { dt: Duration::ZERO },
            Event::WaveStarted {
                wave: WaveNumber::new(1)
            },
        ]
    );
}

#[test]
fn completed_wave_advances_and_resets_tower_cooldowns() {
    let mut world = corridor(vec![basic_at(&[0]), basic_at(&[0, 0])]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTower {
            position: Vec2::new(2.5, 3.5),
        },
        &mut events,
    );

    world.tick(Duration::ZERO, &mut events);
    assert_eq!(
        advance(&mut world),
        vec![Event::WaveAdvanceRejected {
            reason: WaveError::WaveInProgress
        }]
    );

    for _ in 0..250 {
        world.tick(Duration::from_millis(20), &mut events);
    }
    assert!(query::wave_complete(&world));
    let cleared = events
        .iter()
        .filter(|event| matches!(event, Event::WaveCleared { .. }))
        .count();
    assert_eq!(cleared, 1);
    assert!(query::tower_cooldowns(&world).into_vec()[0].ready_in < Duration::from_secs(3));

    assert!(advance(&mut world).is_empty());
    assert_eq!(query::wave_number(&world), WaveNumber::new(2));
    assert_eq!(query::wave_elapsed(&world), Duration::ZERO);
    assert!(!query::wave_complete(&world));
    assert_eq!(
        query::tower_cooldowns(&world).into_vec()[0].ready_in,
        Duration::from_secs(3)
    );

    let mut next = Vec::new();
    world.tick(Duration::ZERO, &mut next);
    assert!(next.contains(&Event::WaveStarted {
        wave: WaveNumber::new(2)
    }));
    assert_eq!(spawned(&next), 2);
}

#[test]
fn advancing_past_the_last_wave_is_rejected() {
    let mut world = corridor(vec![WavePlan::default()]);
    let mut events = Vec::new();
    world.tick(Duration::from_millis(20), &mut events);
    assert!(query::wave_complete(&world));

    assert_eq!(
        advance(&mut world),
        vec![Event::WaveAdvanceRejected {
            reason: WaveError::UnknownWave
        }]
    );
    assert_eq!(query::wave_number(&world), WaveNumber::new(1));
}

#[test]
fn unknown_enemy_does_not_stall_the_wave() {
    let mut world = corridor(vec![WavePlan::new(vec![
        SpawnInstruction::new("basic", Duration::ZERO),
        SpawnInstruction::new("dragon", Duration::from_millis(50)),
        SpawnInstruction::new("basic", Duration::from_millis(100)),
    ])]);
    let mut events = Vec::new();

    for _ in 0..10 {
        world.tick(Duration::from_millis(20), &mut events);
    }

    assert_eq!(spawned(&events), 2);
    let rejected = events
        .iter()
        .filter(|event| matches!(event, Event::SpawnRejected { .. }))
        .count();
    assert_eq!(rejected, 1);
    assert_eq!(query::enemy_view(&world).len(), 2);
}
