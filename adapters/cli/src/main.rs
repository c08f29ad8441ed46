#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the built-in Corridor Defence level headlessly.

mod demo;
mod logging;
mod summary;
mod tower_spot;

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use corridor_defence_core::{Command, Event, TowerKind};
use corridor_defence_world::{self as world, query, World, WorldConfig};

use crate::{summary::Tally, tower_spot::TowerSpot};

const WELCOME_BANNER: &str = "Welcome to Corridor Defence.";

/// Runs the demo corridor for a fixed number of ticks and prints a summary.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 3_000)]
    ticks: u32,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,

    /// Tile to place a basic tower on, as COLUMN,ROW. May be repeated.
    #[arg(long = "tower", value_name = "COLUMN,ROW")]
    towers: Vec<TowerSpot>,

    /// Advance to the next wave as soon as the current one is cleared.
    #[arg(long)]
    auto_advance: bool,

    /// Starting health of the objective.
    #[arg(long)]
    objective_health: Option<u32>,

    /// Enables debug logging unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Corridor Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    ensure!(args.tick_ms > 0, "--tick-ms must be positive");

    let mut config = WorldConfig::default();
    if let Some(health) = args.objective_health {
        config = config.with_objective_health(health);
    }

    let mut world = World::new(demo::level(), config).context("failed to build the demo level")?;
    println!("{WELCOME_BANNER}");
    log::debug!(
        "{} enemy types in the catalog",
        query::enemy_catalog(&world).len()
    );

    let mut events = Vec::new();
    place_towers(&mut world, &args.towers, &mut events);

    let mut tally = Tally::default();
    let dt = Duration::from_millis(args.tick_ms);
    let mut ticks_run = 0;
    for _ in 0..args.ticks {
        events.clear();
        world::apply(&mut world, Command::Tick { dt }, &mut events);
        tally.record(&events);
        ticks_run += 1;

        if query::is_game_over(&world) {
            break;
        }

        if args.auto_advance
            && query::wave_complete(&world)
            && (query::wave_number(&world).get() as usize) < query::wave_count(&world)
        {
            events.clear();
            world::apply(&mut world, Command::AdvanceWave, &mut events);
            tally.record(&events);
        }
    }

    let simulated = dt * ticks_run;
    println!(
        "ran {ticks_run} ticks ({:.1}s simulated), reached wave {} of {}",
        simulated.as_secs_f32(),
        query::wave_number(&world).get(),
        query::wave_count(&world)
    );
    println!("{tally}");
    println!(
        "objective health: {}{}",
        query::objective_health(&world).get(),
        if tally.destroyed { " (destroyed)" } else { "" }
    );

    Ok(())
}

fn place_towers(world: &mut World, spots: &[TowerSpot], events: &mut Vec<Event>) {
    for spot in spots {
        events.clear();
        world::apply(
            world,
            Command::BeginPlacement {
                kind: TowerKind::Basic,
            },
            events,
        );
        world::apply(
            world,
            Command::PlaceTower {
                position: spot.position(),
            },
            events,
        );

        for event in events.iter() {
            match event {
                Event::TowerPlaced { tower, cell, .. } => {
                    log::info!("placed tower {} at {cell}", tower.get());
                }
                Event::TowerPlacementRejected { reason, .. } => {
                    log::warn!("cannot place a tower at {spot}: {reason}");
                }
                _ => {}
            }
        }
    }
    events.clear();
}
