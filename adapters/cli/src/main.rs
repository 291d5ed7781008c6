#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Path Defence headless.
//!
//! The runner steps the simulation on its logical 60 Hz clock without a
//! window, feeds it scripted input from an optional TOML scenario and prints
//! the session statistics when the frame budget is spent.

mod scenario;

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use path_defence_core::{
    EnemyId, EnemyKind, Event, GameStatus, StatsReport, WorldPoint, FRAME_RATE_HZ,
};
use path_defence_system_builder::BuilderInput;
use path_defence_system_simulation::{EffectHooks, Simulation};
use path_defence_world::query;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::scenario::{Scenario, DEFAULT_FRAMES};

/// Headless Path Defence runner.
#[derive(Parser, Debug)]
#[command(name = "path-defence", about = "Run Path Defence without a window")]
struct Args {
    /// TOML scenario describing scripted placements and resets
    #[arg(long, short = 's')]
    scenario: Option<PathBuf>,

    /// Seed of the spawn director, overriding the scenario
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to simulate, overriding the scenario
    #[arg(long)]
    frames: Option<u64>,

    /// Restart automatically whenever the game ends
    #[arg(long)]
    auto_restart: bool,

    /// Pace frames at the real-time frame rate instead of running flat out
    #[arg(long, short = 'r')]
    realtime: bool,

    /// Log filter directive, e.g. `debug` or `path_defence_world=trace`
    #[arg(long)]
    log_level: Option<String>,

    /// Output format of the final report
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    frames_stepped: u64,
    final_frame: u64,
    status: GameStatus,
    resources: u32,
    hit_points: i32,
    towers: usize,
    enemies: usize,
    max_spawn_delay: u32,
    report: StatsReport,
}

#[derive(Debug, Default)]
struct LogHooks;

impl EffectHooks for LogHooks {
    fn on_enemy_killed(&mut self, enemy: EnemyId, kind: EnemyKind, position: WorldPoint) {
        debug!(enemy = enemy.get(), ?kind, x = position.x, y = position.y, "enemy destroyed");
    }

    fn on_enemy_leaked(&mut self, enemy: EnemyId, kind: EnemyKind) {
        debug!(enemy = enemy.get(), ?kind, "enemy reached the end of the path");
    }

    fn on_game_over(&mut self, frame: u64) {
        warn!(frame, "game over");
    }
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    let seed = args
        .seed
        .or(scenario.seed)
        .unwrap_or_else(rand::random::<u64>);
    let frames = args.frames.or(scenario.frames).unwrap_or(DEFAULT_FRAMES);
    let auto_restart = args.auto_restart || scenario.auto_restart;

    let summary = run(&scenario, seed, frames, auto_restart, args.realtime);
    match args.format {
        Format::Text => print_text(&summary),
        Format::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .context("failed to serialise run summary")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(scenario: &Scenario, seed: u64, frames: u64, auto_restart: bool, realtime: bool) -> RunSummary {
    let mut simulation = Simulation::new(seed);
    let mut hooks = LogHooks;
    let mut events = Vec::new();
    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(FRAME_RATE_HZ));

    info!("{}", query::welcome_banner(simulation.world()));
    info!(seed, frames, auto_restart, realtime, "starting headless run");

    for frame in 1..=frames {
        let started = Instant::now();
        step_frame(
            &mut simulation,
            scenario,
            frame,
            auto_restart,
            &mut hooks,
            &mut events,
        );
        events.clear();

        if realtime {
            if let Some(remaining) = frame_duration.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }

    let world = simulation.world();
    let state = query::game_state(world);
    let summary = RunSummary {
        seed,
        frames_stepped: frames,
        final_frame: query::frame(world),
        status: state.status(),
        resources: state.resources(),
        hit_points: state.hit_points(),
        towers: query::tower_count(world),
        enemies: query::enemy_view(world).len(),
        max_spawn_delay: query::spawn_pacing(world).max_spawn_delay(),
        report: simulation.into_report(),
    };
    info!(final_frame = summary.final_frame, "headless run finished");
    summary
}

/// Delivers the frame's scripted input, restart first and then placements in
/// file order, before resolving the frame itself.
fn step_frame<H>(
    simulation: &mut Simulation,
    scenario: &Scenario,
    frame: u64,
    auto_restart: bool,
    hooks: &mut H,
    events: &mut Vec<Event>,
) where
    H: EffectHooks,
{
    let game_over = query::status(simulation.world()) == GameStatus::GameOver;
    if (game_over && auto_restart) || scenario.resets_on(frame) {
        simulation.handle_input(BuilderInput::restart(), hooks, events);
    }
    for placement in scenario.placements_on(frame) {
        simulation.handle_input(BuilderInput::click(placement.point()), hooks, events);
    }
    simulation.step(BuilderInput::default(), hooks, events);
}

fn print_text(summary: &RunSummary) {
    let report = &summary.report;
    println!("=== Path Defence Run Complete ===");
    println!("Seed: {}", summary.seed);
    println!("Frames stepped: {}", summary.frames_stepped);
    println!("Final frame: {}", summary.final_frame);
    println!("Status: {:?}", summary.status);
    println!("Resources: {}", summary.resources);
    println!("Hit points: {}", summary.hit_points);
    println!("Towers standing: {}", summary.towers);
    println!("Enemies alive: {}", summary.enemies);
    println!("Max spawn delay: {}", summary.max_spawn_delay);
    println!();
    println!("Games lost: {}", report.games_lost);
    for (kind, (spawned, killed)) in EnemyKind::ALL
        .iter()
        .zip(report.spawned.iter().zip(report.killed.iter()))
    {
        println!("{kind:?}: spawned {spawned}, killed {killed}");
    }
    println!("Leaked: {}", report.leaked);
    println!(
        "Towers built: {} ({} placements rejected)",
        report.towers_built, report.placements_rejected
    );
    println!("Shots fired: {}", report.shots_fired);
    println!(
        "Resources spent: {}, earned: {}",
        report.resources_spent, report.resources_earned
    );
}

#[cfg(test)]
mod tests {
    use path_defence_core::{CellCoord, Command, TowerId};
    use path_defence_system_simulation::NoHooks;
    use path_defence_system_spawning::SpawnDirector;
    use path_defence_world::{self as world, GameState, Path, World};

    use super::*;
    use crate::scenario::ScriptedPlacement;

    fn placements(frame: u64, points: &[(f32, f32)]) -> Vec<ScriptedPlacement> {
        points
            .iter()
            .map(|&(x, y)| ScriptedPlacement { frame, x, y })
            .collect()
    }

    fn tower_order(simulation: &Simulation) -> Vec<(TowerId, CellCoord)> {
        query::tower_view(simulation.world())
            .iter()
            .map(|tower| (tower.id, tower.cell))
            .collect()
    }

    #[test]
    fn same_frame_placements_land_in_file_order() {
        let scenario = Scenario {
            placements: placements(1, &[(705.0, 150.0), (620.0, 100.0)]),
            ..Scenario::default()
        };
        let mut simulation = Simulation::new(3);
        let mut events = Vec::new();

        step_frame(&mut simulation, &scenario, 1, false, &mut NoHooks, &mut events);

        assert_eq!(
            tower_order(&simulation),
            vec![
                (TowerId::new(0), CellCoord::new(17, 3)),
                (TowerId::new(1), CellCoord::new(15, 2)),
            ]
        );
        assert_eq!(query::frame(simulation.world()), 1);
    }

    #[test]
    fn placements_on_a_reset_frame_follow_the_restart() {
        let path = Path::new(vec![WorldPoint::new(0.0, 500.0), WorldPoint::new(4.0, 500.0)])
            .expect("valid path");
        let mut lost = World::from_parts(path, GameState::new().with_hit_points(1));
        let mut events = Vec::new();
        world::apply(
            &mut lost,
            Command::SpawnEnemy {
                kind: EnemyKind::Square,
            },
            &mut events,
        );
        for _ in 0..2 {
            world::apply(&mut lost, Command::AdvanceEnemies, &mut events);
        }
        assert_eq!(query::status(&lost), GameStatus::GameOver);

        let scenario = Scenario {
            placements: placements(1, &[(220.0, 100.0), (300.0, 100.0)]),
            resets: vec![1],
            ..Scenario::default()
        };
        let mut simulation = Simulation::from_parts(lost, SpawnDirector::new_seeded(5));
        events.clear();

        step_frame(&mut simulation, &scenario, 1, false, &mut NoHooks, &mut events);

        assert_eq!(events.first(), Some(&Event::GameReset));
        assert_eq!(query::status(simulation.world()), GameStatus::Running);
        assert_eq!(query::tower_count(simulation.world()), 2);
        assert_eq!(query::game_state(simulation.world()).resources(), 300);
    }
}
