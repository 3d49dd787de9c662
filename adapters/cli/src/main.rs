#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Lockdown encounter without a screen.

mod config;
mod pilot;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lockdown_core::{GameSummary, Timestamp};
use lockdown_encounter::{
    collaborators::{Clock, Hud, Lifecycle, ManualClock, Visibility},
    Encounter,
};
use lockdown_world::query;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use config::{EncounterFile, ScheduleKind};
use pilot::{Pilot, PilotKind};

/// Runs a single-room encounter headlessly and prints how it ended.
#[derive(Debug, Parser)]
#[command(name = "lockdown", version)]
struct Args {
    /// TOML file describing the arena, schedule and scoring.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed overriding the one in the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated milliseconds between ticks.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Simulated milliseconds after which the run stops.
    #[arg(long, default_value_t = 30_000)]
    duration_ms: u64,
    /// Wave shape overriding the one in the configuration file.
    #[arg(long, value_enum)]
    schedule: Option<ScheduleKind>,
    /// How the simulated player behaves.
    #[arg(long, value_enum, default_value_t = PilotKind::Hunter)]
    pilot: PilotKind,
    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,
}

/// Collaborators that narrate every notification through `tracing` and keep
/// the values a HUD would display.
#[derive(Debug, Default)]
struct TracingCollaborators {
    score: u64,
    health: u32,
    max_health: u32,
    recalculations: u32,
}

impl Visibility for TracingCollaborators {
    fn recalculate(&mut self) {
        self.recalculations += 1;
        tracing::info!(recalculations = self.recalculations, "visibility recalculated");
    }
}

impl Hud for TracingCollaborators {
    fn add_score(&mut self, delta: i64) {
        self.score = if delta.is_negative() {
            self.score.saturating_sub(delta.unsigned_abs())
        } else {
            self.score.saturating_add(delta.unsigned_abs())
        };
        tracing::debug!(delta, score = self.score, "score changed");
    }

    fn set_score(&mut self, value: u64) {
        self.score = value;
    }

    fn damage_player(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
        tracing::info!(amount, health = self.health, "player hit");
    }

    fn heal_player(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
        tracing::debug!(amount, health = self.health, "player healed");
    }

    fn set_health(&mut self, current: u32, max: u32) {
        self.health = current;
        self.max_health = max;
    }

    fn reset_game(&mut self) {
        *self = Self::default();
    }
}

impl Lifecycle for TracingCollaborators {
    fn on_room_completed(&mut self) {
        tracing::info!(score = self.score, "room completed");
    }

    fn on_game_over(&mut self, summary: &GameSummary) {
        tracing::info!(
            score = summary.score,
            kills = summary.kills_by_player,
            spawned = summary.total_spawned,
            "game over"
        );
    }
}

#[derive(Debug, Serialize)]
struct RunReport {
    seed: u64,
    elapsed_ms: u64,
    ticks: u64,
    outcome: &'static str,
    completion: Option<String>,
    health: u32,
    max_health: u32,
    hud_score: u64,
    summary: GameSummary,
    kill_ratio: f64,
}

/// Entry point for the Lockdown command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.tick_ms == 0 {
        bail!("--tick-ms must be greater than zero");
    }

    let file = match &args.config {
        Some(path) => EncounterFile::load(path)?,
        None => EncounterFile::default(),
    };
    let kind = args
        .schedule
        .or(file.schedule_kind())
        .unwrap_or(ScheduleKind::Fixed);
    let mut config = file.into_config(kind)?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let report = run(&args, config)?;
    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialise run report")?;
        println!("{json}");
    } else {
        println!(
            "{outcome} after {elapsed} ms ({ticks} ticks): score {score}, {kills}/{spawned} kills ({ratio:.0}%), health {health}/{max}",
            outcome = report.outcome,
            elapsed = report.elapsed_ms,
            ticks = report.ticks,
            score = report.summary.score,
            kills = report.summary.kills_by_player,
            spawned = report.summary.total_spawned,
            ratio = report.kill_ratio * 100.0,
            health = report.health,
            max = report.max_health,
        );
    }
    Ok(())
}

fn run(args: &Args, config: lockdown_encounter::EncounterConfig) -> Result<RunReport> {
    let seed = config.seed;
    let mut hud = TracingCollaborators::default();
    let mut clock = ManualClock::new(Timestamp::ZERO);
    let mut encounter =
        Encounter::start(config, clock.now(), &mut hud).context("failed to start encounter")?;

    let tick = Duration::from_millis(args.tick_ms);
    let end = Timestamp::from_millis(args.duration_ms);
    let mut pilot = Pilot::new(
        args.pilot,
        query::start_position(encounter.world()),
        seed.wrapping_add(1),
    );

    let mut ticks = 0u64;
    while clock.now() < end && !encounter.is_halted() {
        let now = clock.advance(tick);
        let (player, contacts) = pilot.step(encounter.world(), tick);
        let _ = encounter.tick(now, player, &contacts, &mut hud);
        ticks += 1;

        let settled = encounter.completion().outcome().is_some()
            && !encounter.completion().clear_pending()
            && query::enemy_view(encounter.world()).is_empty();
        if settled {
            break;
        }
    }

    let summary = encounter.summary();
    let outcome = if encounter.is_halted() {
        "defeated"
    } else if encounter.completion().outcome().is_some() {
        "completed"
    } else {
        "timed out"
    };
    Ok(RunReport {
        seed,
        elapsed_ms: clock.now().as_millis(),
        ticks,
        outcome,
        completion: encounter
            .completion()
            .outcome()
            .map(|outcome| format!("{outcome:?}")),
        health: hud.health,
        max_health: hud.max_health,
        hud_score: hud.score,
        summary,
        kill_ratio: summary.kill_ratio(),
    })
}
