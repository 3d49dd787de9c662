//! TOML description of an encounter.
//!
//! Every key is optional; missing keys keep the library defaults.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use lockdown_core::{EnemyStats, GridSize};
use lockdown_encounter::EncounterConfig;
use lockdown_system_spawning::{ScheduleMode, WaveConfig};
use serde::Deserialize;

/// Shape of the wave plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ScheduleKind {
    /// Fixed number of spawns at a regular interval.
    Fixed,
    /// Accelerating wave with per-minute scaling.
    Scaled,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EncounterFile {
    seed: Option<u64>,
    #[serde(default)]
    arena: ArenaSection,
    #[serde(default)]
    doors: DoorSection,
    #[serde(default)]
    schedule: ScheduleSection,
    #[serde(default)]
    scoring: ScoringSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArenaSection {
    columns: Option<u32>,
    rows: Option<u32>,
    room_side: Option<u32>,
    tile_length: Option<f32>,
    initial_enemies: Option<u32>,
    max_health: Option<u32>,
    death_linger_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DoorSection {
    unlock_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScheduleSection {
    mode: Option<ScheduleKind>,
    jitter: Option<u32>,
    placement_attempts: Option<u32>,
    count: Option<u32>,
    interval_ms: Option<u64>,
    window_ms: Option<u64>,
    total_ms: Option<u64>,
    base_interval_ms: Option<u64>,
    decay_per_minute: Option<f32>,
    hp_scale_per_minute: Option<f32>,
    speed_bonus_per_minute: Option<f32>,
    per_tick: Option<u32>,
    vitality: Option<u32>,
    speed: Option<f32>,
    max_spawns: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScoringSection {
    kill_reward: Option<i64>,
    hit_penalty: Option<i64>,
    hit_damage: Option<u32>,
    attack_damage: Option<u32>,
    perfect_bonus: Option<i64>,
    clear_grace_ms: Option<u64>,
    detection_radius: Option<f32>,
}

impl EncounterFile {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read encounter file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid encounter file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse encounter toml contents")
    }

    /// Schedule shape requested by the file, if any.
    pub(crate) fn schedule_kind(&self) -> Option<ScheduleKind> {
        self.schedule.mode
    }

    /// Resolves the file against the library defaults.
    pub(crate) fn into_config(self, kind: ScheduleKind) -> Result<EncounterConfig> {
        let mut config = EncounterConfig::default();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        let arena = self.arena;
        let world = &mut config.world;
        world.grid = GridSize::new(
            arena.columns.unwrap_or(world.grid.columns()),
            arena.rows.unwrap_or(world.grid.rows()),
        );
        world.room_side = arena.room_side.unwrap_or(world.room_side);
        world.tile_length = arena.tile_length.unwrap_or(world.tile_length);
        if !(world.tile_length.is_finite() && world.tile_length > 0.0) {
            bail!("tile_length must be positive (received {})", world.tile_length);
        }
        world.initial_enemies = arena.initial_enemies.unwrap_or(world.initial_enemies);
        world.max_health = arena.max_health.unwrap_or(world.max_health);
        if let Some(linger) = arena.death_linger_ms {
            world.death_linger = Duration::from_millis(linger);
        }
        if let Some(delay) = self.doors.unlock_delay_ms {
            world.unlock_delay = Duration::from_millis(delay);
        }

        let schedule = self.schedule;
        config.spawning.jitter = schedule.jitter.unwrap_or(config.spawning.jitter);
        config.spawning.placement_attempts = schedule
            .placement_attempts
            .unwrap_or(config.spawning.placement_attempts);
        config.spawning.mode = schedule.mode_for(kind);

        let scoring = self.scoring;
        let combat = &mut config.combat;
        combat.kill_reward = scoring.kill_reward.unwrap_or(combat.kill_reward);
        combat.hit_penalty = scoring.hit_penalty.unwrap_or(combat.hit_penalty);
        combat.hit_damage = scoring.hit_damage.unwrap_or(combat.hit_damage);
        combat.attack_damage = scoring.attack_damage.unwrap_or(combat.attack_damage);
        config.completion.perfect_bonus = scoring
            .perfect_bonus
            .unwrap_or(config.completion.perfect_bonus);
        if let Some(grace) = scoring.clear_grace_ms {
            config.completion.clear_grace = Duration::from_millis(grace);
        }
        config.behavior.detection_radius = scoring
            .detection_radius
            .unwrap_or(config.behavior.detection_radius);

        Ok(config)
    }
}

impl ScheduleSection {
    fn mode_for(&self, kind: ScheduleKind) -> ScheduleMode {
        match kind {
            ScheduleKind::Fixed => match ScheduleMode::default() {
                ScheduleMode::Fixed {
                    count,
                    interval,
                    window,
                    stats,
                } => ScheduleMode::Fixed {
                    count: self.count.unwrap_or(count),
                    interval: self.interval_ms.map_or(interval, Duration::from_millis),
                    window: self.window_ms.map_or(window, Duration::from_millis),
                    stats: EnemyStats {
                        vitality: self.vitality.unwrap_or(stats.vitality),
                        speed: self.speed.unwrap_or(stats.speed),
                    },
                },
                scaled @ ScheduleMode::Scaled(_) => scaled,
            },
            ScheduleKind::Scaled => {
                let wave = WaveConfig::default();
                ScheduleMode::Scaled(WaveConfig {
                    total: self.total_ms.map_or(wave.total, Duration::from_millis),
                    base_interval: self
                        .base_interval_ms
                        .map_or(wave.base_interval, Duration::from_millis),
                    decay_per_minute: self.decay_per_minute.unwrap_or(wave.decay_per_minute),
                    hp_scale_per_minute: self
                        .hp_scale_per_minute
                        .unwrap_or(wave.hp_scale_per_minute),
                    speed_bonus_per_minute: self
                        .speed_bonus_per_minute
                        .unwrap_or(wave.speed_bonus_per_minute),
                    per_tick: self.per_tick.unwrap_or(wave.per_tick),
                    base_vitality: self.vitality.unwrap_or(wave.base_vitality),
                    base_speed: self.speed.unwrap_or(wave.base_speed),
                    max_spawns: self.max_spawns.or(wave.max_spawns),
                })
            }
        }
    }
}
