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
//! The whole wave is planned up front as a single queue of `(offset, action)`
//! pairs measured from the encounter start. Each call to
//! [`WaveScheduler::handle`] drains the instructions whose offset has elapsed.
//! Stopping is a single flag: once it is cleared the queue is discarded and no
//! instruction fires again.

use std::{collections::VecDeque, time::Duration};

use lockdown_core::{Command, EnemyStats, Event, StopReason, Timestamp, WorldPoint};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

const MINUTE: Duration = Duration::from_secs(60);
const MIN_INTERVAL: Duration = Duration::from_millis(1);
const DEFAULT_JITTER: u32 = 80;
const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 8;
/// Largest number of instructions a single wave may plan.
pub const MAX_PLANNED_INSTRUCTIONS: usize = 100_000;

/// Tunable constants of a scaling wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    /// Length of the wave; no spawn is planned at or after this offset.
    pub total: Duration,
    /// Gap between instructions during the first minute.
    pub base_interval: Duration,
    /// Factor applied to the interval for every elapsed minute.
    pub decay_per_minute: f32,
    /// Factor applied to enemy vitality for every elapsed minute.
    pub hp_scale_per_minute: f32,
    /// Fraction of the base speed added for every elapsed minute.
    pub speed_bonus_per_minute: f32,
    /// Enemies created by each instruction.
    pub per_tick: u32,
    /// Vitality of enemies spawned during the first minute.
    pub base_vitality: u32,
    /// Speed of enemies spawned during the first minute.
    pub base_speed: f32,
    /// Optional cap on the number of enemies the wave may create.
    pub max_spawns: Option<u32>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(300),
            base_interval: Duration::from_millis(1_200),
            decay_per_minute: 0.85,
            hp_scale_per_minute: 1.2,
            speed_bonus_per_minute: 0.08,
            per_tick: 3,
            base_vitality: 1,
            base_speed: 30.0,
            max_spawns: None,
        }
    }
}

/// How the wave plan is derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScheduleMode {
    /// `count` single spawns at `interval`, `2 × interval`, … followed by a stop
    /// at `window`. Spawns planned past the window are dropped.
    Fixed {
        /// Number of spawns.
        count: u32,
        /// Gap between consecutive spawns.
        interval: Duration,
        /// Offset at which the wave stops.
        window: Duration,
        /// Stats given to every spawned enemy.
        stats: EnemyStats,
    },
    /// Accelerating wave whose enemies grow tougher every minute.
    Scaled(WaveConfig),
}

impl Default for ScheduleMode {
    fn default() -> Self {
        Self::Fixed {
            count: 8,
            interval: Duration::from_secs(1),
            window: Duration::from_secs(8),
            stats: EnemyStats::default(),
        }
    }
}

/// Reasons a wave configuration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The spawn interval was zero.
    #[error("spawn interval must be greater than zero")]
    ZeroInterval,
    /// The per-minute decay was zero, negative or not a number.
    #[error("interval decay must be positive (received {decay})")]
    NonPositiveDecay {
        /// Rejected decay factor.
        decay: f32,
    },
    /// Instructions would create no enemies.
    #[error("each spawn instruction must create at least one enemy")]
    ZeroPerTick,
    /// The decayed interval no longer fits in a duration.
    #[error("spawn interval for minute {minute} is out of range")]
    IntervalOverflow {
        /// Minute whose interval overflowed.
        minute: i32,
    },
    /// The wave would plan more instructions than the scheduler accepts.
    #[error("wave would plan more than {limit} instructions")]
    PlanTooLong {
        /// Largest accepted number of instructions.
        limit: usize,
    },
}

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Plan shape.
    pub mode: ScheduleMode,
    /// Largest offset, in world units on each axis, between the reference
    /// point and a spawn position.
    pub jitter: u32,
    /// Jittered positions tried before a spawn is skipped.
    pub placement_attempts: u32,
    /// Seed of the placement generator.
    pub rng_seed: u64,
}

impl Config {
    /// Creates a configuration with default jitter and placement attempts.
    #[must_use]
    pub const fn new(mode: ScheduleMode, rng_seed: u64) -> Self {
        Self {
            mode,
            jitter: DEFAULT_JITTER,
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(ScheduleMode::default(), 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Action {
    Spawn { count: u32, stats: EnemyStats },
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Instruction {
    offset: Duration,
    action: Action,
}

/// Pure system that drains a pre-planned wave as the clock advances.
#[derive(Debug)]
pub struct WaveScheduler {
    plan: VecDeque<Instruction>,
    planned_spawns: u32,
    started_at: Timestamp,
    active: bool,
    issued: u32,
    skipped: u32,
    jitter: i32,
    placement_attempts: u32,
    rng: ChaCha8Rng,
}

impl WaveScheduler {
    /// Plans the wave relative to `started_at`.
    pub fn new(config: Config, started_at: Timestamp) -> Result<Self, ConfigError> {
        let plan = match config.mode {
            ScheduleMode::Fixed {
                count,
                interval,
                window,
                stats,
            } => fixed_plan(count, interval, window, stats)?,
            ScheduleMode::Scaled(wave) => scaled_plan(&wave)?,
        };
        let planned_spawns = plan
            .iter()
            .map(|instruction| match instruction.action {
                Action::Spawn { count, .. } => count,
                Action::Stop => 0,
            })
            .fold(0u32, u32::saturating_add);
        tracing::debug!(
            instructions = plan.len(),
            planned_spawns,
            "wave planned"
        );

        Ok(Self {
            plan,
            planned_spawns,
            started_at,
            active: true,
            issued: 0,
            skipped: 0,
            jitter: i32::try_from(config.jitter).unwrap_or(i32::MAX),
            placement_attempts: config.placement_attempts.max(1),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        })
    }

    /// Consumes events to emit spawn commands and the window stop.
    ///
    /// `reference` anchors the jittered spawn positions and `is_spawnable`
    /// reports whether the world would accept an enemy at a position.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        reference: WorldPoint,
        is_spawnable: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(WorldPoint) -> bool,
    {
        let mut latest = None;
        for event in events {
            match event {
                Event::SpawningStopped { .. } => self.deactivate(),
                Event::TimeAdvanced { now, .. } => latest = Some(*now),
                _ => {}
            }
        }

        if !self.active {
            return;
        }
        let Some(now) = latest else {
            return;
        };
        let elapsed = now.saturating_duration_since(self.started_at);

        while let Some(instruction) = self.plan.front().copied() {
            if instruction.offset > elapsed {
                break;
            }
            let _ = self.plan.pop_front();
            match instruction.action {
                Action::Spawn { count, stats } => {
                    for _ in 0..count {
                        self.spawn(reference, stats, &is_spawnable, out);
                    }
                }
                Action::Stop => {
                    self.deactivate();
                    out.push(Command::StopSpawning {
                        reason: StopReason::WindowElapsed,
                    });
                }
            }
        }
    }

    /// Whether instructions may still fire.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enemies the plan would create if it ran to completion.
    #[must_use]
    pub fn planned_spawns(&self) -> u32 {
        self.planned_spawns
    }

    /// Spawn commands emitted so far.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.issued
    }

    /// Spawns skipped because no valid position was found.
    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Instructions still waiting for their offset.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.plan.len()
    }

    /// Offset of the next instruction, if any remains.
    #[must_use]
    pub fn next_offset(&self) -> Option<Duration> {
        self.plan.front().map(|instruction| instruction.offset)
    }

    fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            self.plan.clear();
        }
    }

    fn spawn<F>(
        &mut self,
        reference: WorldPoint,
        stats: EnemyStats,
        is_spawnable: &F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(WorldPoint) -> bool,
    {
        for _ in 0..self.placement_attempts {
            let candidate = self.jittered(reference);
            if is_spawnable(candidate) {
                self.issued = self.issued.saturating_add(1);
                out.push(Command::SpawnEnemy {
                    position: candidate,
                    stats,
                });
                return;
            }
        }

        self.skipped = self.skipped.saturating_add(1);
        tracing::warn!(
            x = reference.x,
            y = reference.y,
            attempts = self.placement_attempts,
            "no valid spawn position near reference; skipping spawn"
        );
    }

    fn jittered(&mut self, reference: WorldPoint) -> WorldPoint {
        let dx = self.rng.gen_range(-self.jitter..=self.jitter);
        let dy = self.rng.gen_range(-self.jitter..=self.jitter);
        WorldPoint::new(reference.x + dx as f32, reference.y + dy as f32)
    }
}

fn fixed_plan(
    count: u32,
    interval: Duration,
    window: Duration,
    stats: EnemyStats,
) -> Result<VecDeque<Instruction>, ConfigError> {
    if interval.is_zero() {
        return Err(ConfigError::ZeroInterval);
    }

    let mut plan: VecDeque<Instruction> = (1..=count)
        .map(|index| interval.saturating_mul(index))
        .take_while(|offset| *offset <= window)
        .take(MAX_PLANNED_INSTRUCTIONS + 1)
        .map(|offset| Instruction {
            offset,
            action: Action::Spawn { count: 1, stats },
        })
        .collect();
    if plan.len() > MAX_PLANNED_INSTRUCTIONS {
        return Err(ConfigError::PlanTooLong {
            limit: MAX_PLANNED_INSTRUCTIONS,
        });
    }
    plan.push_back(Instruction {
        offset: window,
        action: Action::Stop,
    });
    Ok(plan)
}

fn scaled_plan(wave: &WaveConfig) -> Result<VecDeque<Instruction>, ConfigError> {
    if wave.base_interval.is_zero() {
        return Err(ConfigError::ZeroInterval);
    }
    if wave.decay_per_minute.is_nan() || wave.decay_per_minute <= 0.0 {
        return Err(ConfigError::NonPositiveDecay {
            decay: wave.decay_per_minute,
        });
    }
    if wave.per_tick == 0 {
        return Err(ConfigError::ZeroPerTick);
    }

    let cap = wave.max_spawns.unwrap_or(u32::MAX);
    let mut plan = VecDeque::new();
    let mut planned = 0u32;
    let mut offset = Duration::ZERO;
    while planned < cap {
        let minute = elapsed_minutes(offset);
        offset = offset.saturating_add(interval_for_minute(wave, minute)?);
        if offset >= wave.total {
            break;
        }
        if plan.len() == MAX_PLANNED_INSTRUCTIONS {
            return Err(ConfigError::PlanTooLong {
                limit: MAX_PLANNED_INSTRUCTIONS,
            });
        }

        let minute = elapsed_minutes(offset);
        let count = wave.per_tick.min(cap - planned);
        planned += count;
        plan.push_back(Instruction {
            offset,
            action: Action::Spawn {
                count,
                stats: stats_for_minute(wave, minute),
            },
        });
    }

    plan.push_back(Instruction {
        offset: wave.total,
        action: Action::Stop,
    });
    Ok(plan)
}

fn elapsed_minutes(offset: Duration) -> i32 {
    i32::try_from(offset.as_secs() / MINUTE.as_secs()).unwrap_or(i32::MAX)
}

fn interval_for_minute(wave: &WaveConfig, minute: i32) -> Result<Duration, ConfigError> {
    if minute == 0 {
        return Ok(wave.base_interval);
    }
    let seconds = wave.base_interval.as_secs_f32() * wave.decay_per_minute.powi(minute);
    Duration::try_from_secs_f32(seconds)
        .map(|interval| interval.max(MIN_INTERVAL))
        .map_err(|_| ConfigError::IntervalOverflow { minute })
}

fn stats_for_minute(wave: &WaveConfig, minute: i32) -> EnemyStats {
    let vitality = (wave.base_vitality as f32 * wave.hp_scale_per_minute.powi(minute)).ceil();
    let vitality = if vitality.is_finite() && vitality >= 1.0 {
        vitality.min(u32::MAX as f32) as u32
    } else {
        1
    };
    EnemyStats {
        vitality,
        speed: wave.base_speed * (1.0 + wave.speed_bonus_per_minute * minute as f32),
    }
}
