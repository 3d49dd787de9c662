#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that settles the room once its doors unlock.
//!
//! The first `RoomCompleted` event stops the wave and compares the kill tally
//! with the number of spawned enemies. A flawless room earns a bonus; any other
//! room has its survivors cleared after a short grace delay. The decision is
//! taken at most once per encounter.

use std::time::Duration;

use lockdown_core::{Command, Event, ScoreSnapshot, StopReason, Timestamp};

/// Configuration parameters required to construct the completion evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Score granted when every spawned enemy was killed by the player.
    pub perfect_bonus: i64,
    /// Delay between completion and the force-clear of surviving enemies.
    pub clear_grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            perfect_bonus: 500,
            clear_grace: Duration::from_millis(1_000),
        }
    }
}

/// Decision taken when the room completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionOutcome {
    /// Every spawned enemy was killed by the player; the bonus was granted.
    Perfect,
    /// Some enemies survived; they are cleared once the grace delay ends.
    Cleared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Waiting,
    ClearPending { at: Timestamp },
    Done,
}

/// Completion evaluator guarding the once-per-encounter decision.
#[derive(Debug)]
pub struct CompletionEvaluator {
    config: Config,
    phase: Phase,
    outcome: Option<CompletionOutcome>,
    now: Timestamp,
}

impl CompletionEvaluator {
    /// Creates a new evaluator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phase: Phase::Waiting,
            outcome: None,
            now: Timestamp::ZERO,
        }
    }

    /// Consumes world events and the current tallies to emit completion commands.
    pub fn handle(&mut self, events: &[Event], score: ScoreSnapshot, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { now, .. } => self.now = *now,
                Event::RoomCompleted => self.complete(score, out),
                Event::GameOver { .. } => self.phase = Phase::Done,
                _ => {}
            }
        }

        if let Phase::ClearPending { at } = self.phase {
            if self.now >= at {
                self.phase = Phase::Done;
                tracing::info!("clearing enemies left in the completed room");
                out.push(Command::ForceClearEnemies);
            }
        }
    }

    /// Decision taken at completion, if the room completed.
    #[must_use]
    pub fn outcome(&self) -> Option<CompletionOutcome> {
        self.outcome
    }

    /// Reports whether a force-clear is still waiting for its grace delay.
    #[must_use]
    pub fn clear_pending(&self) -> bool {
        matches!(self.phase, Phase::ClearPending { .. })
    }

    fn complete(&mut self, score: ScoreSnapshot, out: &mut Vec<Command>) {
        if self.phase != Phase::Waiting {
            return;
        }

        out.push(Command::StopSpawning {
            reason: StopReason::RoomCompleted,
        });

        if score.kills_by_player == score.total_spawned {
            tracing::info!(
                kills = score.kills_by_player,
                bonus = self.config.perfect_bonus,
                "room completed without survivors"
            );
            out.push(Command::AdjustScore {
                delta: self.config.perfect_bonus,
            });
            self.outcome = Some(CompletionOutcome::Perfect);
            self.phase = Phase::Done;
        } else {
            tracing::info!(
                kills = score.kills_by_player,
                spawned = score.total_spawned,
                "room completed with survivors"
            );
            self.outcome = Some(CompletionOutcome::Cleared);
            self.phase = Phase::ClearPending {
                at: self.now.saturating_add(self.config.clear_grace),
            };
        }
    }
}

impl Default for CompletionEvaluator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
