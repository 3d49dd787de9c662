//! Player health, score and kill tallies.

use lockdown_core::{GameSummary, ScoreSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Scoreboard {
    health: u32,
    max_health: u32,
    score: u64,
    kills_by_player: u32,
    total_spawned: u32,
}

impl Scoreboard {
    pub(crate) fn new(max_health: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            score: 0,
            kills_by_player: 0,
            total_spawned: 0,
        }
    }

    /// Adds `delta` to the score, clamping at zero. Returns the new score.
    pub(crate) fn adjust_score(&mut self, delta: i64) -> u64 {
        self.score = if delta.is_negative() {
            self.score.saturating_sub(delta.unsigned_abs())
        } else {
            self.score.saturating_add(delta.unsigned_abs())
        };
        self.score
    }

    /// Removes health, stopping at zero. Returns the remaining health.
    pub(crate) fn damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    /// Restores health up to the maximum. Returns the new health.
    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health
    }

    /// Counts a kill. Each spawned enemy is retired at most once, so kills
    /// never outnumber spawns.
    pub(crate) fn record_kill(&mut self) {
        debug_assert!(
            self.kills_by_player < self.total_spawned,
            "kill recorded without a matching spawn"
        );
        self.kills_by_player = self.kills_by_player.saturating_add(1);
    }

    pub(crate) fn record_spawn(&mut self) {
        self.total_spawned = self.total_spawned.saturating_add(1);
    }

    pub(crate) fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            health: self.health,
            max_health: self.max_health,
            score: self.score,
            kills_by_player: self.kills_by_player,
            total_spawned: self.total_spawned,
        }
    }

    pub(crate) fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            kills_by_player: self.kills_by_player,
            total_spawned: self.total_spawned,
        }
    }
}
