//! Contracts of the collaborators the encounter drives.

use std::time::{Duration, Instant};

use lockdown_core::{GameSummary, Timestamp};

/// Recomputes what the player can see.
pub trait Visibility {
    /// Invoked once per door-unlock batch.
    fn recalculate(&mut self);
}

/// Score and health display.
pub trait Hud {
    /// Adds a signed delta to the displayed score.
    fn add_score(&mut self, delta: i64);
    /// Replaces the displayed score.
    fn set_score(&mut self, value: u64);
    /// Shows the player losing health.
    fn damage_player(&mut self, amount: u32);
    /// Shows the player regaining health.
    fn heal_player(&mut self, amount: u32);
    /// Replaces the displayed health bar.
    fn set_health(&mut self, current: u32, max: u32);
    /// Returns the display to its initial state before a restart.
    fn reset_game(&mut self);
}

/// Scene transitions owned by the host application.
pub trait Lifecycle {
    /// Invoked once when the room completes.
    fn on_room_completed(&mut self);
    /// Invoked once when the player runs out of health.
    fn on_game_over(&mut self, summary: &GameSummary);
}

/// Monotonic clock sampled once per tick.
pub trait Clock {
    /// Current reading.
    fn now(&self) -> Timestamp;
}

/// Every collaborator the encounter notifies while ticking.
pub trait Collaborators: Visibility + Hud + Lifecycle {}

impl<T> Collaborators for T where T: Visibility + Hud + Lifecycle + ?Sized {}

/// Wall clock measuring time since its creation.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Starts a clock reading zero now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_duration(self.origin.elapsed())
    }
}

/// Clock advanced explicitly by its owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub const fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Moves the clock forward and returns the new reading.
    pub fn advance(&mut self, by: Duration) -> Timestamp {
        self.now = self.now.saturating_add(by);
        self.now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

/// Collaborator that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCollaborators;

impl Visibility for NullCollaborators {
    fn recalculate(&mut self) {}
}

impl Hud for NullCollaborators {
    fn add_score(&mut self, _delta: i64) {}

    fn set_score(&mut self, _value: u64) {}

    fn damage_player(&mut self, _amount: u32) {}

    fn heal_player(&mut self, _amount: u32) {}

    fn set_health(&mut self, _current: u32, _max: u32) {}

    fn reset_game(&mut self) {}
}

impl Lifecycle for NullCollaborators {
    fn on_room_completed(&mut self) {}

    fn on_game_over(&mut self, _summary: &GameSummary) {}
}

/// Single notification captured by [`RecordingCollaborators`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CollaboratorCall {
    /// `Visibility::recalculate`.
    Recalculate,
    /// `Hud::add_score`.
    AddScore(i64),
    /// `Hud::set_score`.
    SetScore(u64),
    /// `Hud::damage_player`.
    DamagePlayer(u32),
    /// `Hud::heal_player`.
    HealPlayer(u32),
    /// `Hud::set_health`.
    SetHealth {
        /// Current health.
        current: u32,
        /// Maximum health.
        max: u32,
    },
    /// `Hud::reset_game`.
    ResetGame,
    /// `Lifecycle::on_room_completed`.
    RoomCompleted,
    /// `Lifecycle::on_game_over`.
    GameOver(GameSummary),
}

/// Collaborator that records every notification in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingCollaborators {
    calls: Vec<CollaboratorCall>,
}

impl RecordingCollaborators {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far.
    #[must_use]
    pub fn calls(&self) -> &[CollaboratorCall] {
        &self.calls
    }

    /// Number of notifications matching `predicate`.
    #[must_use]
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CollaboratorCall) -> bool,
    {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Forgets every notification received so far.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Visibility for RecordingCollaborators {
    fn recalculate(&mut self) {
        self.calls.push(CollaboratorCall::Recalculate);
    }
}

impl Hud for RecordingCollaborators {
    fn add_score(&mut self, delta: i64) {
        self.calls.push(CollaboratorCall::AddScore(delta));
    }

    fn set_score(&mut self, value: u64) {
        self.calls.push(CollaboratorCall::SetScore(value));
    }

    fn damage_player(&mut self, amount: u32) {
        self.calls.push(CollaboratorCall::DamagePlayer(amount));
    }

    fn heal_player(&mut self, amount: u32) {
        self.calls.push(CollaboratorCall::HealPlayer(amount));
    }

    fn set_health(&mut self, current: u32, max: u32) {
        self.calls.push(CollaboratorCall::SetHealth { current, max });
    }

    fn reset_game(&mut self) {
        self.calls.push(CollaboratorCall::ResetGame);
    }
}

impl Lifecycle for RecordingCollaborators {
    fn on_room_completed(&mut self) {
        self.calls.push(CollaboratorCall::RoomCompleted);
    }

    fn on_game_over(&mut self, summary: &GameSummary) {
        self.calls.push(CollaboratorCall::GameOver(*summary));
    }
}
