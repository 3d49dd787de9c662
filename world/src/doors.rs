//! Timed lock shared by every door of the room.

use std::time::Duration;

use lockdown_core::{CellCoord, TileKind, Timestamp};

use crate::layout::Grid;

/// Lock state of a single door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DoorRecord {
    cell: CellCoord,
    unlocked: bool,
}

impl DoorRecord {
    /// Cell occupied by the door.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Whether the door has been unlocked. Never reverts once set.
    #[must_use]
    pub const fn unlocked(&self) -> bool {
        self.unlocked
    }
}

/// Single deadline that unlocks every door in one batch.
#[derive(Clone, Debug)]
pub struct DoorLock {
    deadline: Timestamp,
    records: Vec<DoorRecord>,
}

impl DoorLock {
    /// Creates a lock over `doors` that opens `delay` after `started_at`.
    #[must_use]
    pub fn new(doors: Vec<CellCoord>, started_at: Timestamp, delay: Duration) -> Self {
        let records = doors
            .into_iter()
            .map(|cell| DoorRecord {
                cell,
                unlocked: false,
            })
            .collect();
        Self {
            deadline: started_at.saturating_add(delay),
            records,
        }
    }

    /// Creates a lock over every door tile found in `grid`.
    #[must_use]
    pub fn from_grid(grid: &Grid, started_at: Timestamp, delay: Duration) -> Self {
        let doors: Vec<CellCoord> = grid
            .tiles()
            .filter(|tile| matches!(tile.kind(), TileKind::Door { .. }))
            .map(|tile| tile.cell())
            .collect();
        if doors.is_empty() {
            tracing::warn!("layout produced no doors; the room will never unlock");
        }
        Self::new(doors, started_at, delay)
    }

    /// Absolute time at which the doors unlock.
    #[must_use]
    pub const fn deadline(&self) -> Timestamp {
        self.deadline
    }

    /// Lock state of every door in scan order.
    #[must_use]
    pub fn records(&self) -> &[DoorRecord] {
        &self.records
    }

    /// Time left before the deadline, clamped at zero.
    #[must_use]
    pub fn time_to_unlock(&self, now: Timestamp) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Reports whether every door is unlocked. A lock without doors never opens.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(DoorRecord::unlocked)
    }

    /// Unlocks every still-locked door once `now` reaches the deadline.
    ///
    /// Returns the cells unlocked by this call. After the batch has run every
    /// later call returns an empty list without touching state.
    pub fn poll(&mut self, now: Timestamp) -> Vec<CellCoord> {
        if now < self.deadline {
            return Vec::new();
        }

        let mut opened = Vec::new();
        for record in self.records.iter_mut().filter(|record| !record.unlocked) {
            record.unlocked = true;
            opened.push(record.cell);
        }
        opened
    }
}
