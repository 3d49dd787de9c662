#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lockdown arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lockdown.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock to the provided reading.
    Tick {
        /// Current monotonic clock reading.
        now: Timestamp,
    },
    /// Requests that a new enemy be created at the provided position.
    SpawnEnemy {
        /// World position the enemy should occupy after spawning.
        position: WorldPoint,
        /// Durability and pace assigned to the new enemy.
        stats: EnemyStats,
    },
    /// Records a behaviour decision taken for an enemy.
    SteerEnemy {
        /// Identifier of the enemy being steered.
        enemy: EnemyId,
        /// Behaviour state the enemy enters.
        behavior: EnemyBehavior,
        /// Velocity the enemy's body should adopt.
        velocity: Velocity,
        /// Earliest time at which the enemy may decide again.
        next_decision_at: Timestamp,
    },
    /// Kills an enemy on behalf of the player, crediting the kill.
    SlayEnemy {
        /// Identifier of the enemy that dies.
        enemy: EnemyId,
    },
    /// Removes durability from an enemy without killing it.
    WoundEnemy {
        /// Identifier of the enemy that was struck.
        enemy: EnemyId,
        /// Vitality removed by the strike.
        damage: u32,
    },
    /// Removes health from the player.
    DamagePlayer {
        /// Amount of health removed.
        amount: u32,
    },
    /// Restores health to the player, clamped at the maximum.
    HealPlayer {
        /// Amount of health restored.
        amount: u32,
    },
    /// Adds a signed delta to the score, clamping the result at zero.
    AdjustScore {
        /// Signed score change.
        delta: i64,
    },
    /// Halts the wave for the remainder of the encounter.
    StopSpawning {
        /// Reason the wave halted.
        reason: StopReason,
    },
    /// Removes every living enemy without crediting kills.
    ForceClearEnemies,
    /// Ends the encounter in defeat.
    DeclareGameOver,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Clock reading after the tick.
        now: Timestamp,
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a door was unlocked and its tile became passable.
    DoorUnlocked {
        /// Cell the door occupied.
        door: CellCoord,
    },
    /// Announces that the whole unlock batch completed within this tick.
    DoorsUnlocked {
        /// Number of doors opened by the batch.
        count: usize,
    },
    /// Announces that the room was completed. Fires once per encounter.
    RoomCompleted,
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// World position the enemy occupies.
        position: WorldPoint,
        /// Durability and pace assigned to the enemy.
        stats: EnemyStats,
    },
    /// Reports that a spawn request could not be honoured.
    SpawnRejected {
        /// Position provided in the spawn request.
        position: WorldPoint,
        /// Specific reason the spawn failed.
        reason: SpawnRejection,
    },
    /// Confirms that an enemy adopted a new behaviour decision.
    EnemySteered {
        /// Identifier of the steered enemy.
        enemy: EnemyId,
        /// Behaviour state the enemy entered.
        behavior: EnemyBehavior,
        /// Velocity the enemy adopted.
        velocity: Velocity,
    },
    /// Confirms that an enemy survived a strike.
    EnemyWounded {
        /// Identifier of the wounded enemy.
        enemy: EnemyId,
        /// Vitality left after the strike.
        vitality: u32,
    },
    /// Confirms that the player killed an enemy.
    EnemySlain {
        /// Identifier of the slain enemy.
        enemy: EnemyId,
    },
    /// Confirms that an enemy was removed by a force-clear.
    EnemyCleared {
        /// Identifier of the cleared enemy.
        enemy: EnemyId,
    },
    /// Confirms that a dead enemy finished its exit and left the roster.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Confirms that the player lost health.
    PlayerDamaged {
        /// Health removed by the hit.
        amount: u32,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Confirms that the player regained health.
    PlayerHealed {
        /// Health restored.
        amount: u32,
        /// Health after healing.
        health: u32,
    },
    /// Confirms that the score changed.
    ScoreAdjusted {
        /// Signed delta that was requested.
        delta: i64,
        /// Score after clamping.
        score: u64,
    },
    /// Announces that the wave stopped. Fires once per encounter.
    SpawningStopped {
        /// Reason the wave halted.
        reason: StopReason,
    },
    /// Announces that the encounter ended in defeat.
    GameOver {
        /// Final tallies presented to the player.
        summary: GameSummary,
    },
}

/// Reasons the wave may stop spawning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    /// The scheduler reached the end of its spawn window.
    WindowElapsed,
    /// The room was completed before the window ended.
    RoomCompleted,
    /// The player ran out of health.
    GameOver,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// The requested position lies outside the grid.
    OutOfBounds,
    /// The requested position lies on an impassable tile.
    Blocked,
    /// The wave already stopped.
    SpawningStopped,
}

/// Monotonic clock reading measured from an arbitrary epoch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// Clock reading at the epoch.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Creates a timestamp from whole milliseconds since the epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Creates a timestamp from an elapsed duration since the epoch.
    #[must_use]
    pub const fn from_duration(elapsed: Duration) -> Self {
        Self(elapsed)
    }

    /// Elapsed time since the epoch.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Whole milliseconds since the epoch, saturating at `u64::MAX`.
    #[must_use]
    pub fn as_millis(&self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    /// Returns the reading shifted forward by `delay`.
    #[must_use]
    pub fn saturating_add(self, delay: Duration) -> Self {
        Self(self.0.saturating_add(delay))
    }

    /// Time elapsed since `earlier`, or zero when `earlier` lies in the future.
    #[must_use]
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

/// Cardinal directions on the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit step along the direction expressed as `(dx, dy)`.
    #[must_use]
    pub const fn unit(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Neighbouring tile in `direction`, or `None` when it would underflow.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.unit();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }
}

/// Dimensions of a grid or rectangle measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }
}

/// Axis-aligned rectangle expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: GridSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin tile and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: GridSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left tile that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole tiles.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Tile at the middle of the rectangle, rounding toward the origin.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(
            self.origin.column() + self.size.columns() / 2,
            self.origin.row() + self.size.rows() / 2,
        )
    }

    /// Reports whether the signed coordinate lies within the rectangle grown by
    /// `margin` tiles on every side.
    #[must_use]
    pub fn contains_with_margin(&self, x: i64, y: i64, margin: i64) -> bool {
        let left = i64::from(self.origin.column()) - margin;
        let top = i64::from(self.origin.row()) - margin;
        let right = i64::from(self.origin.column()) + i64::from(self.size.columns()) - 1 + margin;
        let bottom = i64::from(self.origin.row()) + i64::from(self.size.rows()) - 1 + margin;
        x >= left && x <= right && y >= top && y <= bottom
    }
}

/// Orientation of a door tile, fixed when the door is carved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorOrientation {
    /// Door set into a north or south wall.
    Horizontal,
    /// Door set into an east or west wall.
    Vertical,
}

impl DoorOrientation {
    /// Orientation used by a door carved into the wall facing `side`.
    #[must_use]
    pub const fn for_side(side: Direction) -> Self {
        match side {
            Direction::North | Direction::South => Self::Horizontal,
            Direction::East | Direction::West => Self::Vertical,
        }
    }
}

/// Semantic type of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Impassable wall.
    Wall,
    /// Passable ground.
    Floor,
    /// Locked door that blocks movement until the room unlocks.
    Door {
        /// Rendering variant of the door.
        orientation: DoorOrientation,
    },
}

impl TileKind {
    /// Reports whether entities may stand on the tile.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        matches!(self, Self::Floor)
    }
}

/// Single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    cell: CellCoord,
    kind: TileKind,
}

impl Tile {
    /// Creates a tile of `kind` located at `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: TileKind) -> Self {
        Self { cell, kind }
    }

    /// Location of the tile.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Semantic type of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, growing southward.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Position shifted by `velocity` applied for `dt`.
    #[must_use]
    pub fn advanced(self, velocity: Velocity, dt: Duration) -> Self {
        let seconds = dt.as_secs_f32();
        Self::new(self.x + velocity.x * seconds, self.y + velocity.y * seconds)
    }
}

/// Velocity expressed in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Velocity {
    /// Motionless velocity.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new velocity.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Velocity of magnitude `speed` along a cardinal direction.
    #[must_use]
    pub fn along(direction: Direction, speed: f32) -> Self {
        let (dx, dy) = direction.unit();
        Self::new(dx as f32 * speed, dy as f32 * speed)
    }

    /// Reports whether both components are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Durability and pace assigned to an enemy when it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Hit points; a strike of at least this much damage kills the enemy.
    pub vitality: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            vitality: 1,
            speed: 30.0,
        }
    }
}

/// Behaviour state of an enemy agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Idle or wandering.
    #[default]
    Passive,
    /// Pursuing the player.
    Chasing,
}

/// Flags reporting which sides of an enemy's body were blocked during the
/// last movement step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockedSides {
    /// Blocked toward decreasing rows.
    pub north: bool,
    /// Blocked toward increasing columns.
    pub east: bool,
    /// Blocked toward increasing rows.
    pub south: bool,
    /// Blocked toward decreasing columns.
    pub west: bool,
}

impl BlockedSides {
    /// Reports whether movement toward `direction` was blocked.
    #[must_use]
    pub const fn is_blocked(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }
}

/// Immutable representation of a living enemy used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current world position.
    pub position: WorldPoint,
    /// Current velocity.
    pub velocity: Velocity,
    /// Current behaviour state.
    pub behavior: EnemyBehavior,
    /// Earliest time at which the enemy may decide again.
    pub next_decision_at: Timestamp,
    /// Remaining hit points.
    pub vitality: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Sides blocked during the last movement step.
    pub blocked: BlockedSides,
}

/// Read-only snapshot describing every living enemy.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a living enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of living enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot of the player's tallies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Current score, never negative.
    pub score: u64,
    /// Enemies killed by the player.
    pub kills_by_player: u32,
    /// Enemies spawned during the encounter, including the initial ones.
    pub total_spawned: u32,
}

/// Final tallies presented when an encounter ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSummary {
    /// Final score.
    pub score: u64,
    /// Enemies killed by the player.
    pub kills_by_player: u32,
    /// Enemies spawned during the encounter.
    pub total_spawned: u32,
}

impl GameSummary {
    /// Fraction of spawned enemies killed by the player, or zero when none spawned.
    #[must_use]
    pub fn kill_ratio(&self) -> f64 {
        if self.total_spawned == 0 {
            return 0.0;
        }
        f64::from(self.kills_by_player) / f64::from(self.total_spawned)
    }
}

/// Player state sampled from the input/physics collaborator each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerSnapshot {
    /// Player position in world units.
    pub position: WorldPoint,
    /// Whether the player is mid-attack.
    pub attacking: bool,
}

/// Overlap between the player and one enemy reported by the collision detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Contact {
    /// Enemy touched by the player.
    pub enemy: EnemyId,
}

/// Outcome of resolving a single contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactOutcome {
    /// The attacking player killed the enemy.
    Slain,
    /// The attacking player struck an enemy that survived.
    Wounded,
    /// The enemy hit the player.
    PlayerHit,
    /// The contact referenced no living enemy or arrived after game over.
    Ignored,
}

/// Resolution of a contact handed back to the physics collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContactResolution {
    /// Enemy involved in the contact.
    pub enemy: EnemyId,
    /// What the contact did.
    pub outcome: ContactOutcome,
    /// Whether the contact should physically stop the player.
    pub blocking: bool,
    /// Whether the player should play a stagger reaction.
    pub stagger: bool,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, CellRect, Direction, EnemyId, GameSummary, GridSize, Timestamp};
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_refuses_to_underflow() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::South), Some(CellCoord::new(0, 1)));
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn rect_margin_grows_every_side_by_one() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(2, 3), GridSize::new(4, 5));
        assert!(rect.contains_with_margin(1, 2, 1));
        assert!(rect.contains_with_margin(6, 8, 1));
        assert!(!rect.contains_with_margin(7, 8, 1));
        assert!(!rect.contains_with_margin(0, 5, 1));
        assert!(!rect.contains_with_margin(1, 2, 0));
        assert_eq!(rect.center(), CellCoord::new(4, 5));
    }

    #[test]
    fn timestamp_difference_saturates() {
        let earlier = Timestamp::from_millis(500);
        let later = Timestamp::from_millis(1_250);
        assert_eq!(
            later.saturating_duration_since(earlier),
            Duration::from_millis(750)
        );
        assert_eq!(earlier.saturating_duration_since(later), Duration::ZERO);
    }

    #[test]
    fn kill_ratio_handles_empty_encounter() {
        let summary = GameSummary {
            score: 0,
            kills_by_player: 0,
            total_spawned: 0,
        };
        assert_eq!(summary.kill_ratio(), 0.0);

        let summary = GameSummary {
            score: 300,
            kills_by_player: 3,
            total_spawned: 4,
        };
        assert!((summary.kill_ratio() - 0.75).abs() < f64::EPSILON);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        assert_round_trip(&EnemyId::new(42));
    }

    #[test]
    fn cell_rect_round_trips_through_bincode() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(5, 7), GridSize::new(2, 3));
        assert_round_trip(&rect);
    }
}
