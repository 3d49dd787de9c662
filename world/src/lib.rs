#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Lockdown arena.

mod doors;
mod layout;
mod roster;
mod scoreboard;

use std::time::Duration;

use lockdown_core::{
    CellCoord, Command, EnemyStats, Event, GridSize, SpawnRejection, StopReason, Tile, Timestamp,
    WorldPoint, WELCOME_BANNER,
};
use rand::Rng;

pub use doors::{DoorLock, DoorRecord};
pub use layout::{generate, Grid, Layout, LayoutError, MIN_ROOM_SIDE};
pub use roster::{DeathCause, EnemyLife};

use roster::Roster;
use scoreboard::Scoreboard;

const DEFAULT_GRID_COLUMNS: u32 = 81;
const DEFAULT_GRID_ROWS: u32 = 81;
const DEFAULT_ROOM_SIDE: u32 = 15;
const DEFAULT_TILE_LENGTH: f32 = 32.0;
const DEFAULT_UNLOCK_DELAY: Duration = Duration::from_secs(10);
const DEFAULT_MAX_HEALTH: u32 = 100;
const DEFAULT_DEATH_LINGER: Duration = Duration::from_millis(500);

/// Parameters fixed when the world is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Dimensions of the tile grid.
    pub grid: GridSize,
    /// Side of the square central room in tiles.
    pub room_side: u32,
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Delay between the encounter start and the door unlock.
    pub unlock_delay: Duration,
    /// Enemies present when the encounter begins.
    pub initial_enemies: u32,
    /// Health the player starts with and can heal back up to.
    pub max_health: u32,
    /// Time a dead enemy lingers before it leaves the roster.
    pub death_linger: Duration,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS),
            room_side: DEFAULT_ROOM_SIDE,
            tile_length: DEFAULT_TILE_LENGTH,
            unlock_delay: DEFAULT_UNLOCK_DELAY,
            initial_enemies: 1,
            max_health: DEFAULT_MAX_HEALTH,
            death_linger: DEFAULT_DEATH_LINGER,
        }
    }
}

/// Represents the authoritative Lockdown world state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    layout: Layout,
    doors: DoorLock,
    roster: Roster,
    scoreboard: Scoreboard,
    now: Timestamp,
    room_completed: bool,
    spawning_stopped: Option<StopReason>,
    game_over: bool,
}

impl World {
    /// Builds the arena and arms the door lock relative to `started_at`.
    pub fn new<R>(config: WorldConfig, started_at: Timestamp, rng: &mut R) -> Result<Self, LayoutError>
    where
        R: Rng + ?Sized,
    {
        let layout = generate(config.grid, config.room_side, config.initial_enemies, rng)?;
        let doors = DoorLock::from_grid(layout.grid(), started_at, config.unlock_delay);
        tracing::debug!(
            columns = config.grid.columns(),
            rows = config.grid.rows(),
            doors = doors.records().len(),
            "arena generated"
        );
        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            layout,
            doors,
            roster: Roster::default(),
            scoreboard: Scoreboard::new(config.max_health),
            now: started_at,
            room_completed: false,
            spawning_stopped: None,
            game_over: false,
        })
    }

    fn tick(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        let now = now.max(self.now);
        let dt = now.saturating_duration_since(self.now);
        self.now = now;
        out_events.push(Event::TimeAdvanced { now, dt });

        let opened = self.doors.poll(now);
        if !opened.is_empty() {
            for door in &opened {
                if self.layout.grid_mut().open_door(*door) {
                    out_events.push(Event::DoorUnlocked { door: *door });
                }
            }
            tracing::info!(count = opened.len(), at_ms = now.as_millis(), "doors unlocked");
            out_events.push(Event::DoorsUnlocked {
                count: opened.len(),
            });
            if !self.room_completed {
                self.room_completed = true;
                out_events.push(Event::RoomCompleted);
            }
        }

        let grid = self.layout.grid();
        let tile_length = self.config.tile_length;
        self.roster.integrate(dt, |point| {
            cell_at(grid, tile_length, point).is_some_and(|cell| grid.is_passable(cell))
        });

        for enemy in self.roster.expire(now, self.config.death_linger) {
            out_events.push(Event::EnemyRemoved { enemy });
        }
    }

    fn spawn(&mut self, position: WorldPoint, stats: EnemyStats, out_events: &mut Vec<Event>) {
        let rejection = if self.spawning_stopped.is_some() {
            Some(SpawnRejection::SpawningStopped)
        } else {
            match cell_at(self.layout.grid(), self.config.tile_length, position) {
                None => Some(SpawnRejection::OutOfBounds),
                Some(cell) if !self.layout.grid().is_passable(cell) => {
                    Some(SpawnRejection::Blocked)
                }
                Some(_) => None,
            }
        };

        if let Some(reason) = rejection {
            out_events.push(Event::SpawnRejected { position, reason });
            return;
        }

        let enemy = self.roster.spawn(position, stats);
        self.scoreboard.record_spawn();
        out_events.push(Event::EnemySpawned {
            enemy,
            position,
            stats,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { now } => world.tick(now, out_events),
        Command::SpawnEnemy { position, stats } => world.spawn(position, stats, out_events),
        Command::SteerEnemy {
            enemy,
            behavior,
            velocity,
            next_decision_at,
        } => {
            if world
                .roster
                .steer(enemy, behavior, velocity, next_decision_at)
            {
                out_events.push(Event::EnemySteered {
                    enemy,
                    behavior,
                    velocity,
                });
            }
        }
        Command::SlayEnemy { enemy } => {
            if world.roster.retire(enemy, world.now, DeathCause::Slain) {
                world.scoreboard.record_kill();
                tracing::debug!(enemy = enemy.get(), "enemy slain");
                out_events.push(Event::EnemySlain { enemy });
            }
        }
        Command::WoundEnemy { enemy, damage } => match world.roster.wound(enemy, damage) {
            Some(0) => {
                if world.roster.retire(enemy, world.now, DeathCause::Slain) {
                    world.scoreboard.record_kill();
                    out_events.push(Event::EnemySlain { enemy });
                }
            }
            Some(vitality) => out_events.push(Event::EnemyWounded { enemy, vitality }),
            None => {}
        },
        Command::DamagePlayer { amount } => {
            let health = world.scoreboard.damage(amount);
            out_events.push(Event::PlayerDamaged { amount, health });
        }
        Command::HealPlayer { amount } => {
            let health = world.scoreboard.heal(amount);
            out_events.push(Event::PlayerHealed { amount, health });
        }
        Command::AdjustScore { delta } => {
            let score = world.scoreboard.adjust_score(delta);
            out_events.push(Event::ScoreAdjusted { delta, score });
        }
        Command::StopSpawning { reason } => {
            if world.spawning_stopped.is_none() {
                world.spawning_stopped = Some(reason);
                tracing::info!(?reason, "spawning stopped");
                out_events.push(Event::SpawningStopped { reason });
            }
        }
        Command::ForceClearEnemies => {
            for enemy in world.roster.retire_all(world.now, DeathCause::Cleared) {
                out_events.push(Event::EnemyCleared { enemy });
            }
        }
        Command::DeclareGameOver => {
            if !world.game_over {
                world.game_over = true;
                let summary = world.scoreboard.summary();
                tracing::info!(
                    score = summary.score,
                    kills = summary.kills_by_player,
                    spawned = summary.total_spawned,
                    "game over"
                );
                out_events.push(Event::GameOver { summary });
            }
        }
    }
}

/// Maps a world position to the grid cell containing it.
fn cell_at(grid: &Grid, tile_length: f32, point: WorldPoint) -> Option<CellCoord> {
    if !point.x.is_finite() || !point.y.is_finite() || tile_length <= 0.0 {
        return None;
    }
    let column = (point.x / tile_length).floor();
    let row = (point.y / tile_length).floor();
    if column < 0.0 || row < 0.0 {
        return None;
    }
    grid.tile(CellCoord::new(column as u32, row as u32))
        .map(Tile::cell)
}

fn tile_center(tile_length: f32, cell: CellCoord) -> WorldPoint {
    WorldPoint::new(
        cell.column() as f32 * tile_length + tile_length / 2.0,
        cell.row() as f32 * tile_length + tile_length / 2.0,
    )
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use lockdown_core::{
        CellCoord, EnemyId, EnemyView, GameSummary, ScoreSnapshot, StopReason, Timestamp,
        WorldPoint,
    };

    use super::{DoorLock, EnemyLife, Grid, Layout, World, WorldConfig};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Provides read-only access to the generated layout.
    #[must_use]
    pub fn layout(world: &World) -> &Layout {
        &world.layout
    }

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        world.layout.grid()
    }

    /// Provides read-only access to the door lock.
    #[must_use]
    pub fn door_lock(world: &World) -> &DoorLock {
        &world.doors
    }

    /// Time left before the doors unlock, clamped at zero.
    #[must_use]
    pub fn time_to_unlock(world: &World) -> Duration {
        world.doors.time_to_unlock(world.now)
    }

    /// Latest clock reading applied to the world.
    #[must_use]
    pub fn now(world: &World) -> Timestamp {
        world.now
    }

    /// World position at the centre of the player's start tile.
    #[must_use]
    pub fn start_position(world: &World) -> WorldPoint {
        super::tile_center(world.config.tile_length, world.layout.start())
    }

    /// World positions of the enemies present when the encounter begins.
    #[must_use]
    pub fn initial_enemy_positions(world: &World) -> Vec<WorldPoint> {
        world
            .layout
            .initial_enemies()
            .iter()
            .map(|cell| super::tile_center(world.config.tile_length, *cell))
            .collect()
    }

    /// Grid cell containing the world position, if it lies on the grid.
    #[must_use]
    pub fn cell_at(world: &World, point: WorldPoint) -> Option<CellCoord> {
        super::cell_at(world.layout.grid(), world.config.tile_length, point)
    }

    /// Reports whether an enemy could be created at the world position.
    #[must_use]
    pub fn is_spawnable(world: &World, point: WorldPoint) -> bool {
        cell_at(world, point).is_some_and(|cell| world.layout.grid().is_passable(cell))
    }

    /// Captures a read-only view of the living enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.roster.snapshots())
    }

    /// Lifecycle stage of an enemy; unknown identifiers report `Dead`.
    #[must_use]
    pub fn enemy_life(world: &World, enemy: EnemyId) -> EnemyLife {
        world.roster.life(enemy)
    }

    /// Current health, score and tallies.
    #[must_use]
    pub fn score(world: &World) -> ScoreSnapshot {
        world.scoreboard.snapshot()
    }

    /// Tallies in the form presented when the encounter ends.
    #[must_use]
    pub fn summary(world: &World) -> GameSummary {
        world.scoreboard.summary()
    }

    /// Whether the door unlock already completed the room.
    #[must_use]
    pub fn room_completed(world: &World) -> bool {
        world.room_completed
    }

    /// Reason the wave stopped, if it has.
    #[must_use]
    pub fn spawning_stopped(world: &World) -> Option<StopReason> {
        world.spawning_stopped
    }

    /// Whether the encounter ended in defeat.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }
}
