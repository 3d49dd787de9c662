#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy decision system: passive wandering versus chasing the player.
//!
//! Every enemy carries a next-decision timestamp. Enemies whose timestamp has
//! not been reached are skipped, which keeps re-evaluation cheap while
//! wandering and responsive while chasing.

use std::{ops::RangeInclusive, time::Duration};

use glam::Vec2;
use lockdown_core::{
    Command, Direction, EnemyBehavior, EnemySnapshot, EnemyView, Event, Timestamp, Velocity,
    WorldPoint,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Order in which wandering directions are considered.
const WANDER_ORDER: [Direction; 4] = [
    Direction::West,
    Direction::East,
    Direction::North,
    Direction::South,
];

/// Configuration parameters required to construct the behaviour system.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Distance within which an enemy notices the player.
    pub detection_radius: f32,
    /// Delay between decisions while chasing.
    pub chase_cadence: Duration,
    /// Range of delays between decisions while passive, in milliseconds.
    pub wander_cadence_ms: RangeInclusive<u64>,
    /// Seed of the wandering generator.
    pub rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detection_radius: 120.0,
            chase_cadence: Duration::from_millis(100),
            wander_cadence_ms: 1_000..=3_000,
            rng_seed: 0,
        }
    }
}

/// Pure system that steers enemies once their decision cooldown has elapsed.
#[derive(Debug)]
pub struct Behavior {
    detection_radius: f32,
    chase_cadence: Duration,
    wander_cadence_ms: RangeInclusive<u64>,
    rng: ChaCha8Rng,
}

impl Behavior {
    /// Creates a new behaviour system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let Config {
            detection_radius,
            chase_cadence,
            wander_cadence_ms,
            rng_seed,
        } = config;
        let wander_cadence_ms = if wander_cadence_ms.start() <= wander_cadence_ms.end() {
            wander_cadence_ms
        } else {
            *wander_cadence_ms.end()..=*wander_cadence_ms.start()
        };
        Self {
            detection_radius,
            chase_cadence,
            wander_cadence_ms,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        }
    }

    /// Consumes world events and the enemy view to emit steering commands.
    ///
    /// Decisions are only taken on ticks. `player` is `None` while no player
    /// body exists, in which case every deciding enemy wanders.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: Option<WorldPoint>,
        out: &mut Vec<Command>,
    ) {
        let Some(now) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { now, .. } => Some(*now),
            _ => None,
        }) else {
            return;
        };

        for enemy in enemies.iter() {
            if now < enemy.next_decision_at {
                continue;
            }

            let command = match player.filter(|target| self.in_range(enemy, *target)) {
                Some(target) => self.chase(enemy, target, now),
                None => self.wander(enemy, now),
            };
            out.push(command);
        }
    }

    fn in_range(&self, enemy: &EnemySnapshot, player: WorldPoint) -> bool {
        enemy.position.distance(player) <= self.detection_radius
    }

    fn chase(&self, enemy: &EnemySnapshot, player: WorldPoint, now: Timestamp) -> Command {
        let heading = Vec2::new(player.x - enemy.position.x, player.y - enemy.position.y)
            .normalize_or_zero()
            * enemy.speed;
        Command::SteerEnemy {
            enemy: enemy.id,
            behavior: EnemyBehavior::Chasing,
            velocity: Velocity::new(heading.x, heading.y),
            next_decision_at: now.saturating_add(self.chase_cadence),
        }
    }

    fn wander(&mut self, enemy: &EnemySnapshot, now: Timestamp) -> Command {
        let velocity = if self.rng.gen_bool(0.5) {
            Velocity::ZERO
        } else {
            let first = self.rng.gen_range(0..WANDER_ORDER.len());
            match WANDER_ORDER[first..]
                .iter()
                .find(|direction| !enemy.blocked.is_blocked(**direction))
            {
                Some(direction) => Velocity::along(*direction, enemy.speed),
                None => {
                    tracing::debug!(enemy = enemy.id.get(), "no open direction to wander");
                    Velocity::ZERO
                }
            }
        };

        let delay = self.rng.gen_range(self.wander_cadence_ms.clone());
        Command::SteerEnemy {
            enemy: enemy.id,
            behavior: EnemyBehavior::Passive,
            velocity,
            next_decision_at: now.saturating_add(Duration::from_millis(delay)),
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockdown_core::{BlockedSides, EnemyId};

    fn snapshot(position: WorldPoint, blocked: BlockedSides) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(0),
            position,
            velocity: Velocity::ZERO,
            behavior: EnemyBehavior::Passive,
            next_decision_at: Timestamp::ZERO,
            vitality: 1,
            speed: 30.0,
            blocked,
        }
    }

    #[test]
    fn fully_blocked_enemy_stands_still() {
        let mut behavior = Behavior::default();
        let blocked = BlockedSides {
            north: true,
            east: true,
            south: true,
            west: true,
        };
        let enemy = snapshot(WorldPoint::new(0.0, 0.0), blocked);
        for _ in 0..32 {
            match behavior.wander(&enemy, Timestamp::ZERO) {
                Command::SteerEnemy { velocity, .. } => assert!(velocity.is_zero()),
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn wandering_never_heads_into_a_blocked_side() {
        let mut behavior = Behavior::default();
        let blocked = BlockedSides {
            north: false,
            east: true,
            south: false,
            west: true,
        };
        let enemy = snapshot(WorldPoint::new(0.0, 0.0), blocked);
        for _ in 0..64 {
            if let Command::SteerEnemy { velocity, .. } = behavior.wander(&enemy, Timestamp::ZERO)
            {
                assert_eq!(velocity.x, 0.0);
            }
        }
    }

    #[test]
    fn chase_speed_matches_enemy_speed() {
        let behavior = Behavior::default();
        let enemy = snapshot(WorldPoint::new(0.0, 0.0), BlockedSides::default());
        match behavior.chase(&enemy, WorldPoint::new(30.0, 40.0), Timestamp::ZERO) {
            Command::SteerEnemy { velocity, .. } => {
                assert!((velocity.x - 18.0).abs() < 1e-4);
                assert!((velocity.y - 24.0).abs() < 1e-4);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
