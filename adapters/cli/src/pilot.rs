//! Headless stand-ins for the player.

use std::time::Duration;

use clap::ValueEnum;
use glam::Vec2;
use lockdown_core::{Contact, PlayerSnapshot, WorldPoint};
use lockdown_world::{query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PLAYER_SPEED: f32 = 90.0;
const CONTACT_REACH: f32 = 20.0;
const HEADING_PERIOD: Duration = Duration::from_millis(500);

/// How the simulated player moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PilotKind {
    /// Walks toward the nearest enemy and attacks whatever it touches.
    Hunter,
    /// Drifts in random directions and swings at random.
    Wanderer,
}

#[derive(Debug)]
pub(crate) struct Pilot {
    kind: PilotKind,
    position: WorldPoint,
    heading: Vec2,
    since_heading: Duration,
    attacking: bool,
    rng: ChaCha8Rng,
}

impl Pilot {
    pub(crate) fn new(kind: PilotKind, start: WorldPoint, seed: u64) -> Self {
        Self {
            kind,
            position: start,
            heading: Vec2::ZERO,
            since_heading: HEADING_PERIOD,
            attacking: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Moves the player for `dt` and reports every enemy it now touches.
    pub(crate) fn step(&mut self, world: &World, dt: Duration) -> (PlayerSnapshot, Vec<Contact>) {
        let view = query::enemy_view(world);
        let here = Vec2::new(self.position.x, self.position.y);

        let (direction, attacking) = match self.kind {
            PilotKind::Hunter => {
                let nearest = view
                    .iter()
                    .map(|enemy| Vec2::new(enemy.position.x, enemy.position.y) - here)
                    .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));
                match nearest {
                    Some(offset) if offset.length() > CONTACT_REACH * 0.5 => {
                        (offset.normalize_or_zero(), true)
                    }
                    Some(_) => (Vec2::ZERO, true),
                    None => (Vec2::ZERO, false),
                }
            }
            PilotKind::Wanderer => {
                self.since_heading += dt;
                if self.since_heading >= HEADING_PERIOD {
                    self.since_heading = Duration::ZERO;
                    self.heading = Vec2::new(
                        self.rng.gen_range(-1.0..=1.0),
                        self.rng.gen_range(-1.0..=1.0),
                    )
                    .normalize_or_zero();
                    self.attacking = self.rng.gen_bool(0.5);
                }
                (self.heading, self.attacking)
            }
        };

        let moved = here + direction * PLAYER_SPEED * dt.as_secs_f32();
        let candidate = WorldPoint::new(moved.x, moved.y);
        if query::is_spawnable(world, candidate) {
            self.position = candidate;
        } else {
            self.heading = -self.heading;
        }

        let contacts = view
            .iter()
            .filter(|enemy| enemy.position.distance(self.position) <= CONTACT_REACH)
            .map(|enemy| Contact { enemy: enemy.id })
            .collect();
        let player = PlayerSnapshot {
            position: self.position,
            attacking,
        };
        (player, contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockdown_core::{Command, EnemyStats, Timestamp};
    use lockdown_world::{apply, WorldConfig};

    fn world() -> World {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        World::new(
            WorldConfig {
                initial_enemies: 0,
                ..WorldConfig::default()
            },
            Timestamp::ZERO,
            &mut rng,
        )
        .expect("default world")
    }

    #[test]
    fn hunter_walks_toward_the_nearest_enemy() {
        let mut world = world();
        let start = query::start_position(&world);
        let target = WorldPoint::new(start.x + 64.0, start.y);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                position: target,
                stats: EnemyStats::default(),
            },
            &mut events,
        );

        let mut pilot = Pilot::new(PilotKind::Hunter, start, 0);
        let (player, contacts) = pilot.step(&world, Duration::from_millis(100));

        assert!(player.attacking);
        assert!(player.position.x > start.x);
        assert!(contacts.is_empty());
    }

    #[test]
    fn contacts_cover_enemies_within_reach() {
        let mut world = world();
        let start = query::start_position(&world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                position: WorldPoint::new(start.x + 5.0, start.y),
                stats: EnemyStats::default(),
            },
            &mut events,
        );

        let mut pilot = Pilot::new(PilotKind::Hunter, start, 0);
        let (_, contacts) = pilot.step(&world, Duration::from_millis(100));

        assert_eq!(contacts.len(), 1);
    }

    #[test]
    fn idle_hunter_holds_still() {
        let world = world();
        let start = query::start_position(&world);
        let mut pilot = Pilot::new(PilotKind::Hunter, start, 0);
        let (player, contacts) = pilot.step(&world, Duration::from_millis(100));

        assert_eq!(player.position, start);
        assert!(!player.attacking);
        assert!(contacts.is_empty());
    }
}
