//! Enemy bodies owned by the world.

use std::time::Duration;

use lockdown_core::{
    BlockedSides, EnemyBehavior, EnemyId, EnemySnapshot, EnemyStats, Timestamp, Velocity,
    WorldPoint,
};

/// Why an enemy left the living set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Killed by the player; counts toward kills.
    Slain,
    /// Removed by a force-clear; never counts as a kill.
    Cleared,
}

/// Lifecycle of an enemy. Only `Alive` enemies collide or decide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyLife {
    /// Active and collidable.
    Alive,
    /// Playing its exit; no longer collidable.
    Dying {
        /// Time the enemy left the living set.
        since: Timestamp,
        /// Why the enemy left the living set.
        cause: DeathCause,
    },
    /// Gone from the roster.
    Dead,
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: WorldPoint,
    velocity: Velocity,
    behavior: EnemyBehavior,
    next_decision_at: Timestamp,
    vitality: u32,
    speed: f32,
    life: EnemyLife,
    blocked: BlockedSides,
}

impl Enemy {
    fn is_alive(&self) -> bool {
        self.life == EnemyLife::Alive
    }

    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            behavior: self.behavior,
            next_decision_at: self.next_decision_at,
            vitality: self.vitality,
            speed: self.speed,
            blocked: self.blocked,
        }
    }

    fn retire(&mut self, now: Timestamp, cause: DeathCause) {
        self.life = EnemyLife::Dying { since: now, cause };
        self.velocity = Velocity::ZERO;
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl Roster {
    pub(crate) fn spawn(&mut self, position: WorldPoint, stats: EnemyStats) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.enemies.push(Enemy {
            id,
            position,
            velocity: Velocity::ZERO,
            behavior: EnemyBehavior::Passive,
            next_decision_at: Timestamp::ZERO,
            vitality: stats.vitality.max(1),
            speed: stats.speed,
            life: EnemyLife::Alive,
            blocked: BlockedSides::default(),
        });
        id
    }

    pub(crate) fn life(&self, enemy: EnemyId) -> EnemyLife {
        self.enemies
            .iter()
            .find(|candidate| candidate.id == enemy)
            .map_or(EnemyLife::Dead, |candidate| candidate.life)
    }

    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.enemies
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(Enemy::snapshot)
            .collect()
    }

    /// Applies a behaviour decision. Returns `false` when the enemy is not alive.
    pub(crate) fn steer(
        &mut self,
        enemy: EnemyId,
        behavior: EnemyBehavior,
        velocity: Velocity,
        next_decision_at: Timestamp,
    ) -> bool {
        let Some(enemy) = self.alive_mut(enemy) else {
            return false;
        };
        enemy.behavior = behavior;
        enemy.velocity = velocity;
        enemy.next_decision_at = next_decision_at;
        true
    }

    /// Removes vitality from a living enemy, returning what remains.
    pub(crate) fn wound(&mut self, enemy: EnemyId, damage: u32) -> Option<u32> {
        let enemy = self.alive_mut(enemy)?;
        enemy.vitality = enemy.vitality.saturating_sub(damage);
        Some(enemy.vitality)
    }

    /// Moves a living enemy into its exit. Returns `false` when it was not alive.
    pub(crate) fn retire(&mut self, enemy: EnemyId, now: Timestamp, cause: DeathCause) -> bool {
        let Some(enemy) = self.alive_mut(enemy) else {
            return false;
        };
        enemy.retire(now, cause);
        true
    }

    /// Retires every living enemy, returning their identifiers in id order.
    pub(crate) fn retire_all(&mut self, now: Timestamp, cause: DeathCause) -> Vec<EnemyId> {
        let mut retired = Vec::new();
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            enemy.retire(now, cause);
            retired.push(enemy.id);
        }
        retired
    }

    /// Drops enemies whose exit has lasted at least `linger`.
    pub(crate) fn expire(&mut self, now: Timestamp, linger: Duration) -> Vec<EnemyId> {
        let expired: Vec<EnemyId> = self
            .enemies
            .iter()
            .filter(|enemy| match enemy.life {
                EnemyLife::Dying { since, .. } => now.saturating_duration_since(since) >= linger,
                EnemyLife::Alive | EnemyLife::Dead => false,
            })
            .map(|enemy| enemy.id)
            .collect();
        if !expired.is_empty() {
            self.enemies.retain(|enemy| !expired.contains(&enemy.id));
        }
        expired
    }

    /// Moves living enemies along their velocity one axis at a time, stopping
    /// and flagging any axis whose destination is not passable.
    pub(crate) fn integrate<F>(&mut self, dt: Duration, is_passable: F)
    where
        F: Fn(WorldPoint) -> bool,
    {
        let seconds = dt.as_secs_f32();
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            enemy.blocked = BlockedSides::default();
            if seconds == 0.0 {
                continue;
            }

            if enemy.velocity.x != 0.0 {
                let candidate = WorldPoint::new(
                    enemy.position.x + enemy.velocity.x * seconds,
                    enemy.position.y,
                );
                if is_passable(candidate) {
                    enemy.position = candidate;
                } else {
                    if enemy.velocity.x > 0.0 {
                        enemy.blocked.east = true;
                    } else {
                        enemy.blocked.west = true;
                    }
                    enemy.velocity.x = 0.0;
                }
            }

            if enemy.velocity.y != 0.0 {
                let candidate = WorldPoint::new(
                    enemy.position.x,
                    enemy.position.y + enemy.velocity.y * seconds,
                );
                if is_passable(candidate) {
                    enemy.position = candidate;
                } else {
                    if enemy.velocity.y > 0.0 {
                        enemy.blocked.south = true;
                    } else {
                        enemy.blocked.north = true;
                    }
                    enemy.velocity.y = 0.0;
                }
            }
        }
    }

    fn alive_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .iter_mut()
            .find(|candidate| candidate.id == enemy && candidate.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with(count: u32) -> (Roster, Vec<EnemyId>) {
        let mut roster = Roster::default();
        let ids = (0..count)
            .map(|index| {
                roster.spawn(
                    WorldPoint::new(100.0 + index as f32, 100.0),
                    EnemyStats::default(),
                )
            })
            .collect();
        (roster, ids)
    }

    #[test]
    fn identifiers_are_sequential() {
        let (_, ids) = roster_with(3);
        assert_eq!(ids, vec![EnemyId::new(0), EnemyId::new(1), EnemyId::new(2)]);
    }

    #[test]
    fn retired_enemy_cannot_retire_twice() {
        let (mut roster, ids) = roster_with(1);
        let now = Timestamp::from_millis(50);
        assert!(roster.retire(ids[0], now, DeathCause::Slain));
        assert!(!roster.retire(ids[0], now, DeathCause::Slain));
        assert_eq!(
            roster.life(ids[0]),
            EnemyLife::Dying {
                since: now,
                cause: DeathCause::Slain
            }
        );
        assert!(roster.snapshots().is_empty());
    }

    #[test]
    fn dying_enemies_expire_after_linger() {
        let (mut roster, ids) = roster_with(2);
        let _ = roster.retire(ids[0], Timestamp::from_millis(100), DeathCause::Cleared);
        let linger = Duration::from_millis(500);

        assert!(roster.expire(Timestamp::from_millis(599), linger).is_empty());
        assert_eq!(roster.expire(Timestamp::from_millis(600), linger), vec![ids[0]]);
        assert_eq!(roster.life(ids[0]), EnemyLife::Dead);
        assert_eq!(roster.life(ids[1]), EnemyLife::Alive);
    }

    #[test]
    fn blocked_axis_stops_and_flags() {
        let (mut roster, ids) = roster_with(1);
        assert!(roster.steer(
            ids[0],
            EnemyBehavior::Passive,
            Velocity::new(30.0, -30.0),
            Timestamp::from_millis(1_000),
        ));

        roster.integrate(Duration::from_secs(1), |point| point.y >= 90.0);

        let snapshot = &roster.snapshots()[0];
        assert_eq!(snapshot.position, WorldPoint::new(130.0, 100.0));
        assert_eq!(snapshot.velocity, Velocity::new(30.0, 0.0));
        assert!(snapshot.blocked.north);
        assert!(!snapshot.blocked.east);
    }

    #[test]
    fn wound_reports_remaining_vitality() {
        let mut roster = Roster::default();
        let id = roster.spawn(
            WorldPoint::new(0.0, 0.0),
            EnemyStats {
                vitality: 3,
                speed: 30.0,
            },
        );
        assert_eq!(roster.wound(id, 1), Some(2));
        let _ = roster.retire(id, Timestamp::ZERO, DeathCause::Slain);
        assert_eq!(roster.wound(id, 1), None);
    }
}
