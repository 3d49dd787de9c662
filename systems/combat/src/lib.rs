#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns player–enemy contacts into combat commands.

use lockdown_core::{
    Command, Contact, ContactOutcome, ContactResolution, EnemyId, EnemyView, ScoreSnapshot,
    StopReason,
};

/// Configuration parameters required to construct the combat resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Score awarded for every kill.
    pub kill_reward: i64,
    /// Score removed whenever an enemy hits the player.
    pub hit_penalty: i64,
    /// Health removed whenever an enemy hits the player.
    pub hit_damage: u32,
    /// Vitality removed from an enemy by an attacking contact.
    pub attack_damage: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kill_reward: 100,
            hit_penalty: 20,
            hit_damage: 20,
            attack_damage: 1,
        }
    }
}

/// Combat resolver holding the single game-over latch of an encounter.
#[derive(Debug, Default)]
pub struct CombatResolver {
    config: Config,
    game_over: bool,
    struck: Vec<(EnemyId, u32)>,
    scratch: Vec<Command>,
}

impl CombatResolver {
    /// Creates a new combat resolver using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Resolves the contacts reported for one tick.
    ///
    /// Contacts are resolved in order against a running projection of enemy
    /// vitality and player health, so an enemy touched twice in one batch is
    /// never killed twice and the game-over commands are queued on the exact
    /// contact that empties the health bar.
    pub fn handle(
        &mut self,
        contacts: &[Contact],
        player_attacking: bool,
        enemies: &EnemyView,
        score: ScoreSnapshot,
        out: &mut Vec<Command>,
        resolutions: &mut Vec<ContactResolution>,
    ) {
        if contacts.is_empty() {
            return;
        }

        self.struck.clear();
        self.scratch.clear();
        let mut health = score.health;

        for contact in contacts {
            let outcome = if self.game_over {
                ContactOutcome::Ignored
            } else {
                match self.vitality(contact.enemy, enemies) {
                    None | Some(0) => ContactOutcome::Ignored,
                    Some(vitality) if player_attacking => self.strike(contact.enemy, vitality),
                    Some(_) => {
                        health = self.hit_player(contact.enemy, health);
                        ContactOutcome::PlayerHit
                    }
                }
            };

            resolutions.push(ContactResolution {
                enemy: contact.enemy,
                outcome,
                blocking: outcome == ContactOutcome::PlayerHit,
                stagger: outcome == ContactOutcome::PlayerHit,
            });
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    /// Whether this resolver already declared the game over.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn vitality(&self, enemy: EnemyId, enemies: &EnemyView) -> Option<u32> {
        if let Some((_, remaining)) = self.struck.iter().find(|(id, _)| *id == enemy) {
            return Some(*remaining);
        }
        enemies.get(enemy).map(|snapshot| snapshot.vitality)
    }

    fn remember(&mut self, enemy: EnemyId, remaining: u32) {
        match self.struck.iter_mut().find(|(id, _)| *id == enemy) {
            Some(entry) => entry.1 = remaining,
            None => self.struck.push((enemy, remaining)),
        }
    }

    fn strike(&mut self, enemy: EnemyId, vitality: u32) -> ContactOutcome {
        let damage = self.config.attack_damage;
        if vitality <= damage {
            self.remember(enemy, 0);
            self.scratch.push(Command::SlayEnemy { enemy });
            self.scratch.push(Command::AdjustScore {
                delta: self.config.kill_reward,
            });
            tracing::debug!(enemy = enemy.get(), "player killed enemy");
            ContactOutcome::Slain
        } else {
            self.remember(enemy, vitality - damage);
            self.scratch.push(Command::WoundEnemy { enemy, damage });
            ContactOutcome::Wounded
        }
    }

    fn hit_player(&mut self, enemy: EnemyId, health: u32) -> u32 {
        let health = health.saturating_sub(self.config.hit_damage);
        self.scratch.push(Command::AdjustScore {
            delta: -self.config.hit_penalty,
        });
        self.scratch.push(Command::DamagePlayer {
            amount: self.config.hit_damage,
        });
        tracing::debug!(enemy = enemy.get(), health, "enemy hit player");

        if health == 0 && !self.game_over {
            self.game_over = true;
            tracing::info!("player health exhausted");
            self.scratch.push(Command::StopSpawning {
                reason: StopReason::GameOver,
            });
            self.scratch.push(Command::ForceClearEnemies);
            self.scratch.push(Command::DeclareGameOver);
        }
        health
    }
}
