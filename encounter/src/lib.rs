#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Encounter driver that pumps the world and systems once per tick.
//!
//! Each tick runs in a fixed order: the world advances its clock and unlocks
//! doors, the completion evaluator reacts to the unlock, the scheduler drains
//! due spawns, enemies decide, contacts are resolved and finally the
//! completion evaluator sees the consequences of combat. Every command a stage
//! emits is applied before the next stage runs, so later stages observe a
//! consistent world. Resulting events are then forwarded to the collaborators.

pub mod collaborators;

use lockdown_core::{
    Command, Contact, ContactOutcome, ContactResolution, Event, GameSummary, PlayerSnapshot,
    ScoreSnapshot, Timestamp,
};
use lockdown_system_behavior::{self as behavior, Behavior};
use lockdown_system_combat::{self as combat, CombatResolver};
use lockdown_system_completion::{self as completion, CompletionEvaluator};
use lockdown_system_spawning::{self as spawning, WaveScheduler};
use lockdown_world::{self as world, query, LayoutError, World, WorldConfig};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use collaborators::Collaborators;

/// Configuration of every component taking part in an encounter.
#[derive(Clone, Debug, PartialEq)]
pub struct EncounterConfig {
    /// Arena and player parameters.
    pub world: WorldConfig,
    /// Wave plan and spawn placement.
    pub spawning: spawning::Config,
    /// Enemy decision tuning.
    pub behavior: behavior::Config,
    /// Rewards and penalties of contacts.
    pub combat: combat::Config,
    /// Completion bonus and grace delay.
    pub completion: completion::Config,
    /// Seed from which every random stream of the encounter is derived.
    pub seed: u64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            spawning: spawning::Config::default(),
            behavior: behavior::Config::default(),
            combat: combat::Config::default(),
            completion: completion::Config::default(),
            seed: 0,
        }
    }
}

/// Reasons an encounter may fail to start.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum EncounterError {
    /// The arena could not be generated.
    #[error("invalid arena: {0}")]
    Layout(#[from] LayoutError),
    /// The wave could not be planned.
    #[error("invalid wave: {0}")]
    Schedule(#[from] spawning::ConfigError),
}

/// Everything that happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Events broadcast by the world, in order.
    pub events: Vec<Event>,
    /// Resolution of every contact supplied to the tick, in order.
    pub resolutions: Vec<ContactResolution>,
}

/// One play-through of the single-room arena.
#[derive(Debug)]
pub struct Encounter {
    config: EncounterConfig,
    started_at: Timestamp,
    world: World,
    scheduler: WaveScheduler,
    behavior: Behavior,
    combat: CombatResolver,
    completion: CompletionEvaluator,
    halted: bool,
}

impl Encounter {
    /// Builds the arena, places the initial enemies and primes the HUD.
    pub fn start<C>(
        config: EncounterConfig,
        now: Timestamp,
        collaborators: &mut C,
    ) -> Result<Self, EncounterError>
    where
        C: Collaborators + ?Sized,
    {
        let mut seeds = ChaCha8Rng::seed_from_u64(config.seed);
        let mut layout_rng = ChaCha8Rng::seed_from_u64(seeds.next_u64());
        let world = World::new(config.world, now, &mut layout_rng)?;
        let scheduler = WaveScheduler::new(
            spawning::Config {
                rng_seed: seeds.next_u64(),
                ..config.spawning
            },
            now,
        )?;
        let behavior = Behavior::new(behavior::Config {
            rng_seed: seeds.next_u64(),
            ..config.behavior.clone()
        });

        let mut encounter = Self {
            combat: CombatResolver::new(config.combat),
            completion: CompletionEvaluator::new(config.completion),
            config,
            started_at: now,
            world,
            scheduler,
            behavior,
            halted: false,
        };

        let mut commands: Vec<Command> = query::initial_enemy_positions(&encounter.world)
            .into_iter()
            .map(|position| Command::SpawnEnemy {
                position,
                stats: spawning_base_stats(&encounter.config.spawning.mode),
            })
            .collect();
        let mut events = Vec::new();
        apply_all(&mut encounter.world, &mut commands, &mut events);

        let score = query::score(&encounter.world);
        collaborators.set_health(score.health, score.max_health);
        collaborators.set_score(score.score);
        tracing::info!(
            seed = encounter.config.seed,
            initial_enemies = score.total_spawned,
            planned_spawns = encounter.scheduler.planned_spawns(),
            "{}",
            query::welcome_banner(&encounter.world)
        );
        Ok(encounter)
    }

    /// Advances the encounter to `now`.
    ///
    /// `player` is sampled from the physics collaborator and `contacts` lists
    /// every player–enemy overlap it detected since the previous tick. Once the
    /// encounter is over, ticks change nothing and every contact is ignored.
    pub fn tick<C>(
        &mut self,
        now: Timestamp,
        player: PlayerSnapshot,
        contacts: &[Contact],
        collaborators: &mut C,
    ) -> TickReport
    where
        C: Collaborators + ?Sized,
    {
        if self.halted {
            return TickReport {
                events: Vec::new(),
                resolutions: contacts.iter().map(ignored).collect(),
            };
        }

        let mut events = Vec::new();
        let mut commands = Vec::new();
        let mut resolutions = Vec::with_capacity(contacts.len());

        world::apply(&mut self.world, Command::Tick { now }, &mut events);

        self.completion
            .handle(&events, query::score(&self.world), &mut commands);
        apply_all(&mut self.world, &mut commands, &mut events);

        let world_view = &self.world;
        self.scheduler.handle(
            &events,
            player.position,
            |point| query::is_spawnable(world_view, point),
            &mut commands,
        );
        apply_all(&mut self.world, &mut commands, &mut events);

        self.behavior.handle(
            &events,
            &query::enemy_view(&self.world),
            Some(player.position),
            &mut commands,
        );
        apply_all(&mut self.world, &mut commands, &mut events);

        let combat_start = events.len();
        self.combat.handle(
            contacts,
            player.attacking,
            &query::enemy_view(&self.world),
            query::score(&self.world),
            &mut commands,
            &mut resolutions,
        );
        apply_all(&mut self.world, &mut commands, &mut events);

        self.completion.handle(
            &events[combat_start..],
            query::score(&self.world),
            &mut commands,
        );
        apply_all(&mut self.world, &mut commands, &mut events);

        self.dispatch(&events, collaborators);
        TickReport {
            events,
            resolutions,
        }
    }

    /// Restores player health outside of combat, clamped at the maximum.
    pub fn heal_player<C>(&mut self, amount: u32, collaborators: &mut C) -> Vec<Event>
    where
        C: Collaborators + ?Sized,
    {
        let mut events = Vec::new();
        if !self.halted {
            world::apply(
                &mut self.world,
                Command::HealPlayer { amount },
                &mut events,
            );
            self.dispatch(&events, collaborators);
        }
        events
    }

    /// Discards every piece of state and starts a fresh encounter from the
    /// same configuration.
    pub fn restart<C>(&mut self, now: Timestamp, collaborators: &mut C) -> Result<(), EncounterError>
    where
        C: Collaborators + ?Sized,
    {
        collaborators.reset_game();
        *self = Self::start(self.config.clone(), now, collaborators)?;
        tracing::info!("encounter restarted");
        Ok(())
    }

    /// Configuration the encounter was started with.
    #[must_use]
    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    /// Clock reading at which the encounter started.
    #[must_use]
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the wave scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    /// Read-only access to the completion evaluator.
    #[must_use]
    pub fn completion(&self) -> &CompletionEvaluator {
        &self.completion
    }

    /// Current health, score and tallies.
    #[must_use]
    pub fn score(&self) -> ScoreSnapshot {
        query::score(&self.world)
    }

    /// Tallies in the form shown on the game-over screen.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        query::summary(&self.world)
    }

    /// Whether the encounter ended in defeat and stopped ticking.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn dispatch<C>(&mut self, events: &[Event], collaborators: &mut C)
    where
        C: Collaborators + ?Sized,
    {
        for event in events {
            match event {
                Event::DoorsUnlocked { .. } => collaborators.recalculate(),
                Event::RoomCompleted => collaborators.on_room_completed(),
                Event::ScoreAdjusted { delta, .. } => collaborators.add_score(*delta),
                Event::PlayerDamaged { amount, .. } => collaborators.damage_player(*amount),
                Event::PlayerHealed { amount, .. } => collaborators.heal_player(*amount),
                Event::GameOver { summary } => {
                    self.halted = true;
                    collaborators.on_game_over(summary);
                }
                _ => {}
            }
        }
    }
}

fn apply_all(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        world::apply(world, command, events);
    }
}

fn ignored(contact: &Contact) -> ContactResolution {
    ContactResolution {
        enemy: contact.enemy,
        outcome: ContactOutcome::Ignored,
        blocking: false,
        stagger: false,
    }
}

fn spawning_base_stats(mode: &spawning::ScheduleMode) -> lockdown_core::EnemyStats {
    match mode {
        spawning::ScheduleMode::Fixed { stats, .. } => *stats,
        spawning::ScheduleMode::Scaled(wave) => lockdown_core::EnemyStats {
            vitality: wave.base_vitality.max(1),
            speed: wave.base_speed,
        },
    }
}
