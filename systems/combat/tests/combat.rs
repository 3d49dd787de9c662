use lockdown_core::{
    Command, Contact, ContactOutcome, EnemyId, EnemyStats, Event, StopReason, Timestamp,
};
use lockdown_system_combat::{CombatResolver, Config};
use lockdown_world::{self as world, query, World, WorldConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn world_with_enemies(count: usize) -> (World, Vec<EnemyId>) {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut world =
        World::new(WorldConfig::default(), Timestamp::ZERO, &mut rng).expect("default world");
    let position = query::start_position(&world);
    let mut events = Vec::new();
    for _ in 0..count {
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                position,
                stats: EnemyStats::default(),
            },
            &mut events,
        );
    }
    let ids = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .collect();
    (world, ids)
}

fn resolve(
    world: &mut World,
    resolver: &mut CombatResolver,
    enemy: EnemyId,
    attacking: bool,
) -> (ContactOutcome, Vec<Event>) {
    let mut commands = Vec::new();
    let mut resolutions = Vec::new();
    resolver.handle(
        &[Contact { enemy }],
        attacking,
        &query::enemy_view(world),
        query::score(world),
        &mut commands,
        &mut resolutions,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    (resolutions[0].outcome, events)
}

#[test]
fn attacking_contact_kills_and_rewards() {
    let (mut world, ids) = world_with_enemies(2);
    let mut resolver = CombatResolver::new(Config::default());

    let (outcome, _) = resolve(&mut world, &mut resolver, ids[0], true);

    assert_eq!(outcome, ContactOutcome::Slain);
    assert_eq!(query::enemy_view(&world).len(), 1);
    let score = query::score(&world);
    assert_eq!(score.kills_by_player, 1);
    assert_eq!(score.score, 100);
    assert_eq!(score.health, 100);
}

#[test]
fn passive_contact_hurts_player_and_keeps_enemy() {
    let (mut world, ids) = world_with_enemies(1);
    let mut resolver = CombatResolver::new(Config::default());
    let mut events = Vec::new();
    world::apply(&mut world, Command::AdjustScore { delta: 100 }, &mut events);

    let (outcome, _) = resolve(&mut world, &mut resolver, ids[0], false);

    assert_eq!(outcome, ContactOutcome::PlayerHit);
    assert_eq!(query::enemy_view(&world).len(), 1);
    let score = query::score(&world);
    assert_eq!(score.health, 80);
    assert_eq!(score.score, 80);
    assert_eq!(score.kills_by_player, 0);
}

#[test]
fn dead_enemy_cannot_be_killed_again() {
    let (mut world, ids) = world_with_enemies(1);
    let mut resolver = CombatResolver::new(Config::default());

    let _ = resolve(&mut world, &mut resolver, ids[0], true);
    let (outcome, events) = resolve(&mut world, &mut resolver, ids[0], true);

    assert_eq!(outcome, ContactOutcome::Ignored);
    assert!(events.is_empty());
    assert_eq!(query::score(&world).kills_by_player, 1);
}

#[test]
fn fifth_hit_ends_the_game_exactly_once() {
    let (mut world, ids) = world_with_enemies(1);
    let mut resolver = CombatResolver::new(Config::default());

    let mut game_overs = 0;
    for hit in 1..=5 {
        let (_, events) = resolve(&mut world, &mut resolver, ids[0], false);
        game_overs += events
            .iter()
            .filter(|event| matches!(event, Event::GameOver { .. }))
            .count();
        if hit < 5 {
            assert_eq!(game_overs, 0);
        }
    }

    assert_eq!(game_overs, 1);
    assert_eq!(query::score(&world).health, 0);
    assert!(query::is_game_over(&world));
    assert_eq!(query::spawning_stopped(&world), Some(StopReason::GameOver));
    assert!(query::enemy_view(&world).is_empty());

    let (outcome, events) = resolve(&mut world, &mut resolver, ids[0], false);
    assert_eq!(outcome, ContactOutcome::Ignored);
    assert!(events.is_empty());
}
