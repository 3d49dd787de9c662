use std::time::Duration;

use lockdown_core::{
    BlockedSides, Command, EnemyBehavior, EnemyId, EnemySnapshot, EnemyStats, EnemyView, Event,
    Timestamp, Velocity, WorldPoint,
};
use lockdown_system_behavior::{Behavior, Config};
use lockdown_world::{self as world, query, World, WorldConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn enemy_at(id: u32, position: WorldPoint, next_decision_at: Timestamp) -> EnemySnapshot {
    EnemySnapshot {
        id: EnemyId::new(id),
        position,
        velocity: Velocity::ZERO,
        behavior: EnemyBehavior::Passive,
        next_decision_at,
        vitality: 1,
        speed: 30.0,
        blocked: BlockedSides::default(),
    }
}

fn tick_event(millis: u64) -> Event {
    Event::TimeAdvanced {
        now: Timestamp::from_millis(millis),
        dt: Duration::from_millis(16),
    }
}

fn decision(command: &Command) -> (EnemyBehavior, Velocity, Timestamp) {
    match command {
        Command::SteerEnemy {
            behavior,
            velocity,
            next_decision_at,
            ..
        } => (*behavior, *velocity, *next_decision_at),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn enemy_within_radius_chases_with_short_cadence() {
    let mut behavior = Behavior::default();
    let view = EnemyView::from_snapshots(vec![enemy_at(
        0,
        WorldPoint::new(100.0, 100.0),
        Timestamp::ZERO,
    )]);

    let mut commands = Vec::new();
    behavior.handle(
        &[tick_event(500)],
        &view,
        Some(WorldPoint::new(100.0, 220.0)),
        &mut commands,
    );

    assert_eq!(commands.len(), 1);
    let (state, velocity, next) = decision(&commands[0]);
    assert_eq!(state, EnemyBehavior::Chasing);
    assert_eq!(velocity, Velocity::new(0.0, 30.0));
    assert_eq!(next, Timestamp::from_millis(600));
}

#[test]
fn enemy_beyond_radius_wanders_with_long_cadence() {
    let mut behavior = Behavior::new(Config {
        rng_seed: 77,
        ..Config::default()
    });
    let view = EnemyView::from_snapshots(vec![enemy_at(
        0,
        WorldPoint::new(100.0, 100.0),
        Timestamp::ZERO,
    )]);

    for round in 0..20u64 {
        let now = round * 5_000;
        let mut commands = Vec::new();
        behavior.handle(
            &[tick_event(now)],
            &view,
            Some(WorldPoint::new(100.0, 221.0)),
            &mut commands,
        );
        let (state, velocity, next) = decision(&commands[0]);
        assert_eq!(state, EnemyBehavior::Passive);
        assert!(velocity.is_zero() || velocity.x.abs() == 30.0 || velocity.y.abs() == 30.0);
        let delay = next.saturating_duration_since(Timestamp::from_millis(now));
        assert!(delay >= Duration::from_millis(1_000));
        assert!(delay <= Duration::from_millis(3_000));
    }
}

#[test]
fn missing_player_means_wandering() {
    let mut behavior = Behavior::default();
    let view = EnemyView::from_snapshots(vec![enemy_at(
        0,
        WorldPoint::new(100.0, 100.0),
        Timestamp::ZERO,
    )]);
    let mut commands = Vec::new();
    behavior.handle(&[tick_event(0)], &view, None, &mut commands);
    assert_eq!(decision(&commands[0]).0, EnemyBehavior::Passive);
}

#[test]
fn enemies_wait_for_their_decision_time() {
    let mut behavior = Behavior::default();
    let view = EnemyView::from_snapshots(vec![
        enemy_at(0, WorldPoint::new(0.0, 0.0), Timestamp::from_millis(1_000)),
        enemy_at(1, WorldPoint::new(0.0, 0.0), Timestamp::from_millis(200)),
    ]);

    let mut commands = Vec::new();
    behavior.handle(&[tick_event(500)], &view, None, &mut commands);
    assert_eq!(commands.len(), 1);
    assert!(matches!(
        commands[0],
        Command::SteerEnemy { enemy, .. } if enemy == EnemyId::new(1)
    ));
}

#[test]
fn no_decisions_without_a_tick() {
    let mut behavior = Behavior::default();
    let view = EnemyView::from_snapshots(vec![enemy_at(
        0,
        WorldPoint::new(0.0, 0.0),
        Timestamp::ZERO,
    )]);
    let mut commands = Vec::new();
    behavior.handle(&[Event::RoomCompleted], &view, None, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn chasing_enemy_closes_in_on_player_in_world() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut world =
        World::new(WorldConfig::default(), Timestamp::ZERO, &mut rng).expect("default world");
    let player = query::start_position(&world);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            position: WorldPoint::new(player.x + 90.0, player.y),
            stats: EnemyStats::default(),
        },
        &mut events,
    );

    let mut behavior = Behavior::default();
    for frame in 0..=60u64 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                now: Timestamp::from_millis(frame * 50),
            },
            &mut events,
        );
        let mut commands = Vec::new();
        behavior.handle(&events, &query::enemy_view(&world), Some(player), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    let enemy = query::enemy_view(&world).into_vec().remove(0);
    assert_eq!(enemy.behavior, EnemyBehavior::Chasing);
    assert!(enemy.position.distance(player) < 10.0);
}
