use std::time::Duration;

use lockdown_core::{CellCoord, Command, Direction, EnemyStats, Event, GridSize, TileKind, Timestamp};
use lockdown_world::{apply, generate, query, World, WorldConfig};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn passable_neighbours(grid: &lockdown_world::Grid, cell: CellCoord) -> usize {
    Direction::ALL
        .iter()
        .filter_map(|direction| cell.step(*direction))
        .filter(|neighbour| grid.is_passable(*neighbour))
        .count()
}

proptest! {
    #[test]
    fn every_layout_has_four_doors_with_one_corridor(
        side in 3u32..=21,
        extra_columns in 0u32..=30,
        extra_rows in 0u32..=30,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let size = GridSize::new(side + extra_columns, side + extra_rows);
        let layout = generate(size, side, 1, &mut rng).expect("room fits");

        prop_assert_eq!(layout.rooms().len(), 1);
        let doors: Vec<CellCoord> = layout
            .grid()
            .tiles()
            .filter(|tile| matches!(tile.kind(), TileKind::Door { .. }))
            .map(|tile| tile.cell())
            .collect();
        prop_assert_eq!(doors.len(), 4);
        for door in doors {
            prop_assert_eq!(passable_neighbours(layout.grid(), door), 1);
        }
        prop_assert!(layout.grid().is_passable(layout.start()));
    }

    #[test]
    fn unlock_is_simultaneous_and_countdown_never_grows(
        steps in prop::collection::vec(0u64..=1_500, 1..40),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut world = World::new(WorldConfig::default(), Timestamp::ZERO, &mut rng)
            .expect("default world");

        let mut now = 0u64;
        let mut previous_remaining = query::time_to_unlock(&world);
        let mut completions = 0;
        for step in steps {
            now += step;
            let mut events = Vec::new();
            apply(&mut world, Command::Tick { now: Timestamp::from_millis(now) }, &mut events);

            let remaining = query::time_to_unlock(&world);
            prop_assert!(remaining <= previous_remaining);
            previous_remaining = remaining;

            completions += events.iter().filter(|event| **event == Event::RoomCompleted).count();
            let records = query::door_lock(&world).records();
            let unlocked = records.iter().filter(|record| record.unlocked()).count();
            prop_assert!(unlocked == 0 || unlocked == records.len());
            prop_assert_eq!(unlocked == records.len(), now >= 10_000);
        }

        prop_assert_eq!(completions, usize::from(now >= 10_000));
        if now >= 10_000 {
            prop_assert_eq!(previous_remaining, Duration::ZERO);
        }
    }

    #[test]
    fn kills_never_exceed_spawns(actions in prop::collection::vec(0u8..4, 0..60)) {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut world = World::new(WorldConfig::default(), Timestamp::ZERO, &mut rng)
            .expect("default world");
        let start = query::start_position(&world);
        let mut now = 0u64;

        for action in actions {
            let mut events = Vec::new();
            let command = match action {
                0 => Command::SpawnEnemy { position: start, stats: EnemyStats::default() },
                1 => match query::enemy_view(&world).iter().next() {
                    Some(enemy) => Command::SlayEnemy { enemy: enemy.id },
                    None => Command::SlayEnemy { enemy: lockdown_core::EnemyId::new(0) },
                },
                2 => Command::ForceClearEnemies,
                _ => {
                    now += 250;
                    Command::Tick { now: Timestamp::from_millis(now) }
                }
            };
            apply(&mut world, command, &mut events);

            let score = query::score(&world);
            prop_assert!(score.kills_by_player <= score.total_spawned);
        }
    }
}
