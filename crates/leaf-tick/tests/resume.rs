//! End-to-end runs against a generated world, including restarts.

use core::num::NonZeroU32;

use leaf_spiral::{SpiralIter, offset_for_index};
use leaf_tick::{
    ChannelSink, DECAY_MASK, FixScheduler, ImmediateTicker, MemoryStore, ProgressState, RunState,
    TickOutcome, TracingSink, run_ticks,
};
use leaf_world::{Generator, MemoryWorld, TilePos};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn world() -> MemoryWorld {
    let generator = Generator {
        tree_rarity: 7,
        ..Generator::with_seed(0xdecaf)
    };
    MemoryWorld::generated("world", 0, 255, generator)
}

fn all_leaves_fixed(world: &MemoryWorld, pos: TilePos) -> bool {
    world.get(pos).is_some_and(|tile| {
        tile.cells()
            .filter(|(_, cell)| cell.kind().is_leaves())
            .all(|(_, cell)| cell.aux() & !DECAY_MASK == 0)
    })
}

#[test]
fn restart_resumes_without_gaps_or_repeats() {
    init_logging();

    let store = MemoryStore::with_state(ProgressState {
        side: 7,
        period: 1,
        ..ProgressState::default()
    });
    let mut world = world();

    // First session: fix 20 chunks, then shut down.
    {
        let mut scheduler = FixScheduler::new(&mut world, &store, TracingSink);
        scheduler.start();
        assert_eq!(run_ticks(&mut scheduler, &mut ImmediateTicker, 20), 20);
        scheduler.shutdown();
    }
    assert_eq!(store.saved().map(|s| s.index), Some(20));
    assert_eq!(world.len(), 20);

    // Second session starts stopped at the saved index.
    let mut scheduler = FixScheduler::new(&mut world, &store, TracingSink);
    assert_eq!(scheduler.state(), RunState::Idle);
    assert_eq!(scheduler.index(), 20);

    scheduler.start();
    let mut resumed = Vec::new();
    while scheduler.is_running() {
        if let TickOutcome::Fixed { index, pos, .. } = scheduler.on_tick() {
            resumed.push((index, pos));
        }
    }

    let expected: Vec<_> = SpiralIter::starting_at(20)
        .take(29)
        .map(|(index, offset)| (index, TilePos::new(offset.x, offset.z)))
        .collect();
    assert_eq!(resumed, expected);
    assert_eq!(scheduler.state(), RunState::Complete);
    drop(scheduler);

    assert_eq!(world.len(), 49);
    for index in 0..49 {
        let offset = offset_for_index(index);
        let pos = TilePos::new(offset.x, offset.z);
        assert!(all_leaves_fixed(&world, pos), "chunk {pos} still has flagged leaves");
    }
}

#[test]
fn load_failure_is_retried_after_restart() {
    init_logging();

    let (tx, rx) = crossbeam_channel::unbounded();
    let store = MemoryStore::new();
    let mut world = world();
    world.fail_loads_at(TilePos::new(-1, 0));

    let mut scheduler = FixScheduler::new(&mut world, &store, ChannelSink::new(tx));
    scheduler.set_side_tiles(3);
    scheduler.set_period(NonZeroU32::MIN);
    scheduler.start();

    assert_eq!(run_ticks(&mut scheduler, &mut ImmediateTicker, 100), 4);
    assert_eq!(scheduler.index(), 4);
    assert!(!scheduler.is_running());
    drop(scheduler);

    let notice = rx.try_recv().unwrap();
    assert!(notice.message.contains("index 4"), "{}", notice.message);

    world.clear_failure(TilePos::new(-1, 0));
    let (tx, _rx) = crossbeam_channel::unbounded();
    let mut scheduler = FixScheduler::new(&mut world, &store, ChannelSink::new(tx));
    scheduler.start();
    assert_eq!(run_ticks(&mut scheduler, &mut ImmediateTicker, 100), 5);
    assert!(scheduler.is_complete());
}
