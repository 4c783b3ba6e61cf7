use colony_tasks::core::config::OrchestratorConfig;
use colony_tasks::core::types::QueueTier;
use colony_tasks::memory::{Ledger, QueuedEntry};
use colony_tasks::production::{Destiny, QueueEntry, RoomParams};
use colony_tasks::simulation::{advance, find_spawn_room, SimSettings, SimWorld};
use colony_tasks::validation::{refresh_ledger, validate_queued, QueuedOptions};
use colony_tasks::world::{Creep, CreepData, Room, SpawnFacility};
use colony_tasks::Orchestrator;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn crowded_world(creeps: usize) -> (SimWorld, Ledger) {
    let mut world = SimWorld::new(SimSettings::default());
    let mut room = Room::new("W1N1", 8, 12_900).with_all_queues();
    let mut ledger = Ledger::new();

    for i in 0..creeps {
        let name = format!("guard-{}", i);
        world.add_creep(
            Creep::new(name.clone(), Some(200 + i as u32)).with_data(
                CreepData::new("guard", "W1N1")
                    .with_destiny(Destiny::new("guard", "guard-W4N4"))
                    .with_spawning_time(150),
            ),
        );
        ledger.running.push(name);

        let queued = format!("guard-q{}", i);
        room.queue_or_lowest_mut(QueueTier::Low).push(QueueEntry {
            parts: Vec::new(),
            name: queued.clone(),
            behaviour: "guard".into(),
            destiny: Destiny::new("guard", "guard-W4N4"),
            queue_room: "W1N1".into(),
        });
        ledger.queued.push(QueuedEntry::new(queued, "W1N1"));
    }
    world.add_room(room);
    (world, ledger)
}

fn bench_refresh_ledger(c: &mut Criterion) {
    let config = OrchestratorConfig::default();
    let (world, ledger) = crowded_world(200);
    c.bench_function("refresh_ledger_200", |b| {
        b.iter_batched(
            || ledger.clone(),
            |mut ledger| {
                refresh_ledger(
                    &world,
                    &mut ledger,
                    "W4N4",
                    &QueuedOptions::new(),
                    None,
                    &config,
                    "guard",
                )
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_validate_queued(c: &mut Criterion) {
    let config = OrchestratorConfig::default();
    let (world, ledger) = crowded_world(200);
    c.bench_function("validate_queued_200", |b| {
        b.iter(|| validate_queued(&world, black_box(&ledger), &QueuedOptions::new(), &config, "guard"))
    });
}

fn bench_find_spawn_room(c: &mut Criterion) {
    let mut world = SimWorld::new(SimSettings::default());
    for x in 0..10 {
        for y in 0..10 {
            let name = format!("W{}N{}", x, y);
            world.add_room(Room::new(name.clone(), (x + y) as u8 % 8 + 1, 5600));
            world.add_spawn(SpawnFacility::new(format!("Spawn-{}", name), name));
        }
    }
    let params = RoomParams::targeting("W5N5").with_min_rcl(7);
    c.bench_function("find_spawn_room_100", |b| {
        b.iter(|| find_spawn_room(&world, black_box(&params)))
    });
}

fn bench_demo_tick(c: &mut Criterion) {
    c.bench_function("demo_colony_100_ticks", |b| {
        b.iter_batched(
            || {
                let config = OrchestratorConfig::default();
                (SimWorld::demo(&config), Orchestrator::with_builtin_tasks(config))
            },
            |(mut world, mut orchestrator)| {
                let mut rng = ChaCha8Rng::seed_from_u64(1);
                for _ in 0..100 {
                    let events = advance(&mut world, &mut rng);
                    orchestrator.publish_all(events);
                    orchestrator.run_tick(&mut world);
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_refresh_ledger,
    bench_validate_queued,
    bench_find_spawn_room,
    bench_demo_tick
);
criterion_main!(benches);
