//! Property tests for ledger validation

use colony_tasks::core::config::OrchestratorConfig;
use colony_tasks::core::types::QueueTier;
use colony_tasks::memory::{Ledger, QueuedEntry};
use colony_tasks::production::{Destiny, QueueEntry};
use colony_tasks::simulation::{SimSettings, SimWorld};
use colony_tasks::validation::{
    predict_renewal, refresh_ledger, validate_queued, validate_running, QueuedOptions,
};
use colony_tasks::world::{Creep, CreepData, Room, RouteFinder, WorldState};
use proptest::prelude::*;

/// A creep as it may appear in a running list
#[derive(Debug, Clone)]
struct CreepCase {
    alive: bool,
    has_data: bool,
    ttl: Option<u32>,
    spawning_time: Option<u32>,
    predicted: Option<u32>,
}

fn creep_case() -> impl Strategy<Value = CreepCase> {
    (
        any::<bool>(),
        any::<bool>(),
        proptest::option::of(0u32..1500),
        proptest::option::of(0u32..300),
        proptest::option::of(0u32..400),
    )
        .prop_map(|(alive, has_data, ttl, spawning_time, predicted)| CreepCase {
            alive,
            has_data,
            ttl,
            spawning_time,
            predicted,
        })
}

fn populate(cases: &[CreepCase]) -> (SimWorld, Vec<String>) {
    let mut world = SimWorld::new(SimSettings::default());
    let mut running = Vec::new();
    for (i, case) in cases.iter().enumerate() {
        let name = format!("creep-{}", i);
        running.push(name.clone());
        if !case.alive {
            continue;
        }
        let mut creep = Creep::new(name, case.ttl);
        if case.has_data {
            let mut data = CreepData::new("guard", "W1N1")
                .with_destiny(Destiny::new("guard", "guard-W3N3").with_room("W3N3"));
            data.spawning_time = case.spawning_time;
            data.predicted_renewal = case.predicted;
            creep = creep.with_data(data);
        }
        world.add_creep(creep);
    }
    (world, running)
}

fn queue_entry(name: &str) -> QueueEntry {
    QueueEntry {
        parts: Vec::new(),
        name: name.to_string(),
        behaviour: "guard".into(),
        destiny: Destiny::new("guard", "guard-W3N3"),
        queue_room: "W1N1".into(),
    }
}

proptest! {
    /// Property: every kept running creep is alive, carries data and
    /// outlives its renewal prediction
    #[test]
    fn prop_running_validation_is_sound(cases in proptest::collection::vec(creep_case(), 0..24)) {
        let config = OrchestratorConfig::default();
        let (world, running) = populate(&cases);

        let kept = validate_running(&world, &running, "W3N3", None, &config, "guard");

        for name in &kept {
            let creep = world.creep(name).expect("kept creep must be alive");
            let data = creep.data.as_ref().expect("kept creep must carry data");
            let prediction = predict_renewal(
                data,
                || world.route_distance(&data.home_room, "W3N3"),
                config.ticks_per_route_room,
            );
            let ttl = creep.ticks_to_live.unwrap_or(config.creep_life_time);
            prop_assert!(ttl > prediction.ticks);
        }
    }

    /// Property: validation keeps a subsequence of its input and is stable
    #[test]
    fn prop_running_validation_shrinks_and_settles(
        cases in proptest::collection::vec(creep_case(), 0..24),
        dead in proptest::option::of(0usize..24),
    ) {
        let config = OrchestratorConfig::default();
        let (world, running) = populate(&cases);
        let dead_name = dead.map(|i| format!("creep-{}", i));

        let kept = validate_running(&world, &running, "W3N3", dead_name.as_deref(), &config, "guard");
        prop_assert!(kept.len() <= running.len());
        let mut remaining = running.iter();
        for name in &kept {
            prop_assert!(remaining.any(|r| r == name), "{} out of order", name);
        }
        if let Some(dead_name) = &dead_name {
            prop_assert!(!kept.contains(dead_name));
        }

        let again = validate_running(&world, &kept, "W3N3", dead_name.as_deref(), &config, "guard");
        prop_assert_eq!(again, kept);
    }

    /// Property: a rescanned queued list holds exactly the entries still queued
    #[test]
    fn prop_queued_rescan_matches_room_queue(
        ledger_names in proptest::collection::vec(0u8..12, 0..16),
        queued_names in proptest::collection::btree_set(0u8..12, 0..12),
    ) {
        let config = OrchestratorConfig::default();
        let mut world = SimWorld::new(SimSettings::default());
        let mut room = Room::new("W1N1", 4, 1300);
        for n in &queued_names {
            room.queue_or_lowest_mut(QueueTier::Low).push(queue_entry(&format!("guard-{}", n)));
        }
        world.add_room(room);
        world.set_time(500);

        let mut ledger = Ledger::new();
        ledger.queued = ledger_names
            .iter()
            .map(|n| QueuedEntry::new(format!("guard-{}", n), "W1N1"))
            .collect();

        let result = validate_queued(&world, &ledger, &QueuedOptions::new(), &config, "guard");
        prop_assert!(result.rescanned());
        let expected: Vec<QueuedEntry> = ledger
            .queued
            .iter()
            .filter(|e| queued_names.iter().any(|n| format!("guard-{}", n) == e.name))
            .cloned()
            .collect();
        prop_assert_eq!(result.queued, expected);
    }

    /// Property: refreshing twice in the same tick changes nothing the second time
    #[test]
    fn prop_refresh_is_idempotent(cases in proptest::collection::vec(creep_case(), 0..16)) {
        let config = OrchestratorConfig::default();
        let (mut world, running) = populate(&cases);
        world.add_room(Room::new("W1N1", 4, 1300));
        world.set_time(100);

        let mut ledger = Ledger::new();
        ledger.running = running;
        ledger.queued = vec![QueuedEntry::new("guard-ghost", "W1N1")];

        let first = refresh_ledger(&world, &mut ledger, "W3N3", &QueuedOptions::new(), None, &config, "guard");
        let snapshot = ledger.clone();
        let second = refresh_ledger(&world, &mut ledger, "W3N3", &QueuedOptions::new(), None, &config, "guard");

        prop_assert_eq!(first, second);
        prop_assert_eq!(ledger, snapshot);
    }
}
