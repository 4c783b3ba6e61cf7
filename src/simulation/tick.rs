//! Tick system - advances the simulated world and reports what changed
//!
//! Each advance runs, in order:
//! outbox -> production -> aging -> queue pickup -> energy -> invaders -> errors -> flags
//!
//! The returned events are in that order too, so production and deaths are
//! seen by tasks before the flags that make them top up their ledgers.

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::core::types::BodyPart;
use crate::events::{CreepError, Event, SpawningStarted};
use crate::validation::predict_renewal;
use crate::world::{Creep, CreepData, Invader, RouteFinder, Spawning};

use super::world::SimWorld;

/// Advance the world by one tick
pub fn advance<R: Rng + ?Sized>(world: &mut SimWorld, rng: &mut R) -> Vec<Event> {
    world.time += 1;
    world.fallen = std::mem::take(&mut world.killed);

    let mut events = std::mem::take(&mut world.outbox);
    run_production(world, &mut events);
    age_creeps(world, &mut events);
    start_production(world, &mut events);
    regenerate_energy(world);
    move_invaders(world, rng, &mut events);
    raise_errors(world, rng, &mut events);
    events.extend(world.flags.values().cloned().map(Event::FlagFound));
    events
}

/// Promote new productions and finish completed ones
fn run_production(world: &mut SimWorld, events: &mut Vec<Event>) {
    let life_time = world.settings.creep_life_time;
    let mut born = Vec::new();

    for spawn in world.spawns.values_mut() {
        if spawn.spawning.is_none() {
            spawn.spawning = spawn.new_spawn.take();
        }
        let Some(spawning) = spawn.spawning.as_mut() else {
            continue;
        };
        spawning.remaining_time = spawning.remaining_time.saturating_sub(1);
        if spawning.remaining_time > 0 {
            continue;
        }

        let Some(done) = spawn.spawning.take() else {
            continue;
        };
        let data = CreepData::new(done.entry.behaviour.clone(), spawn.room.clone())
            .with_destiny(done.entry.destiny.clone())
            .with_spawning_time(done.need_time);
        born.push(
            Creep::new(done.name, Some(life_time))
                .with_body(done.entry.parts)
                .with_data(data),
        );
    }

    for creep in born {
        events.push(Event::SpawningCompleted(creep.name.clone()));
        world.creeps.insert(creep.name.clone(), creep);
    }
}

/// Count down lifespans; report deaths and renewals that fall due
fn age_creeps(world: &mut SimWorld, events: &mut Vec<Event>) {
    let ticks_per_room = world.settings.ticks_per_route_room;
    let mut dead = Vec::new();
    let mut renewals = Vec::new();

    for creep in world.creeps.values_mut() {
        let Some(ttl) = creep.ticks_to_live.as_mut() else {
            continue;
        };
        *ttl = ttl.saturating_sub(1);
        if *ttl == 0 {
            dead.push(creep.name.clone());
        } else {
            renewals.push((creep.name.clone(), *ttl));
        }
    }

    for (name, ttl) in renewals {
        let Some(data) = world.creeps.get(&name).and_then(|c| c.data.as_ref()) else {
            continue;
        };
        let target = data
            .destiny
            .as_ref()
            .and_then(|d| d.room.clone())
            .unwrap_or_else(|| data.home_room.clone());
        let prediction = predict_renewal(
            data,
            || world.route_distance(&data.home_room, &target),
            ticks_per_room,
        );
        if prediction.ticks == ttl {
            events.push(Event::PredictedRenewal(name));
        }
    }

    for name in dead {
        if let Some(creep) = world.creeps.remove(&name) {
            if let Some(data) = creep.data {
                world.fallen.insert(name.clone(), data);
            }
            events.push(Event::CreepDied(name));
        }
    }
}

/// Hand the next affordable queue entry to every idle spawn
fn start_production(world: &mut SimWorld, events: &mut Vec<Event>) {
    let idle: Vec<(String, String)> = world
        .spawns
        .values()
        .filter(|spawn| spawn.is_idle())
        .map(|spawn| (spawn.name.clone(), spawn.room.clone()))
        .collect();

    for (spawn_name, room_name) in idle {
        let Some(room) = world.rooms.get_mut(&room_name) else {
            continue;
        };
        let affordable = room
            .spawn_queues
            .values()
            .find_map(|queue| queue.first())
            .is_some_and(|entry| BodyPart::body_cost(&entry.parts) <= room.energy_available);
        if !affordable {
            continue;
        }
        let Some((_, entry)) = room.pop_next() else {
            continue;
        };
        room.energy_available -= BodyPart::body_cost(&entry.parts);

        let name = format!("{}-{}", entry.name, world.next_serial());
        let need_time = entry.parts.len() as u32 * world.settings.spawn_time_per_part;
        events.push(Event::SpawningStarted(SpawningStarted {
            spawn: spawn_name.clone(),
            name: name.clone(),
            queued_name: entry.name.clone(),
            destiny: entry.destiny.clone(),
        }));

        if let Some(spawn) = world.spawns.get_mut(&spawn_name) {
            spawn.new_spawn = Some(Spawning {
                name,
                need_time,
                remaining_time: need_time,
                entry,
            });
        }
    }
}

fn regenerate_energy(world: &mut SimWorld) {
    let regen = world.settings.energy_regen;
    for room in world.rooms.values_mut() {
        room.energy_available = (room.energy_available + regen).min(room.energy_capacity);
    }
}

fn move_invaders<R: Rng + ?Sized>(world: &mut SimWorld, rng: &mut R, events: &mut Vec<Event>) {
    let leave_chance = world.settings.invader_leave_chance;
    let gone: Vec<String> = world
        .invaders
        .keys()
        .filter(|_| rng.gen_bool(leave_chance))
        .cloned()
        .collect();
    for id in gone {
        world.invaders.remove(&id);
        events.push(Event::GoneInvader(id));
    }

    events.extend(world.invaders.keys().cloned().map(Event::KnownInvader));

    if rng.gen_bool(world.settings.invader_chance) {
        let Some(room) = world.rooms.keys().choose(rng).cloned() else {
            return;
        };
        let invader = Invader::new(format!("invader-{}", world.next_serial()), room, "Invader");
        world.invaders.insert(invader.id.clone(), invader.clone());
        events.push(Event::NewInvader(invader));
    }
}

fn raise_errors<R: Rng + ?Sized>(world: &mut SimWorld, rng: &mut R, events: &mut Vec<Event>) {
    if !rng.gen_bool(world.settings.error_chance) {
        return;
    }
    if let Some(creep) = world.creeps.keys().choose(rng) {
        events.push(Event::CreepError(CreepError {
            creep: creep.clone(),
            message: "stuck at room border".to_string(),
        }));
    }
}
