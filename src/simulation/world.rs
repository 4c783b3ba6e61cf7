//! In-memory colony world backing every world trait
//!
//! The simulated world stands in for the game: rooms with tiered spawn
//! queues, spawn facilities, living creeps, flags and invaders. Creeps that
//! die stay visible through [`WorldState::population_entry`] until the next
//! tick starts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::config::OrchestratorConfig;
use crate::core::types::{BodyPart, Tick};
use crate::events::{CreepError, Event};
use crate::production::{CreepDefinition, RoomParams};
use crate::world::{
    BodyCompiler, Creep, CreepData, Flag, Invader, Room, RoomCoord, RouteFinder, SpawnFacility,
    SpawnRoomLocator, WorldState,
};

use super::body::compile_body;
use super::locator::{find_spawn_room, SpawnCandidates};

/// Tunables of the simulated world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub creep_life_time: u32,
    pub max_body_parts: usize,
    pub ticks_per_route_room: u32,
    /// Ticks of production per body part
    pub spawn_time_per_part: u32,
    /// Energy each room regains per tick
    pub energy_regen: u32,
    /// Chance per tick that an invader appears
    pub invader_chance: f64,
    /// Chance per tick that a known invader leaves
    pub invader_leave_chance: f64,
    /// Chance per tick that some creep reports an error
    pub error_chance: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            creep_life_time: 1500,
            max_body_parts: 50,
            ticks_per_route_room: 50,
            spawn_time_per_part: 3,
            energy_regen: 20,
            invader_chance: 0.005,
            invader_leave_chance: 0.05,
            error_chance: 0.002,
        }
    }
}

impl SimSettings {
    /// Settings sharing the orchestrator's creep limits
    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self {
            creep_life_time: config.creep_life_time,
            max_body_parts: config.max_body_parts,
            ticks_per_route_room: config.ticks_per_route_room,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimWorld {
    pub(crate) time: Tick,
    pub(crate) settings: SimSettings,
    pub(crate) rooms: BTreeMap<String, Room>,
    pub(crate) spawns: BTreeMap<String, SpawnFacility>,
    pub(crate) creeps: BTreeMap<String, Creep>,
    /// Data of creeps that died during the current tick
    pub(crate) fallen: BTreeMap<String, CreepData>,
    /// Data of creeps killed from outside, moved to `fallen` on the next advance
    pub(crate) killed: BTreeMap<String, CreepData>,
    pub(crate) flags: BTreeMap<String, Flag>,
    pub(crate) invaders: BTreeMap<String, Invader>,
    /// Changes made from outside, reported on the next advance
    pub(crate) outbox: Vec<Event>,
    pub(crate) serial: u64,
}

impl SimWorld {
    pub fn new(settings: SimSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// A small colony: three owned rooms, a handful of task flags
    pub fn demo(config: &OrchestratorConfig) -> Self {
        let mut world = Self::new(SimSettings::from_config(config));

        world.add_room(Room::new("W1N1", 5, 1800).with_all_queues());
        world.add_spawn(SpawnFacility::new("Spawn1", "W1N1"));

        world.add_room(Room::new("W3N1", 7, 5600).with_all_queues());
        world.add_spawn(SpawnFacility::new("Spawn2", "W3N1"));
        world.add_spawn(SpawnFacility::new("Spawn3", "W3N1"));

        world.add_room(Room::new("E1N1", 3, 800));
        world.add_spawn(SpawnFacility::new("Spawn4", "E1N1"));

        for (flag, room) in [
            ("mine-W2N1", "W2N1"),
            ("mine-W2N2", "W2N2"),
            ("reserve-W2N1", "W2N1"),
            ("guard-W2N2", "W2N2"),
            ("pioneer-E2N1", "E2N1"),
            ("claim-E2N2", "E2N2"),
            ("labs-W3N1", "W3N1"),
            ("rob-W5N1", "W5N1"),
            ("attack-W4N3", "W4N3"),
        ] {
            world.place_flag(Flag::new(flag, room));
        }
        world
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn set_time(&mut self, time: Tick) {
        self.time = time;
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.insert(room.name.clone(), room);
    }

    pub fn add_spawn(&mut self, spawn: SpawnFacility) {
        self.spawns.insert(spawn.name.clone(), spawn);
    }

    pub fn add_creep(&mut self, creep: Creep) {
        self.creeps.insert(creep.name.clone(), creep);
    }

    pub fn spawn_mut(&mut self, name: &str) -> Option<&mut SpawnFacility> {
        self.spawns.get_mut(name)
    }

    pub fn creep_mut(&mut self, name: &str) -> Option<&mut Creep> {
        self.creeps.get_mut(name)
    }

    pub fn place_flag(&mut self, flag: Flag) {
        self.flags.insert(flag.name.clone(), flag);
    }

    /// Remove a flag; the removal is reported on the next advance
    pub fn remove_flag(&mut self, name: &str) -> bool {
        let removed = self.flags.remove(name).is_some();
        if removed {
            self.outbox.push(Event::FlagRemoved(name.to_string()));
        }
        removed
    }

    /// Kill a creep now; the death is reported on the next advance
    ///
    /// Its data stays readable until the tick after that one, so handlers
    /// of the reported death can still look up its destiny.
    pub fn kill_creep(&mut self, name: &str) -> bool {
        let Some(creep) = self.creeps.remove(name) else {
            return false;
        };
        if let Some(data) = creep.data {
            self.killed.insert(creep.name.clone(), data);
        }
        self.outbox.push(Event::CreepDied(creep.name));
        true
    }

    /// Lose a room together with its spawns and queues
    pub fn collapse_room(&mut self, name: &str) -> bool {
        if self.rooms.remove(name).is_none() {
            return false;
        }
        self.spawns.retain(|_, spawn| spawn.room != name);
        self.outbox.push(Event::RoomCollapsed(name.to_string()));
        true
    }

    pub fn report_error(&mut self, creep: &str, message: impl Into<String>) {
        self.outbox.push(Event::CreepError(CreepError {
            creep: creep.to_string(),
            message: message.into(),
        }));
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn spawns(&self) -> impl Iterator<Item = &SpawnFacility> {
        self.spawns.values()
    }

    pub fn creeps(&self) -> impl Iterator<Item = &Creep> {
        self.creeps.values()
    }

    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    pub fn invaders(&self) -> impl Iterator<Item = &Invader> {
        self.invaders.values()
    }

    pub fn creep_count(&self) -> usize {
        self.creeps.len()
    }

    /// Unique suffix for produced creeps and invaders
    pub(crate) fn next_serial(&mut self) -> u64 {
        self.serial += 1;
        self.serial
    }
}

impl WorldState for SimWorld {
    fn time(&self) -> Tick {
        self.time
    }

    fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.get_mut(name)
    }

    fn spawn(&self, name: &str) -> Option<&SpawnFacility> {
        self.spawns.get(name)
    }

    fn creep(&self, name: &str) -> Option<&Creep> {
        self.creeps.get(name)
    }

    fn population_entry(&self, name: &str) -> Option<&CreepData> {
        self.creeps
            .get(name)
            .and_then(|creep| creep.data.as_ref())
            .or_else(|| self.fallen.get(name))
            .or_else(|| self.killed.get(name))
    }
}

impl RouteFinder for SimWorld {
    fn route_distance(&self, from: &str, to: &str) -> u32 {
        if from == to {
            return 0;
        }
        match (from.parse::<RoomCoord>(), to.parse::<RoomCoord>()) {
            (Ok(a), Ok(b)) => a.distance(&b),
            _ => u32::MAX,
        }
    }
}

impl SpawnCandidates for SimWorld {
    fn candidate(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    fn has_spawn(&self, room: &str) -> bool {
        self.spawns.values().any(|spawn| spawn.room == room)
    }

    fn spawn_rooms(&self) -> Vec<&Room> {
        self.rooms
            .values()
            .filter(|room| self.has_spawn(&room.name))
            .collect()
    }
}

impl SpawnRoomLocator for SimWorld {
    fn find_spawn_room(&self, params: &RoomParams) -> Option<String> {
        find_spawn_room(self, params)
    }
}

impl BodyCompiler for SimWorld {
    fn compile_body(&self, room: &Room, definition: &CreepDefinition) -> Vec<BodyPart> {
        compile_body(room, definition, self.settings.max_body_parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_distance() {
        let world = SimWorld::default();
        assert_eq!(world.route_distance("W1N1", "W1N1"), 0);
        assert_eq!(world.route_distance("W1N1", "W3N2"), 2);
        assert_eq!(world.route_distance("W0N0", "E0S0"), 1);
        assert_eq!(world.route_distance("W1N1", "nowhere"), u32::MAX);
    }

    #[test]
    fn test_dead_creep_stays_in_population() {
        let mut world = SimWorld::default();
        world.add_creep(
            Creep::new("miner-1", Some(10)).with_data(CreepData::new("remoteMiner", "W1N1")),
        );

        assert!(world.kill_creep("miner-1"));
        assert!(world.creep("miner-1").is_none());
        assert_eq!(
            world.population_entry("miner-1").map(|d| d.creep_type.as_str()),
            Some("remoteMiner")
        );
        assert_eq!(world.outbox, vec![Event::CreepDied("miner-1".into())]);
    }

    #[test]
    fn test_collapse_room_drops_spawns() {
        let mut world = SimWorld::default();
        world.add_room(Room::new("W1N1", 4, 1300));
        world.add_spawn(SpawnFacility::new("Spawn1", "W1N1"));

        assert!(world.collapse_room("W1N1"));
        assert!(world.spawn("Spawn1").is_none());
        assert!(!world.collapse_room("W1N1"));
    }

    #[test]
    fn test_demo_locates_spawn_rooms() {
        let world = SimWorld::demo(&OrchestratorConfig::default());
        let room = world.find_spawn_room(&RoomParams::targeting("W2N1"));
        assert!(matches!(room.as_deref(), Some("W1N1") | Some("W3N1")));
        assert_eq!(world.spawn_rooms().len(), 3);
    }
}
