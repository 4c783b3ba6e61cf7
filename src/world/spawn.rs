//! Spawn facilities

use serde::{Deserialize, Serialize};

use crate::production::QueueEntry;

/// A production currently bound to a facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawning {
    /// Final creep name
    pub name: String,
    pub need_time: u32,
    pub remaining_time: u32,
    pub entry: QueueEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnFacility {
    pub name: String,
    pub room: String,
    /// In-progress production
    pub spawning: Option<Spawning>,
    /// Production assigned this tick, not yet started
    pub new_spawn: Option<Spawning>,
}

impl SpawnFacility {
    pub fn new(name: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            room: room.into(),
            spawning: None,
            new_spawn: None,
        }
    }

    /// Whether `name` is in progress or newly assigned here
    pub fn is_producing(&self, name: &str) -> bool {
        self.spawning.as_ref().is_some_and(|s| s.name == name)
            || self.new_spawn.as_ref().is_some_and(|s| s.name == name)
    }

    pub fn is_idle(&self) -> bool {
        self.spawning.is_none() && self.new_spawn.is_none()
    }
}
