//! Flags and hostile invaders, the payloads of world-change events

use serde::{Deserialize, Serialize};

/// A player-placed marker naming a target for a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub name: String,
    pub room: String,
}

impl Flag {
    pub fn new(name: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            room: room.into(),
        }
    }
}

/// A hostile creep seen in one of our rooms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invader {
    pub id: String,
    pub room: String,
    pub owner: String,
}

impl Invader {
    pub fn new(id: impl Into<String>, room: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            room: room.into(),
            owner: owner.into(),
        }
    }
}
