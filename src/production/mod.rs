//! Production layer - creep requests and spawn queue entries

pub mod request;

pub use request::{
    spawn, try_spawn, CreepDefinition, Destiny, QueueEntry, RoomParams, SpawnError,
};
