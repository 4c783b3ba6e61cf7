//! World-change events and their delivery

pub mod bus;

pub use bus::{Channel, CreepError, Event, EventBus, Handler, SpawningStarted};
