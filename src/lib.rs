//! Colony Tasks - tick-based task orchestration for a simulated creep colony

pub mod core;
pub mod events;
pub mod memory;
pub mod orchestrator;
pub mod production;
pub mod simulation;
pub mod tasks;
pub mod validation;
pub mod world;

pub use orchestrator::{Orchestrator, TickReport};
