//! World access - the live state rebuilt every tick, and the collaborators
//! that answer questions about it
//!
//! The orchestration core never owns world state. Everything it needs is
//! reached through the traits below, so a host can back them with the real
//! game or with [`crate::simulation::SimWorld`].

pub mod coord;
pub mod creep;
pub mod flag;
pub mod room;
pub mod spawn;
pub mod xy_iterator;

pub use coord::{ParseRoomError, RoomCoord};
pub use creep::{Creep, CreepData};
pub use flag::{Flag, Invader};
pub use room::Room;
pub use spawn::{SpawnFacility, Spawning};
pub use xy_iterator::{Direction, XyIterator};

use crate::core::types::{BodyPart, Tick};
use crate::production::{CreepDefinition, RoomParams};

/// Read and queue access to live world objects
pub trait WorldState {
    /// Current tick
    fn time(&self) -> Tick;

    fn room(&self, name: &str) -> Option<&Room>;

    fn room_mut(&mut self, name: &str) -> Option<&mut Room>;

    fn spawn(&self, name: &str) -> Option<&SpawnFacility>;

    /// A creep that is alive this tick
    fn creep(&self, name: &str) -> Option<&Creep>;

    /// Recorded data of a creep, alive or died this tick
    fn population_entry(&self, name: &str) -> Option<&CreepData>;
}

/// Route-distance collaborator
pub trait RouteFinder {
    /// Number of rooms on the route between two rooms
    fn route_distance(&self, from: &str, to: &str) -> u32;
}

/// Room-selection collaborator
pub trait SpawnRoomLocator {
    /// Nearest eligible production room for the constraints, if any
    fn find_spawn_room(&self, params: &RoomParams) -> Option<String>;
}

/// Composition-compiler collaborator
pub trait BodyCompiler {
    /// Body for the definition given the room's resources; may be empty
    fn compile_body(&self, room: &Room, definition: &CreepDefinition) -> Vec<BodyPart>;
}

/// Everything the orchestrator needs from the world
pub trait World: WorldState + RouteFinder + SpawnRoomLocator + BodyCompiler {}

impl<T> World for T where T: WorldState + RouteFinder + SpawnRoomLocator + BodyCompiler + ?Sized {}
