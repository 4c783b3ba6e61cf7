pub mod body;
pub mod locator;
pub mod tick;
pub mod world;

pub use body::compile_body;
pub use locator::{find_spawn_room, SpawnCandidates};
pub use tick::advance;
pub use world::{SimSettings, SimWorld};
