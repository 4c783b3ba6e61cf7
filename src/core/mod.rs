pub mod config;
pub mod error;
pub mod types;

pub use config::{OrchestratorConfig, SpawnDefaults};
pub use error::{ColonyError, Result};
pub use types::{BodyPart, QueueTier, Tick};
