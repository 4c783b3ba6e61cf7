//! Live creeps and the bookkeeping they carry

use serde::{Deserialize, Serialize};

use crate::core::types::BodyPart;
use crate::production::Destiny;

/// Behavioural state attached to a creep by the production pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreepData {
    pub creep_type: String,
    /// Room the creep was produced in
    pub home_room: String,
    #[serde(default)]
    pub destiny: Option<Destiny>,
    /// Ticks the creep spent being produced
    #[serde(default)]
    pub spawning_time: Option<u32>,
    /// Precomputed renewal lead time, overriding every estimate
    #[serde(default)]
    pub predicted_renewal: Option<u32>,
}

impl CreepData {
    pub fn new(creep_type: impl Into<String>, home_room: impl Into<String>) -> Self {
        Self {
            creep_type: creep_type.into(),
            home_room: home_room.into(),
            destiny: None,
            spawning_time: None,
            predicted_renewal: None,
        }
    }

    pub fn with_destiny(mut self, destiny: Destiny) -> Self {
        self.destiny = Some(destiny);
        self
    }

    pub fn with_spawning_time(mut self, ticks: u32) -> Self {
        self.spawning_time = Some(ticks);
        self
    }

    pub fn with_predicted_renewal(mut self, ticks: u32) -> Self {
        self.predicted_renewal = Some(ticks);
        self
    }
}

/// A creep present in the world this tick
#[derive(Debug, Clone, PartialEq)]
pub struct Creep {
    pub name: String,
    /// Remaining lifespan; `None` while still being produced
    pub ticks_to_live: Option<u32>,
    pub body: Vec<BodyPart>,
    pub data: Option<CreepData>,
}

impl Creep {
    pub fn new(name: impl Into<String>, ticks_to_live: Option<u32>) -> Self {
        Self {
            name: name.into(),
            ticks_to_live,
            body: Vec::new(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: CreepData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_body(mut self, body: Vec<BodyPart>) -> Self {
        self.body = body;
        self
    }
}
