//! Production request pipeline - turns a creep request into a spawn queue entry
//!
//! A request either appends exactly one entry to exactly one room's queue and
//! reports it to the caller once, or changes nothing at all.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::config::SpawnDefaults;
use crate::core::types::{BodyPart, QueueTier};
use crate::world::World;

/// What to produce: body recipe, behaviour and queue tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreepDefinition {
    pub queue: QueueTier,
    /// Name prefix; the behaviour is used when absent
    #[serde(default)]
    pub name: Option<String>,
    pub behaviour: String,
    #[serde(default)]
    pub fixed_body: Vec<BodyPart>,
    /// Repeated as often as the budget allows
    #[serde(default)]
    pub multi_body: Vec<BodyPart>,
    /// Below this much available energy nothing is compiled
    #[serde(default)]
    pub min_abs_energy_available: u32,
    #[serde(default)]
    pub max_multi: Option<u32>,
}

impl CreepDefinition {
    pub fn new(behaviour: impl Into<String>, queue: QueueTier) -> Self {
        Self {
            queue,
            name: None,
            behaviour: behaviour.into(),
            fixed_body: Vec::new(),
            multi_body: Vec::new(),
            min_abs_energy_available: 0,
            max_multi: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_fixed_body(mut self, parts: Vec<BodyPart>) -> Self {
        self.fixed_body = parts;
        self
    }

    pub fn with_multi_body(mut self, parts: Vec<BodyPart>) -> Self {
        self.multi_body = parts;
        self
    }

    pub fn with_min_energy(mut self, energy: u32) -> Self {
        self.min_abs_energy_available = energy;
        self
    }

    pub fn with_max_multi(mut self, max: u32) -> Self {
        self.max_multi = Some(max);
        self
    }
}

/// Which task owns the creep and what it is for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destiny {
    pub task: String,
    pub target_name: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Destiny {
    pub fn new(task: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            target_name: target_name.into(),
            room: None,
            extra: Map::new(),
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }
}

/// Constraints on the production room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomParams {
    /// Use this room without searching
    pub explicit: Option<String>,
    pub target_room: Option<String>,
    pub min_rcl: u8,
    pub max_range: u32,
    pub min_energy_available: u32,
    pub min_energy_capacity: u32,
    pub allow_target_room: bool,
    pub range_rcl_ratio: u32,
    pub range_queue_ratio: u32,
}

impl Default for RoomParams {
    fn default() -> Self {
        let defaults = SpawnDefaults::default();
        Self {
            explicit: None,
            target_room: None,
            min_rcl: 0,
            max_range: u32::MAX,
            min_energy_available: 0,
            min_energy_capacity: 0,
            allow_target_room: false,
            range_rcl_ratio: defaults.range_rcl_ratio,
            range_queue_ratio: defaults.range_queue_ratio,
        }
    }
}

impl RoomParams {
    /// Search for a room serving `target_room`
    pub fn targeting(target_room: impl Into<String>) -> Self {
        Self {
            target_room: Some(target_room.into()),
            ..Self::default()
        }
    }

    /// Produce in `room`, no search
    pub fn explicit(room: impl Into<String>) -> Self {
        Self {
            explicit: Some(room.into()),
            ..Self::default()
        }
    }

    pub fn with_min_rcl(mut self, rcl: u8) -> Self {
        self.min_rcl = rcl;
        self
    }

    pub fn with_max_range(mut self, range: u32) -> Self {
        self.max_range = range;
        self
    }

    pub fn with_min_energy_available(mut self, energy: u32) -> Self {
        self.min_energy_available = energy;
        self
    }

    pub fn with_min_energy_capacity(mut self, energy: u32) -> Self {
        self.min_energy_capacity = energy;
        self
    }

    pub fn allowing_target_room(mut self) -> Self {
        self.allow_target_room = true;
        self
    }

    pub fn with_ratios(mut self, defaults: &SpawnDefaults) -> Self {
        self.range_rcl_ratio = defaults.range_rcl_ratio;
        self.range_queue_ratio = defaults.range_queue_ratio;
        self
    }
}

/// The durable artifact appended to a room's spawn queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub parts: Vec<BodyPart>,
    pub name: String,
    pub behaviour: String,
    pub destiny: Destiny,
    pub queue_room: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    #[error("no room qualifies for production")]
    NoSpawnRoom,

    #[error("room {0} is not visible")]
    UnknownRoom(String),

    #[error("{task} task tried to queue a zero parts body {behaviour} creep in {room}")]
    EmptyBody {
        task: String,
        behaviour: String,
        room: String,
    },
}

/// Queue a creep, reporting why nothing was queued on failure
pub fn try_spawn<W: World + ?Sized>(
    world: &mut W,
    definition: &CreepDefinition,
    mut destiny: Destiny,
    params: &RoomParams,
) -> Result<QueueEntry, SpawnError> {
    let room_name = match &params.explicit {
        Some(name) => name.clone(),
        None => world.find_spawn_room(params).ok_or(SpawnError::NoSpawnRoom)?,
    };
    let room = world
        .room(&room_name)
        .ok_or_else(|| SpawnError::UnknownRoom(room_name.clone()))?;

    if destiny.room.is_none() {
        destiny.room = params.target_room.clone();
    }

    let parts = world.compile_body(room, definition);
    let prefix = definition.name.as_deref().unwrap_or(&definition.behaviour);
    let name = format!("{}-{}", prefix, destiny.target_name);

    if parts.is_empty() {
        return Err(SpawnError::EmptyBody {
            task: destiny.task,
            behaviour: definition.behaviour.clone(),
            room: room_name,
        });
    }

    let entry = QueueEntry {
        parts,
        name,
        behaviour: definition.behaviour.clone(),
        destiny,
        queue_room: room_name,
    };

    world
        .room_mut(&entry.queue_room)
        .ok_or_else(|| SpawnError::UnknownRoom(entry.queue_room.clone()))?
        .queue_or_lowest_mut(definition.queue)
        .push(entry.clone());

    Ok(entry)
}

/// Queue a creep for production
///
/// On success the entry is appended to the chosen room's queue and
/// `on_queued` (if any) is called once with it. Every failure returns `None`
/// without touching any queue or calling back.
pub fn spawn<W: World + ?Sized>(
    world: &mut W,
    definition: &CreepDefinition,
    destiny: Destiny,
    params: &RoomParams,
    on_queued: Option<&mut dyn FnMut(&QueueEntry)>,
) -> Option<QueueEntry> {
    let task = destiny.task.clone();

    match try_spawn(world, definition, destiny, params) {
        Ok(entry) => {
            tracing::debug!(
                task = %task,
                room = %entry.queue_room,
                "Queued {} ({} parts)",
                entry.name,
                entry.parts.len()
            );
            if let Some(callback) = on_queued {
                callback(&entry);
            }
            Some(entry)
        }
        Err(SpawnError::EmptyBody {
            task,
            behaviour,
            room,
        }) => {
            tracing::error!(
                task = %task,
                behaviour = %behaviour,
                room = %room,
                "{} task tried to queue a zero parts body {} creep. Aborted.",
                task,
                behaviour
            );
            None
        }
        Err(err) => {
            tracing::debug!(task = %task, behaviour = %definition.behaviour, "Spawn skipped: {}", err);
            None
        }
    }
}
