//! Rooms and their tiered spawn queues

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::QueueTier;
use crate::production::QueueEntry;

/// A visible room with its production queues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub controller_level: u8,
    pub energy_available: u32,
    pub energy_capacity: u32,
    /// Spawn queue per tier; a room may lack some tiers
    pub spawn_queues: BTreeMap<QueueTier, Vec<QueueEntry>>,
}

impl Room {
    /// A room with only the lowest-priority queue
    pub fn new(name: impl Into<String>, controller_level: u8, energy_capacity: u32) -> Self {
        let mut spawn_queues = BTreeMap::new();
        spawn_queues.insert(QueueTier::lowest(), Vec::new());
        Self {
            name: name.into(),
            controller_level,
            energy_available: energy_capacity,
            energy_capacity,
            spawn_queues,
        }
    }

    /// Add an (empty) queue tier
    pub fn with_queue(mut self, tier: QueueTier) -> Self {
        self.spawn_queues.entry(tier).or_default();
        self
    }

    /// A room carrying every queue tier
    pub fn with_all_queues(mut self) -> Self {
        for tier in QueueTier::ALL {
            self.spawn_queues.entry(tier).or_default();
        }
        self
    }

    pub fn with_energy_available(mut self, energy: u32) -> Self {
        self.energy_available = energy;
        self
    }

    pub fn queue(&self, tier: QueueTier) -> Option<&[QueueEntry]> {
        self.spawn_queues.get(&tier).map(Vec::as_slice)
    }

    pub fn queue_mut(&mut self, tier: QueueTier) -> Option<&mut Vec<QueueEntry>> {
        self.spawn_queues.get_mut(&tier)
    }

    /// The queue for `tier`, or the lowest-priority queue when the room lacks it
    pub fn queue_or_lowest_mut(&mut self, tier: QueueTier) -> &mut Vec<QueueEntry> {
        let tier = if self.spawn_queues.contains_key(&tier) {
            tier
        } else {
            QueueTier::lowest()
        };
        self.spawn_queues.entry(tier).or_default()
    }

    /// Whether an entry named `name` sits in any of the given tiers
    pub fn has_queued(&self, tiers: &[QueueTier], name: &str) -> bool {
        tiers.iter().any(|tier| {
            self.queue(*tier)
                .map(|q| q.iter().any(|e| e.name == name))
                .unwrap_or(false)
        })
    }

    /// Total entries across every tier
    pub fn queued_count(&self) -> usize {
        self.spawn_queues.values().map(Vec::len).sum()
    }

    /// Pop the next entry, highest tier first
    pub fn pop_next(&mut self) -> Option<(QueueTier, QueueEntry)> {
        self.spawn_queues
            .iter_mut()
            .find(|(_, q)| !q.is_empty())
            .map(|(tier, q)| (*tier, q.remove(0)))
    }
}
