//! Persisted per-task ledger of queued, spawning and running creeps

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::core::types::Tick;

/// A production request waiting in some room's spawn queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedEntry {
    pub name: String,
    /// Room whose spawn queue holds the request
    pub room: String,
    /// Task-specific fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueuedEntry {
    pub fn new(name: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            room: room.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A request bound to a specific spawn facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawningEntry {
    pub name: String,
    pub spawn: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpawningEntry {
    pub fn new(name: impl Into<String>, spawn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spawn: spawn.into(),
            extra: Map::new(),
        }
    }
}

/// Ledger node stored at `tasks[task][selector]`
///
/// `partitions` holds named sub-ledgers for tasks that track several creep
/// roles under one selector. `extra` carries task-specific bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub queued: Vec<QueuedEntry>,
    #[serde(default)]
    pub spawning: Vec<SpawningEntry>,
    #[serde(default)]
    pub running: Vec<String>,
    /// Tick of the last full `queued` rescan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_valid: Option<Tick>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub partitions: BTreeMap<String, Ledger>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sub-ledger for `key`, if it has been created
    pub fn partition(&self, key: &str) -> Option<&Ledger> {
        self.partitions.get(key)
    }

    /// Sub-ledger for `key`, created on demand
    pub fn partition_mut(&mut self, key: &str) -> &mut Ledger {
        self.partitions.entry(key.to_string()).or_default()
    }

    /// Resolve an optional partition key to the ledger it names
    pub fn section_mut(&mut self, sub_key: Option<&str>) -> &mut Ledger {
        match sub_key {
            Some(key) => self.partition_mut(key),
            None => self,
        }
    }

    /// Number of creeps this ledger accounts for, across all three stages
    pub fn total(&self) -> usize {
        self.queued.len() + self.spawning.len() + self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0 && self.partitions.values().all(Ledger::is_empty)
    }

    /// Remove a creep from `running`.
    ///
    /// A name that is not present leaves the list untouched.
    pub fn remove_running(&mut self, name: &str) -> bool {
        match self.running.iter().position(|n| n == name) {
            Some(index) => {
                self.running.remove(index);
                true
            }
            None => false,
        }
    }

    /// Move a queued request into `spawning`, bound to `spawn` under its final name
    pub fn promote_to_spawning(&mut self, queued_name: &str, name: &str, spawn: &str) -> bool {
        let Some(index) = self.queued.iter().position(|e| e.name == queued_name) else {
            return false;
        };
        let entry = self.queued.remove(index);
        self.spawning.push(SpawningEntry {
            name: name.to_string(),
            spawn: spawn.to_string(),
            extra: entry.extra,
        });
        true
    }

    /// Move a spawning creep into `running`
    pub fn promote_to_running(&mut self, name: &str) -> bool {
        let Some(index) = self.spawning.iter().position(|e| e.name == name) else {
            return false;
        };
        self.spawning.remove(index);
        if !self.running.iter().any(|n| n == name) {
            self.running.push(name.to_string());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_running_absent_name_is_noop() {
        let mut ledger = Ledger::new();
        ledger.running = vec!["guard-a".into(), "guard-b".into()];

        assert!(!ledger.remove_running("guard-z"));
        assert_eq!(ledger.running, vec!["guard-a", "guard-b"]);

        assert!(ledger.remove_running("guard-a"));
        assert_eq!(ledger.running, vec!["guard-b"]);
    }

    #[test]
    fn test_promotion_keeps_task_fields() {
        let mut ledger = Ledger::new();
        ledger
            .queued
            .push(QueuedEntry::new("claimer-Flag1", "W1N1").with_field("role", "claimer"));

        assert!(ledger.promote_to_spawning("claimer-Flag1", "claimer-Flag1-7", "Spawn1"));
        assert!(ledger.queued.is_empty());
        assert_eq!(ledger.spawning[0].name, "claimer-Flag1-7");
        assert_eq!(ledger.spawning[0].extra["role"], "claimer");

        assert!(ledger.promote_to_running("claimer-Flag1-7"));
        assert!(ledger.spawning.is_empty());
        assert_eq!(ledger.running, vec!["claimer-Flag1-7"]);

        // Unknown names change nothing
        assert!(!ledger.promote_to_running("claimer-Flag1-7"));
        assert_eq!(ledger.total(), 1);
    }

    #[test]
    fn test_ledger_json_shape() {
        let mut ledger = Ledger::new();
        ledger.queued.push(QueuedEntry::new("miner-Flag2", "W2N1"));
        ledger.queued_valid = Some(120);
        ledger.partition_mut("hauler").running.push("hauler-Flag2-3".into());
        ledger.extra.insert("room".into(), "W3N1".into());

        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["queued"][0]["room"], "W2N1");
        assert_eq!(json["queued_valid"], 120);
        assert_eq!(json["partitions"]["hauler"]["running"][0], "hauler-Flag2-3");
        assert_eq!(json["room"], "W3N1");

        let back: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }
}
