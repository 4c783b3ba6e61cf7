//! Process-lifetime cache keyed like the persisted ledgers
//!
//! Nothing here is ever written out. A restart starts with an empty cache.

use ahash::AHashMap;
use serde_json::{Map, Value};

/// A cached object for one `(task, selector)` pair
pub type CacheObject = Map<String, Value>;

#[derive(Debug, Default)]
pub struct EphemeralCache {
    entries: AHashMap<String, AHashMap<String, CacheObject>>,
}

impl EphemeralCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached object for the pair, if present
    pub fn get(&self, task: &str, selector: &str) -> Option<&CacheObject> {
        self.entries.get(task).and_then(|m| m.get(selector))
    }

    /// Cached object for the pair, created on demand
    pub fn entry(&mut self, task: &str, selector: &str) -> &mut CacheObject {
        self.entries
            .entry(task.to_string())
            .or_default()
            .entry(selector.to_string())
            .or_default()
    }

    /// Drop one cached object; returns whether it existed
    pub fn clear(&mut self, task: &str, selector: &str) -> bool {
        self.entries
            .get_mut(task)
            .map(|m| m.remove(selector).is_some())
            .unwrap_or(false)
    }

    /// Drop every cached object belonging to a task
    pub fn clear_task(&mut self, task: &str) {
        self.entries.remove(task);
    }

    /// Forget everything, as a process restart would
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of cached objects across all tasks
    pub fn len(&self) -> usize {
        self.entries.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
