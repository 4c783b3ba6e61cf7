//! Persistent ledger store addressed as `tasks[task][selector]`
//!
//! This is the only state that survives a process restart. Everything is
//! serialized through serde_json so a host can write it out between ticks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::ledger::Ledger;
use crate::core::error::Result;

/// Structured get/set/delete access to persisted ledgers
pub trait LedgerStore {
    /// Ledger at the path, if it exists
    fn get(&self, task: &str, selector: &str) -> Option<&Ledger>;

    /// Ledger at the path, creating missing levels on demand
    fn get_or_create(&mut self, task: &str, selector: &str) -> &mut Ledger;

    /// Replace the ledger at the path
    fn set(&mut self, task: &str, selector: &str, ledger: Ledger);

    /// Delete the ledger at the path, returning it
    fn delete(&mut self, task: &str, selector: &str) -> Option<Ledger>;

    /// Selectors currently stored for a task
    fn selectors(&self, task: &str) -> Vec<String>;
}

/// In-process persisted memory, serializable as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskMemory {
    #[serde(default)]
    tasks: BTreeMap<String, BTreeMap<String, Ledger>>,
}

impl TaskMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of tasks with at least one stored level
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// All ledgers stored for a task
    pub fn ledgers(&self, task: &str) -> impl Iterator<Item = (&str, &Ledger)> {
        self.tasks
            .get(task)
            .into_iter()
            .flat_map(|nodes| nodes.iter().map(|(s, l)| (s.as_str(), l)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Write the memory to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Read memory from a file; a missing file yields empty memory
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl LedgerStore for TaskMemory {
    fn get(&self, task: &str, selector: &str) -> Option<&Ledger> {
        self.tasks.get(task).and_then(|nodes| nodes.get(selector))
    }

    fn get_or_create(&mut self, task: &str, selector: &str) -> &mut Ledger {
        self.tasks
            .entry(task.to_string())
            .or_default()
            .entry(selector.to_string())
            .or_default()
    }

    fn set(&mut self, task: &str, selector: &str, ledger: Ledger) {
        self.tasks
            .entry(task.to_string())
            .or_default()
            .insert(selector.to_string(), ledger);
    }

    fn delete(&mut self, task: &str, selector: &str) -> Option<Ledger> {
        self.tasks.get_mut(task).and_then(|nodes| nodes.remove(selector))
    }

    fn selectors(&self, task: &str) -> Vec<String> {
        self.tasks
            .get(task)
            .map(|nodes| nodes.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ledger::QueuedEntry;

    #[test]
    fn test_lazy_creation() {
        let mut memory = TaskMemory::new();
        assert!(memory.get("guard", "Flag1").is_none());

        memory.get_or_create("guard", "Flag1").running.push("guard-Flag1-1".into());

        let ledger = memory.get("guard", "Flag1").unwrap();
        assert_eq!(ledger.running, vec!["guard-Flag1-1"]);
        assert_eq!(memory.selectors("guard"), vec!["Flag1".to_string()]);
    }

    #[test]
    fn test_ledger_isolation_between_tasks() {
        let mut memory = TaskMemory::new();
        memory
            .get_or_create("taskA", "roomX")
            .queued
            .push(QueuedEntry::new("a-roomX", "W1N1"));
        memory.get_or_create("taskB", "roomX");

        memory.get_or_create("taskA", "roomX").running.push("a-1".into());
        memory.delete("taskA", "roomX");

        assert!(memory.get("taskA", "roomX").is_none());
        let b = memory.get("taskB", "roomX").unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn test_delete_missing_is_none() {
        let mut memory = TaskMemory::new();
        assert!(memory.delete("guard", "nothing").is_none());
        memory.get_or_create("guard", "a");
        assert!(memory.delete("guard", "nothing").is_none());
        assert!(memory.get("guard", "a").is_some());
    }

    #[test]
    fn test_json_round_trip_survives_restart() {
        let mut memory = TaskMemory::new();
        let ledger = memory.get_or_create("claim", "Flag9");
        ledger.queued.push(QueuedEntry::new("claimer-Flag9", "W5N5"));
        ledger.queued_valid = Some(77);

        let restored = TaskMemory::from_json(&memory.to_json().unwrap()).unwrap();
        assert_eq!(restored, memory);
        assert_eq!(restored.task_names().collect::<Vec<_>>(), vec!["claim"]);
    }
}
