//! Task context - what a task can reach while it runs

use crate::core::config::OrchestratorConfig;
use crate::core::types::Tick;
use crate::memory::{CacheObject, EphemeralCache, Ledger, LedgerStore, QueuedEntry};
use crate::production::{spawn, CreepDefinition, Destiny, QueueEntry, RoomParams};
use crate::validation::{refresh_ledger, LedgerCounts, QueuedOptions};
use crate::world::World;

/// Borrowed view of the world and both stores for one tick
pub struct TaskContext<'a> {
    pub world: &'a mut dyn World,
    pub memory: &'a mut dyn LedgerStore,
    pub cache: &'a mut EphemeralCache,
    pub config: &'a OrchestratorConfig,
}

impl<'a> TaskContext<'a> {
    pub fn new(
        world: &'a mut dyn World,
        memory: &'a mut dyn LedgerStore,
        cache: &'a mut EphemeralCache,
        config: &'a OrchestratorConfig,
    ) -> Self {
        Self {
            world,
            memory,
            cache,
            config,
        }
    }

    pub fn time(&self) -> Tick {
        self.world.time()
    }

    /// Persisted ledger node for `(task, selector)`, created on demand
    pub fn memory(&mut self, task: &str, selector: &str) -> &mut Ledger {
        self.memory.get_or_create(task, selector)
    }

    /// Persisted ledger node, without creating it
    pub fn peek_memory(&self, task: &str, selector: &str) -> Option<&Ledger> {
        self.memory.get(task, selector)
    }

    pub fn clear_memory(&mut self, task: &str, selector: &str) -> Option<Ledger> {
        self.memory.delete(task, selector)
    }

    /// Ephemeral object for `(task, selector)`, created on demand
    pub fn cache(&mut self, task: &str, selector: &str) -> &mut CacheObject {
        self.cache.entry(task, selector)
    }

    pub fn clear_cache(&mut self, task: &str, selector: &str) -> bool {
        self.cache.clear(task, selector)
    }

    /// Room parameters targeting `room` with the configured weighting
    pub fn room_params(&self, target_room: &str) -> RoomParams {
        RoomParams::targeting(target_room).with_ratios(&self.config.spawn_defaults)
    }

    /// Validate the ledger node's three stages in place
    pub fn refresh_ledger(
        &mut self,
        task: &str,
        selector: &str,
        target_room: &str,
        options: &QueuedOptions,
        explicitly_dead: Option<&str>,
    ) -> LedgerCounts {
        let ledger = self.memory.get_or_create(task, selector);
        refresh_ledger(
            &*self.world,
            ledger,
            target_room,
            options,
            explicitly_dead,
            self.config,
            task,
        )
    }

    /// Request production and record the queued entry in the task's ledger
    pub fn request_creep(
        &mut self,
        task: &str,
        selector: &str,
        definition: &CreepDefinition,
        destiny: Destiny,
        params: &RoomParams,
    ) -> Option<QueueEntry> {
        let ledger = self.memory.get_or_create(task, selector);
        let mut record = |entry: &QueueEntry| {
            ledger
                .queued
                .push(QueuedEntry::new(entry.name.clone(), entry.queue_room.clone()));
        };
        spawn(&mut *self.world, definition, destiny, params, Some(&mut record))
    }
}
