//! Orchestrator - owns the registry, the bus and both stores, and drives one
//! tick at a time
//!
//! A tick runs every task's flush in registration order, then drains the
//! events published since the previous tick. Persisted memory survives
//! [`Orchestrator::restart`]; the ephemeral cache and the bus wiring do not.

use std::path::Path;

use crate::core::config::OrchestratorConfig;
use crate::core::error::Result;
use crate::core::types::Tick;
use crate::events::{Event, EventBus};
use crate::memory::{EphemeralCache, Ledger, LedgerStore, TaskMemory};
use crate::tasks::{TaskContext, TaskRegistry};
use crate::world::World;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    /// Events drained from the bus
    pub events: usize,
    /// Handler calls made while draining
    pub deliveries: usize,
}

pub struct Orchestrator {
    config: OrchestratorConfig,
    registry: TaskRegistry,
    bus: EventBus,
    memory: TaskMemory,
    cache: EphemeralCache,
}

impl Orchestrator {
    /// Empty orchestrator; add tasks through [`Orchestrator::registry_mut`]
    /// and call [`Orchestrator::register`]
    pub fn new(config: OrchestratorConfig) -> Self {
        Self::from_memory(config, TaskMemory::new())
    }

    /// Orchestrator resuming from previously persisted memory
    pub fn from_memory(config: OrchestratorConfig, memory: TaskMemory) -> Self {
        Self {
            config,
            registry: TaskRegistry::new(),
            bus: EventBus::new(),
            memory,
            cache: EphemeralCache::new(),
        }
    }

    /// Orchestrator with the built-in tasks populated and registered
    pub fn with_builtin_tasks(config: OrchestratorConfig) -> Self {
        let mut orchestrator = Self::new(config);
        orchestrator.registry.populate();
        orchestrator.register();
        orchestrator
    }

    /// Wire the registered tasks into the bus; only the first call does
    /// anything
    pub fn register(&mut self) -> bool {
        self.registry.register(&mut self.bus)
    }

    pub fn publish(&mut self, event: Event) {
        self.bus.publish(event);
    }

    pub fn publish_all(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.bus.publish(event);
        }
    }

    /// Flush all tasks, then deliver pending events
    pub fn run_tick(&mut self, world: &mut dyn World) -> TickReport {
        let tick = world.time();
        let mut ctx = TaskContext::new(world, &mut self.memory, &mut self.cache, &self.config);

        self.registry.flush(&mut ctx);

        let events = self.bus.pending();
        let deliveries = self.bus.drain(&mut ctx);

        tracing::trace!(tick, events, deliveries, "Tick complete");
        TickReport {
            tick,
            events,
            deliveries,
        }
    }

    /// Simulate a process restart
    ///
    /// Persisted memory goes through its serialized form. Tasks are kept,
    /// but the cache, pending events and subscriptions start fresh and the
    /// tasks are registered again.
    pub fn restart(self) -> Result<Self> {
        let memory = TaskMemory::from_json(&self.memory.to_json()?)?;
        let mut restarted = Self {
            config: self.config,
            registry: self.registry.fresh(),
            bus: EventBus::new(),
            memory,
            cache: EphemeralCache::new(),
        };
        restarted.register();
        tracing::info!(
            tasks = restarted.registry.len(),
            "Restarted with persisted memory"
        );
        Ok(restarted)
    }

    pub fn save_memory(&self, path: &Path) -> Result<()> {
        self.memory.save(path)
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TaskRegistry {
        &mut self.registry
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn memory(&self) -> &TaskMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut TaskMemory {
        &mut self.memory
    }

    pub fn ledger(&self, task: &str, selector: &str) -> Option<&Ledger> {
        self.memory.get(task, selector)
    }

    pub fn cache(&self) -> &EphemeralCache {
        &self.cache
    }
}
