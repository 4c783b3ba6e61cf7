//! Ledger validators - reconcile persisted intent lists against live state
//!
//! Each validator returns the subsequence of its input that still has a live
//! counterpart. Writing the result back is up to the caller; `refresh_ledger`
//! does that for the common case of validating a whole ledger node.

use crate::core::config::OrchestratorConfig;
use crate::core::types::{QueueTier, Tick};
use crate::memory::{Ledger, QueuedEntry, SpawningEntry};
use crate::world::{RouteFinder, WorldState};

use super::renewal::predict_renewal;

/// Options for queued-list validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueuedOptions {
    /// Validate the named partition instead of the ledger root
    pub sub_key: Option<String>,
    /// Trust the last validation while it is younger than the revalidation
    /// interval, instead of rescanning a non-empty list on every call
    pub check_valid: bool,
    /// Tiers to search; the configured defaults when `None`
    pub queues: Option<Vec<QueueTier>>,
}

impl QueuedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sub_key(mut self, key: impl Into<String>) -> Self {
        self.sub_key = Some(key.into());
        self
    }

    pub fn checking_valid(mut self) -> Self {
        self.check_valid = true;
        self
    }

    pub fn with_queues(mut self, queues: Vec<QueueTier>) -> Self {
        self.queues = Some(queues);
        self
    }
}

/// Result of a queued validation
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedValidation {
    pub queued: Vec<QueuedEntry>,
    /// Tick of this rescan; `None` when the cached list was returned
    pub validated_at: Option<Tick>,
}

impl QueuedValidation {
    pub fn rescanned(&self) -> bool {
        self.validated_at.is_some()
    }

    /// Store the list (and the rescan tick, if any) in the ledger section
    pub fn apply_to(self, ledger: &mut Ledger, sub_key: Option<&str>) {
        let section = ledger.section_mut(sub_key);
        section.queued = self.queued;
        if let Some(tick) = self.validated_at {
            section.queued_valid = Some(tick);
        }
    }
}

/// Entry counts of a ledger section after validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    pub queued: usize,
    pub spawning: usize,
    pub running: usize,
}

impl LedgerCounts {
    pub fn total(&self) -> usize {
        self.queued + self.spawning + self.running
    }
}

fn report_invalid(task: &str, list: &str, before: usize, after: usize) {
    if before != after {
        tracing::warn!(
            task = %task,
            list,
            before,
            after,
            "Creep {} list contained invalid entries",
            list
        );
    }
}

/// Re-validate a ledger's queued list against the rooms' spawn queues
///
/// An entry survives iff an entry of the same name sits in one of the listed
/// tiers of its room. The scan runs when the list is non-empty and
/// `check_valid` is off, when the list has never been validated, or when the
/// last validation is older than the configured interval; otherwise the stored
/// list is returned as-is.
pub fn validate_queued<W: WorldState + ?Sized>(
    world: &W,
    ledger: &Ledger,
    options: &QueuedOptions,
    config: &OrchestratorConfig,
    task: &str,
) -> QueuedValidation {
    let section = match options.sub_key.as_deref() {
        Some(key) => ledger.partition(key),
        None => Some(ledger),
    };
    let (queued, last_valid) = section
        .map(|l| (l.queued.as_slice(), l.queued_valid))
        .unwrap_or((&[][..], None));

    let now = world.time();
    let expired = match last_valid {
        None => true,
        Some(tick) => now.saturating_sub(tick) > config.queued_revalidate_interval,
    };

    if !((!queued.is_empty() && !options.check_valid) || expired) {
        return QueuedValidation {
            queued: queued.to_vec(),
            validated_at: None,
        };
    }

    let tiers = options
        .queues
        .as_deref()
        .unwrap_or(&config.default_validation_queues);
    let kept: Vec<QueuedEntry> = queued
        .iter()
        .filter(|entry| {
            world
                .room(&entry.room)
                .is_some_and(|room| room.has_queued(tiers, &entry.name))
        })
        .cloned()
        .collect();

    report_invalid(task, "queued", queued.len(), kept.len());

    QueuedValidation {
        queued: kept,
        validated_at: Some(now),
    }
}

/// Keep spawning entries whose facility is producing exactly that creep
pub fn validate_spawning<W: WorldState + ?Sized>(
    world: &W,
    spawning: &[SpawningEntry],
    task: &str,
) -> Vec<SpawningEntry> {
    let kept: Vec<SpawningEntry> = spawning
        .iter()
        .filter(|entry| {
            world
                .spawn(&entry.spawn)
                .is_some_and(|spawn| spawn.is_producing(&entry.name))
        })
        .cloned()
        .collect();

    report_invalid(task, "spawning", spawning.len(), kept.len());
    kept
}

/// Keep running creeps that are alive and will outlast their renewal lead time
///
/// `explicitly_dead` names a creep known to have died this tick, ahead of the
/// world state catching up.
pub fn validate_running<W: WorldState + RouteFinder + ?Sized>(
    world: &W,
    running: &[String],
    target_room: &str,
    explicitly_dead: Option<&str>,
    config: &OrchestratorConfig,
    task: &str,
) -> Vec<String> {
    let kept: Vec<String> = running
        .iter()
        .filter(|name| {
            let Some(creep) = world.creep(name) else {
                return false;
            };
            let Some(data) = creep.data.as_ref() else {
                return false;
            };
            if explicitly_dead == Some(name.as_str()) {
                return false;
            }

            let prediction = predict_renewal(
                data,
                || world.route_distance(&data.home_room, target_room),
                config.ticks_per_route_room,
            );
            let ticks_to_live = creep.ticks_to_live.unwrap_or(config.creep_life_time);
            prediction.is_outlived_by(ticks_to_live)
        })
        .cloned()
        .collect();

    report_invalid(task, "running", running.len(), kept.len());
    kept
}

/// Validate all three stages of a ledger node and store the results
pub fn refresh_ledger<W: WorldState + RouteFinder + ?Sized>(
    world: &W,
    ledger: &mut Ledger,
    target_room: &str,
    options: &QueuedOptions,
    explicitly_dead: Option<&str>,
    config: &OrchestratorConfig,
    task: &str,
) -> LedgerCounts {
    let sub_key = options.sub_key.as_deref();
    validate_queued(world, ledger, options, config, task).apply_to(ledger, sub_key);

    let section = ledger.section_mut(sub_key);
    section.spawning = validate_spawning(world, &section.spawning, task);
    section.running = validate_running(
        world,
        &section.running,
        target_room,
        explicitly_dead,
        config,
        task,
    );

    LedgerCounts {
        queued: section.queued.len(),
        spawning: section.spawning.len(),
        running: section.running.len(),
    }
}
