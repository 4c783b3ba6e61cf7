//! Built-in tasks
//!
//! Most built-in tasks follow the same shape: a trigger (a flag or an
//! invader) names a target, and the task keeps a fixed number of creeps
//! queued, spawning or running for it. [`CreepTask`] implements that shape
//! once and is configured per kind. [`ReputationTask`] produces no creeps and
//! only keeps score of hostile owners.

use serde_json::Value;

use crate::core::types::QueueTier;
use crate::events::{CreepError, SpawningStarted};
use crate::memory::SpawningEntry;
use crate::production::{CreepDefinition, Destiny, QueueEntry};
use crate::validation::QueuedOptions;
use crate::world::{Flag, Invader};

use super::{remove_dead_creep, Capabilities, Capability, Task, TaskContext};

/// Ledger field holding the room a selector targets
const ROOM_KEY: &str = "room";
/// Cache field marking the tick a selector was last provisioned
const PROVISIONED_KEY: &str = "provisioned";
/// Ledger field holding a hostile owner's score
const HOSTILITY_KEY: &str = "hostility";

/// What names a task's targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Flags whose name starts with the prefix
    Flag(&'static str),
    /// Hostile creeps, tracked by id
    Invader,
}

impl Trigger {
    fn capabilities(&self) -> Capabilities {
        let base = Capabilities::NONE
            .with(Capability::SpawningStarted)
            .with(Capability::SpawningCompleted)
            .with(Capability::CreepDied);
        match self {
            Trigger::Flag(_) => base
                .with(Capability::FlagFound)
                .with(Capability::FlagRemoved),
            Trigger::Invader => base
                .with(Capability::NewInvader)
                .with(Capability::KnownInvader)
                .with(Capability::GoneInvader),
        }
    }
}

/// A task that keeps `count` creeps assigned to each of its targets
#[derive(Debug, Clone)]
pub struct CreepTask {
    name: &'static str,
    trigger: Trigger,
    capabilities: Capabilities,
    definition: CreepDefinition,
    count: usize,
    min_rcl: u8,
    max_range: u32,
    allow_target_room: bool,
}

impl CreepTask {
    pub fn new(name: &'static str, trigger: Trigger, definition: CreepDefinition) -> Self {
        Self {
            name,
            capabilities: trigger.capabilities(),
            trigger,
            definition,
            count: 1,
            min_rcl: 0,
            max_range: u32::MAX,
            allow_target_room: false,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_min_rcl(mut self, rcl: u8) -> Self {
        self.min_rcl = rcl;
        self
    }

    pub fn with_max_range(mut self, range: u32) -> Self {
        self.max_range = range;
        self
    }

    pub fn allowing_target_room(mut self) -> Self {
        self.allow_target_room = true;
        self
    }

    /// Declare an additional handler
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities = self.capabilities.with(capability);
        self
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn definition(&self) -> &CreepDefinition {
        &self.definition
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn matches_flag(&self, flag_name: &str) -> bool {
        matches!(self.trigger, Trigger::Flag(prefix) if flag_name.starts_with(prefix))
    }

    fn validation_options(&self) -> QueuedOptions {
        let mut queues = vec![self.definition.queue];
        if self.definition.queue != QueueTier::lowest() {
            queues.push(QueueTier::lowest());
        }
        QueuedOptions::new().checking_valid().with_queues(queues)
    }

    /// Validate the selector's ledger and queue one creep if it is short
    ///
    /// Runs at most once per selector and tick.
    pub fn provision(
        &self,
        ctx: &mut TaskContext<'_>,
        selector: &str,
        target_room: &str,
    ) -> Option<QueueEntry> {
        let now = ctx.time();
        let cache = ctx.cache(self.name, selector);
        if cache.get(PROVISIONED_KEY).and_then(Value::as_u64) == Some(now) {
            return None;
        }
        cache.insert(PROVISIONED_KEY.to_string(), Value::from(now));

        ctx.memory(self.name, selector)
            .extra
            .insert(ROOM_KEY.to_string(), Value::from(target_room));

        let counts =
            ctx.refresh_ledger(self.name, selector, target_room, &self.validation_options(), None);
        if counts.total() >= self.count {
            return None;
        }

        let destiny = Destiny::new(self.name, selector).with_room(target_room);
        let mut params = ctx
            .room_params(target_room)
            .with_min_rcl(self.min_rcl)
            .with_max_range(self.max_range);
        if self.allow_target_room {
            params = params.allowing_target_room();
        }
        ctx.request_creep(self.name, selector, &self.definition, destiny, &params)
    }

    fn target_room(&self, ctx: &TaskContext<'_>, selector: &str) -> Option<String> {
        ctx.peek_memory(self.name, selector)?
            .extra
            .get(ROOM_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn release(&self, ctx: &mut TaskContext<'_>, selector: &str) {
        if ctx.clear_memory(self.name, selector).is_some() {
            tracing::info!(task = self.name, selector, "Released target");
        }
        ctx.clear_cache(self.name, selector);
    }
}

impl Task for CreepTask {
    fn name(&self) -> &'static str {
        self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn flush(&self, ctx: &mut TaskContext<'_>) {
        ctx.cache.clear_task(self.name);
    }

    fn handle_flag_found(&self, ctx: &mut TaskContext<'_>, flag: &Flag) {
        if self.matches_flag(&flag.name) {
            self.provision(ctx, &flag.name, &flag.room);
        }
    }

    fn handle_flag_removed(&self, ctx: &mut TaskContext<'_>, flag_name: &str) {
        if self.matches_flag(flag_name) {
            self.release(ctx, flag_name);
        }
    }

    fn handle_spawning_started(&self, ctx: &mut TaskContext<'_>, params: &SpawningStarted) {
        let selector = params.destiny.target_name.as_str();
        if params.destiny.task != self.name || ctx.peek_memory(self.name, selector).is_none() {
            return;
        }
        let ledger = ctx.memory(self.name, selector);
        if !ledger.promote_to_spawning(&params.queued_name, &params.name, &params.spawn) {
            // Queued list already dropped the request; the destiny still proves ownership
            ledger
                .spawning
                .push(SpawningEntry::new(params.name.clone(), params.spawn.clone()));
        }
    }

    fn handle_spawning_completed(&self, ctx: &mut TaskContext<'_>, creep_name: &str) {
        let selector = match ctx
            .world
            .population_entry(creep_name)
            .and_then(|data| data.destiny.as_ref())
        {
            Some(destiny) if destiny.task == self.name => destiny.target_name.clone(),
            _ => return,
        };
        if ctx.peek_memory(self.name, &selector).is_none() {
            return;
        }
        let ledger = ctx.memory(self.name, &selector);
        if !ledger.promote_to_running(creep_name) && !ledger.running.iter().any(|n| n == creep_name)
        {
            ledger.running.push(creep_name.to_string());
        }
    }

    fn handle_creep_died(&self, ctx: &mut TaskContext<'_>, creep_name: &str) {
        remove_dead_creep(ctx, self.name, creep_name, |destiny| {
            Some(destiny.target_name.clone())
        });
    }

    fn handle_creep_error(&self, ctx: &mut TaskContext<'_>, error: &CreepError) {
        let owned = ctx
            .world
            .population_entry(&error.creep)
            .and_then(|data| data.destiny.as_ref())
            .is_some_and(|destiny| destiny.task == self.name);
        if owned {
            tracing::warn!(task = self.name, creep = %error.creep, "{}", error.message);
        }
    }

    fn handle_new_invader(&self, ctx: &mut TaskContext<'_>, invader: &Invader) {
        if self.trigger == Trigger::Invader {
            self.provision(ctx, &invader.id, &invader.room);
        }
    }

    fn handle_known_invader(&self, ctx: &mut TaskContext<'_>, invader_id: &str) {
        if let Some(room) = self.target_room(ctx, invader_id) {
            self.provision(ctx, invader_id, &room);
        }
    }

    fn handle_gone_invader(&self, ctx: &mut TaskContext<'_>, invader_id: &str) {
        self.release(ctx, invader_id);
    }

    fn handle_room_died(&self, ctx: &mut TaskContext<'_>, room: &str) {
        for selector in ctx.memory.selectors(self.name) {
            if self.target_room(ctx, &selector).as_deref() == Some(room) {
                self.release(ctx, &selector);
            }
        }
    }
}

/// Keeps a hostility score per hostile owner, keyed by owner name
#[derive(Debug, Clone, Default)]
pub struct ReputationTask;

impl ReputationTask {
    pub const NAME: &'static str = "reputation";

    /// Score recorded for `owner`
    pub fn hostility(ctx: &TaskContext<'_>, owner: &str) -> u64 {
        ctx.peek_memory(Self::NAME, owner)
            .and_then(|ledger| ledger.extra.get(HOSTILITY_KEY))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }
}

impl Task for ReputationTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE.with(Capability::NewInvader)
    }

    fn flush(&self, ctx: &mut TaskContext<'_>) {
        ctx.cache.clear_task(Self::NAME);
    }

    fn handle_new_invader(&self, ctx: &mut TaskContext<'_>, invader: &Invader) {
        let score = Self::hostility(ctx, &invader.owner) + 1;
        ctx.memory(Self::NAME, &invader.owner)
            .extra
            .insert(HOSTILITY_KEY.to_string(), Value::from(score));
        tracing::debug!(task = Self::NAME, owner = %invader.owner, score, "Hostile sighted");
    }
}
