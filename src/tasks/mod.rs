//! Tasks - named, long-lived units of behaviour wired into the event bus
//!
//! A task declares the events it handles through [`Capabilities`]. The
//! registry subscribes a task only to the channels of its declared
//! capabilities, so a handler method that is not declared is never called.

pub mod builtin;
pub mod context;
pub mod kind;
pub mod registry;

pub use builtin::{CreepTask, ReputationTask, Trigger};
pub use context::TaskContext;
pub use kind::TaskKind;
pub use registry::TaskRegistry;

use crate::events::{Channel, CreepError, Event, EventBus, SpawningStarted};
use crate::production::Destiny;
use crate::world::{Flag, Invader};

/// An event handler a task may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Capability {
    FlagFound,
    FlagRemoved,
    SpawningStarted,
    SpawningCompleted,
    CreepDied,
    CreepError,
    NewInvader,
    KnownInvader,
    GoneInvader,
    RoomDied,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::FlagFound,
        Capability::FlagRemoved,
        Capability::SpawningStarted,
        Capability::SpawningCompleted,
        Capability::CreepDied,
        Capability::CreepError,
        Capability::NewInvader,
        Capability::KnownInvader,
        Capability::GoneInvader,
        Capability::RoomDied,
    ];

    /// Channels feeding this handler, in subscription order
    pub fn channels(self) -> &'static [Channel] {
        match self {
            Capability::FlagFound => &[Channel::FlagFound],
            Capability::FlagRemoved => &[Channel::FlagRemoved],
            Capability::SpawningStarted => &[Channel::SpawningStarted],
            Capability::SpawningCompleted => &[Channel::SpawningCompleted],
            Capability::CreepDied => &[Channel::PredictedRenewal, Channel::CreepDied],
            Capability::CreepError => &[Channel::CreepError],
            Capability::NewInvader => &[Channel::NewInvader],
            Capability::KnownInvader => &[Channel::KnownInvader],
            Capability::GoneInvader => &[Channel::GoneInvader],
            Capability::RoomDied => &[Channel::RoomCollapsed],
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u8
    }
}

/// Set of capabilities declared by a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u16);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);

    pub const fn with(self, capability: Capability) -> Self {
        Capabilities(self.0 | capability.bit())
    }

    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Capabilities::NONE, Capabilities::with)
    }
}

/// A registered unit of behaviour
///
/// Handler methods default to doing nothing; only those named in
/// [`Task::capabilities`] are ever subscribed.
#[allow(unused_variables)]
pub trait Task {
    /// Unique task name, also the first level of its memory path
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// Custom wiring beyond the capability handlers
    fn register(&self, bus: &mut EventBus) {}

    /// Per-tick refresh, run before any event is delivered
    fn flush(&self, ctx: &mut TaskContext<'_>) {}

    fn handle_flag_found(&self, ctx: &mut TaskContext<'_>, flag: &Flag) {}

    fn handle_flag_removed(&self, ctx: &mut TaskContext<'_>, flag_name: &str) {}

    fn handle_spawning_started(&self, ctx: &mut TaskContext<'_>, params: &SpawningStarted) {}

    fn handle_spawning_completed(&self, ctx: &mut TaskContext<'_>, creep_name: &str) {}

    /// Fed by both the died and the predicted-renewal channels
    fn handle_creep_died(&self, ctx: &mut TaskContext<'_>, creep_name: &str) {}

    fn handle_creep_error(&self, ctx: &mut TaskContext<'_>, error: &CreepError) {}

    fn handle_new_invader(&self, ctx: &mut TaskContext<'_>, invader: &Invader) {}

    fn handle_known_invader(&self, ctx: &mut TaskContext<'_>, invader_id: &str) {}

    fn handle_gone_invader(&self, ctx: &mut TaskContext<'_>, invader_id: &str) {}

    fn handle_room_died(&self, ctx: &mut TaskContext<'_>, room: &str) {}
}

/// Route an event to the matching handler method
pub(crate) fn dispatch(task: &dyn Task, ctx: &mut TaskContext<'_>, event: &Event) {
    match event {
        Event::FlagFound(flag) => task.handle_flag_found(ctx, flag),
        Event::FlagRemoved(name) => task.handle_flag_removed(ctx, name),
        Event::SpawningStarted(params) => task.handle_spawning_started(ctx, params),
        Event::SpawningCompleted(name) => task.handle_spawning_completed(ctx, name),
        Event::CreepDied(name) | Event::PredictedRenewal(name) => {
            task.handle_creep_died(ctx, name)
        }
        Event::CreepError(error) => task.handle_creep_error(ctx, error),
        Event::NewInvader(invader) => task.handle_new_invader(ctx, invader),
        Event::KnownInvader(id) => task.handle_known_invader(ctx, id),
        Event::GoneInvader(id) => task.handle_gone_invader(ctx, id),
        Event::RoomCollapsed(room) => task.handle_room_died(ctx, room),
    }
}

/// Shared creep-died handling: drop the creep from its ledger's running list
///
/// The died channels are broadcast to every subscribed task, so creeps whose
/// recorded destiny names another task are ignored. `memory_key` derives the
/// ledger selector from the destiny. Returns whether a name was removed.
pub fn remove_dead_creep(
    ctx: &mut TaskContext<'_>,
    task: &str,
    creep_name: &str,
    memory_key: impl Fn(&Destiny) -> Option<String>,
) -> bool {
    let key = match ctx
        .world
        .population_entry(creep_name)
        .and_then(|data| data.destiny.as_ref())
    {
        Some(destiny) if destiny.task == task => memory_key(destiny),
        _ => return false,
    };

    match key {
        Some(key) => ctx.memory(task, &key).remove_running(creep_name),
        None => false,
    }
}
