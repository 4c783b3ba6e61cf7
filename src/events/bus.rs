//! Event bus - ordered, synchronous publish/subscribe over a closed set of
//! channels
//!
//! Subscribers on a channel are called in subscription order. Published
//! events wait in a FIFO until the host drains the bus, and are then delivered
//! one by one within the same tick.

use ahash::AHashMap;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::production::Destiny;
use crate::tasks::TaskContext;
use crate::world::{Flag, Invader};

/// Named event streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    FlagFound,
    FlagRemoved,
    SpawningStarted,
    SpawningCompleted,
    CreepDied,
    PredictedRenewal,
    CreepError,
    NewInvader,
    KnownInvader,
    GoneInvader,
    RoomCollapsed,
}

impl Channel {
    pub const ALL: [Channel; 11] = [
        Channel::FlagFound,
        Channel::FlagRemoved,
        Channel::SpawningStarted,
        Channel::SpawningCompleted,
        Channel::CreepDied,
        Channel::PredictedRenewal,
        Channel::CreepError,
        Channel::NewInvader,
        Channel::KnownInvader,
        Channel::GoneInvader,
        Channel::RoomCollapsed,
    ];
}

/// A creep production bound to a spawn facility
#[derive(Debug, Clone, PartialEq)]
pub struct SpawningStarted {
    pub spawn: String,
    /// Final creep name
    pub name: String,
    /// Name of the queue entry the production came from
    pub queued_name: String,
    pub destiny: Destiny,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreepError {
    pub creep: String,
    pub message: String,
}

/// A world-change notification with its typed payload
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FlagFound(Flag),
    FlagRemoved(String),
    SpawningStarted(SpawningStarted),
    /// Name of the creep that just finished production
    SpawningCompleted(String),
    CreepDied(String),
    /// Name of a creep whose replacement should be produced now
    PredictedRenewal(String),
    CreepError(CreepError),
    NewInvader(Invader),
    KnownInvader(String),
    GoneInvader(String),
    RoomCollapsed(String),
}

impl Event {
    pub fn channel(&self) -> Channel {
        match self {
            Event::FlagFound(_) => Channel::FlagFound,
            Event::FlagRemoved(_) => Channel::FlagRemoved,
            Event::SpawningStarted(_) => Channel::SpawningStarted,
            Event::SpawningCompleted(_) => Channel::SpawningCompleted,
            Event::CreepDied(_) => Channel::CreepDied,
            Event::PredictedRenewal(_) => Channel::PredictedRenewal,
            Event::CreepError(_) => Channel::CreepError,
            Event::NewInvader(_) => Channel::NewInvader,
            Event::KnownInvader(_) => Channel::KnownInvader,
            Event::GoneInvader(_) => Channel::GoneInvader,
            Event::RoomCollapsed(_) => Channel::RoomCollapsed,
        }
    }
}

/// Callback attached to a channel
pub type Handler = Rc<dyn Fn(&mut TaskContext<'_>, &Event)>;

struct Subscription {
    owner: String,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    subscribers: AHashMap<Channel, Vec<Subscription>>,
    pending: VecDeque<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `channel` on behalf of `owner`
    pub fn on(
        &mut self,
        channel: Channel,
        owner: impl Into<String>,
        handler: impl Fn(&mut TaskContext<'_>, &Event) + 'static,
    ) {
        self.subscribers.entry(channel).or_default().push(Subscription {
            owner: owner.into(),
            handler: Rc::new(handler),
        });
    }

    /// Queue an event for the next drain
    pub fn publish(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Deliver one event to its channel's subscribers right away
    pub fn emit(&self, ctx: &mut TaskContext<'_>, event: &Event) -> usize {
        let Some(subscriptions) = self.subscribers.get(&event.channel()) else {
            return 0;
        };
        for subscription in subscriptions {
            (subscription.handler)(ctx, event);
        }
        subscriptions.len()
    }

    /// Deliver every pending event in publish order; returns handler calls made
    pub fn drain(&mut self, ctx: &mut TaskContext<'_>) -> usize {
        let pending = std::mem::take(&mut self.pending);
        pending.iter().map(|event| self.emit(ctx, event)).sum()
    }

    /// Owners subscribed to a channel, in subscription order
    pub fn subscribers(&self, channel: Channel) -> Vec<&str> {
        self.subscribers
            .get(&channel)
            .map(|subs| subs.iter().map(|s| s.owner.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.subscribers.get(&channel).map(Vec::len).unwrap_or(0)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: AHashMap<Channel, usize> = self
            .subscribers
            .iter()
            .map(|(channel, subs)| (*channel, subs.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .field("pending", &self.pending.len())
            .finish()
    }
}
