//! Task memory - persisted ledgers and the ephemeral cache

pub mod cache;
pub mod ledger;
pub mod store;

pub use cache::{CacheObject, EphemeralCache};
pub use ledger::{Ledger, QueuedEntry, SpawningEntry};
pub use store::{LedgerStore, TaskMemory};
