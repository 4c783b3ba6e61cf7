//! Ledger validation - renewal prediction and the queued/spawning/running validators

pub mod renewal;
pub mod validators;

pub use renewal::{predict_renewal, RenewalBasis, RenewalPrediction};
pub use validators::{
    refresh_ledger, validate_queued, validate_running, validate_spawning, LedgerCounts,
    QueuedOptions, QueuedValidation,
};
