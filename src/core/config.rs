//! Orchestrator configuration with documented constants
//!
//! All tuning numbers used by the ledger validators and the production
//! request pipeline are collected here, loadable from a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ColonyError, Result};
use crate::core::types::{QueueTier, Tick};

/// Configuration for the task orchestration core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    // === LEDGER VALIDATION ===
    /// Maximum age (ticks) of a queued-list validation before it must rescan
    ///
    /// Bounds how stale a `queued` list can become while validators run in
    /// TTL mode.
    pub queued_revalidate_interval: Tick,

    /// Travel ticks estimated per room of route distance
    ///
    /// Used by the renewal predictor to convert route distance into lead time.
    pub ticks_per_route_room: u32,

    /// Queue tiers scanned by queued validation when the caller names none
    pub default_validation_queues: Vec<QueueTier>,

    /// Lifespan assumed for a creep that reports no remaining ticks yet
    ///
    /// A creep still being produced has not started aging.
    pub creep_life_time: u32,

    // === PRODUCTION ===
    /// Upper bound on compiled body length
    pub max_body_parts: usize,

    /// Default weighting for spawn room selection
    pub spawn_defaults: SpawnDefaults,
}

/// Spawn room weighting defaults applied to new room parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnDefaults {
    /// One room of range weighs the same as this many missing controller levels
    pub range_rcl_ratio: u32,

    /// One room of range weighs the same as this many queued entries
    pub range_queue_ratio: u32,
}

impl Default for SpawnDefaults {
    fn default() -> Self {
        Self {
            range_rcl_ratio: 3,
            range_queue_ratio: 51,
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            queued_revalidate_interval: 50,
            ticks_per_route_room: 50,
            default_validation_queues: vec![QueueTier::Low],
            creep_life_time: 1500,
            max_body_parts: 50,
            spawn_defaults: SpawnDefaults::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from TOML text
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: OrchestratorConfig = toml::from_str(content)?;
        config.validate().map_err(ColonyError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.ticks_per_route_room == 0 {
            return Err("ticks_per_route_room must be positive".into());
        }

        if self.default_validation_queues.is_empty() {
            return Err("default_validation_queues must name at least one tier".into());
        }

        if self.max_body_parts == 0 {
            return Err("max_body_parts must be positive".into());
        }

        if self.spawn_defaults.range_rcl_ratio == 0 || self.spawn_defaults.range_queue_ratio == 0 {
            return Err(format!(
                "spawn ratios must be positive (rcl {}, queue {})",
                self.spawn_defaults.range_rcl_ratio, self.spawn_defaults.range_queue_ratio
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = OrchestratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.queued_revalidate_interval, 50);
        assert_eq!(config.ticks_per_route_room, 50);
        assert_eq!(config.default_validation_queues, vec![QueueTier::Low]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = OrchestratorConfig::from_toml_str(
            r#"
            queued_revalidate_interval = 20
            default_validation_queues = ["Medium", "Low"]

            [spawn_defaults]
            range_queue_ratio = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.queued_revalidate_interval, 20);
        assert_eq!(
            config.default_validation_queues,
            vec![QueueTier::Medium, QueueTier::Low]
        );
        assert_eq!(config.spawn_defaults.range_queue_ratio, 10);
        assert_eq!(config.spawn_defaults.range_rcl_ratio, 3);
        assert_eq!(config.ticks_per_route_room, 50);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = OrchestratorConfig::from_toml_str("ticks_per_route_room = 0").unwrap_err();
        assert!(matches!(err, ColonyError::InvalidConfig(_)));

        let err = OrchestratorConfig::from_toml_str("ticks_per_route_room = \"x\"").unwrap_err();
        assert!(matches!(err, ColonyError::ConfigParse(_)));
    }
}
