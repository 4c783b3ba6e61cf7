//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// A single body part of a produced creep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Move,
    Work,
    Carry,
    Attack,
    RangedAttack,
    Heal,
    Claim,
    Tough,
}

impl BodyPart {
    /// Energy cost of producing this part
    pub fn cost(self) -> u32 {
        match self {
            BodyPart::Move => 50,
            BodyPart::Work => 100,
            BodyPart::Carry => 50,
            BodyPart::Attack => 80,
            BodyPart::RangedAttack => 150,
            BodyPart::Heal => 250,
            BodyPart::Claim => 600,
            BodyPart::Tough => 10,
        }
    }

    /// Total energy cost of a body
    pub fn body_cost(parts: &[BodyPart]) -> u32 {
        parts.iter().map(|p| p.cost()).sum()
    }
}

/// Named priority tier of a room's spawn queue
///
/// Declaration order is priority order: `High` is consumed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QueueTier {
    High,
    Medium,
    Low,
}

impl QueueTier {
    /// All tiers, highest priority first
    pub const ALL: [QueueTier; 3] = [QueueTier::High, QueueTier::Medium, QueueTier::Low];

    /// The lowest-priority tier, used as the fallback for unknown tiers
    pub fn lowest() -> Self {
        QueueTier::Low
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueTier::High => "High",
            QueueTier::Medium => "Medium",
            QueueTier::Low => "Low",
        }
    }
}

impl fmt::Display for QueueTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" | "high" => Ok(QueueTier::High),
            "Medium" | "medium" => Ok(QueueTier::Medium),
            "Low" | "low" => Ok(QueueTier::Low),
            other => Err(format!("unknown queue tier: {}", other)),
        }
    }
}
