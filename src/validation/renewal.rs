//! Renewal prediction - how many ticks before a creep expires its replacement
//! must already be in production
//!
//! Production and travel both take time, so a creep counts as covered only
//! while its remaining lifespan is larger than that lead time.

use crate::world::CreepData;

/// Which estimate produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalBasis {
    /// Value attached to the creep
    Explicit,
    /// Own production time plus travel
    SpawningTime,
    /// Travel plus one room's worth of slack
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalPrediction {
    pub ticks: u32,
    pub basis: RenewalBasis,
}

impl RenewalPrediction {
    /// Whether a creep with `ticks_to_live` left is still safe
    pub fn is_outlived_by(&self, ticks_to_live: u32) -> bool {
        ticks_to_live > self.ticks
    }
}

/// Predict the renewal lead time for a creep
///
/// `route_distance` is only evaluated when no explicit value is attached.
pub fn predict_renewal(
    data: &CreepData,
    route_distance: impl FnOnce() -> u32,
    ticks_per_room: u32,
) -> RenewalPrediction {
    if let Some(ticks) = data.predicted_renewal {
        return RenewalPrediction {
            ticks,
            basis: RenewalBasis::Explicit,
        };
    }

    let travel = route_distance().saturating_mul(ticks_per_room);
    match data.spawning_time {
        Some(spawning) => RenewalPrediction {
            ticks: spawning.saturating_add(travel),
            basis: RenewalBasis::SpawningTime,
        },
        None => RenewalPrediction {
            ticks: travel.saturating_add(ticks_per_room),
            basis: RenewalBasis::Default,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_prediction_wins() {
        let data = CreepData::new("guard", "W1N1")
            .with_predicted_renewal(80)
            .with_spawning_time(400);
        let prediction = predict_renewal(&data, || panic!("route not needed"), 50);

        assert_eq!(prediction.ticks, 80);
        assert_eq!(prediction.basis, RenewalBasis::Explicit);
        assert!(prediction.is_outlived_by(100));
    }

    #[test]
    fn test_spawning_time_plus_travel() {
        let data = CreepData::new("guard", "W1N1").with_spawning_time(50);
        let prediction = predict_renewal(&data, || 2, 50);

        assert_eq!(prediction.ticks, 150);
        assert_eq!(prediction.basis, RenewalBasis::SpawningTime);
        assert!(!prediction.is_outlived_by(120));
    }

    #[test]
    fn test_default_adds_one_room() {
        let data = CreepData::new("guard", "W1N1");
        let prediction = predict_renewal(&data, || 1, 50);

        assert_eq!(prediction.ticks, 100);
        assert_eq!(prediction.basis, RenewalBasis::Default);
        assert!(prediction.is_outlived_by(150));
    }

    #[test]
    fn test_equal_lifespan_is_not_enough() {
        let data = CreepData::new("guard", "W1N1");
        let prediction = predict_renewal(&data, || 0, 50);
        assert_eq!(prediction.ticks, 50);
        assert!(!prediction.is_outlived_by(50));
        assert!(prediction.is_outlived_by(51));
    }
}
