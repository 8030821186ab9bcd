//! Flood-risk classification
//!
//! Maps validated water-level and flow-rate readings onto the four risk
//! levels the dashboard and alert pipeline understand. Thresholds are
//! per-deployment configuration; the defaults suit a small drainage
//! channel.
//!
//! When the two sensors disagree - standing water with little flow, or a
//! surge arriving before the level rises - the station reports the worse
//! of the two classes. Under-reporting risk is the failure mode we cannot
//! afford.

use crate::constants::thresholds::{
    CRITICAL_FLOW_RATE_LPM, CRITICAL_WATER_LEVEL_CM, HIGH_FLOW_RATE_LPM, HIGH_WATER_LEVEL_CM,
    MEDIUM_FLOW_RATE_LPM, MEDIUM_WATER_LEVEL_CM, NORMAL_FLOW_RATE_LPM, NORMAL_WATER_LEVEL_CM,
};
use crate::errors::{ValidationError, ValidationResult};

/// Flood risk level
///
/// Ordered: `Low < Medium < High < Critical`, so `max()` picks the worse
/// of two classifications. Wire names match the dashboard contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum RiskLevel {
    /// Conditions normal
    Low,
    /// Stay alert, avoid low-lying areas
    Medium,
    /// Prepare for evacuation
    High,
    /// Immediate evacuation required
    Critical,
}

impl RiskLevel {
    /// Wire/dashboard name for this level
    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ascending threshold family (normal/medium/high/critical boundaries)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdFamily {
    /// Upper bound of unremarkable readings
    pub normal: f32,
    /// Boundary where risk becomes MEDIUM
    pub medium: f32,
    /// Boundary where risk becomes HIGH
    pub high: f32,
    /// Boundary where risk becomes CRITICAL
    pub critical: f32,
}

impl ThresholdFamily {
    /// Classify a reading against this family
    pub fn classify(&self, value: f32) -> RiskLevel {
        if value >= self.critical {
            RiskLevel::Critical
        } else if value >= self.high {
            RiskLevel::High
        } else if value >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Check the ordering invariant: normal < medium < high < critical
    pub fn validate(&self, what: &'static str) -> ValidationResult<()> {
        let ordered = self.normal < self.medium && self.medium < self.high && self.high < self.critical;
        let finite = self.normal.is_finite()
            && self.medium.is_finite()
            && self.high.is_finite()
            && self.critical.is_finite();

        if !finite || !ordered {
            return Err(ValidationError::InvalidThresholds { reason: what });
        }
        Ok(())
    }
}

/// Risk thresholds for both monitored quantities
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskThresholds {
    /// Water-level boundaries (cm)
    pub water: ThresholdFamily,
    /// Flow-rate boundaries (L/min)
    pub flow: ThresholdFamily,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            water: ThresholdFamily {
                normal: NORMAL_WATER_LEVEL_CM,
                medium: MEDIUM_WATER_LEVEL_CM,
                high: HIGH_WATER_LEVEL_CM,
                critical: CRITICAL_WATER_LEVEL_CM,
            },
            flow: ThresholdFamily {
                normal: NORMAL_FLOW_RATE_LPM,
                medium: MEDIUM_FLOW_RATE_LPM,
                high: HIGH_FLOW_RATE_LPM,
                critical: CRITICAL_FLOW_RATE_LPM,
            },
        }
    }
}

impl RiskThresholds {
    /// Validate both families' ordering invariants
    pub fn validate(&self) -> ValidationResult<()> {
        self.water.validate("water thresholds out of order")?;
        self.flow.validate("flow thresholds out of order")?;
        Ok(())
    }

    /// Classify combined flood risk from both sensors
    ///
    /// Returns the worse of the two per-sensor classifications.
    pub fn classify(&self, water_level_cm: f32, flow_rate_lpm: f32) -> RiskLevel {
        let by_water = self.water.classify(water_level_cm);
        let by_flow = self.flow.classify(flow_rate_lpm);
        by_water.max(by_flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn classify_water_boundaries() {
        let t = RiskThresholds::default();

        assert_eq!(t.water.classify(15.0), RiskLevel::Low);
        assert_eq!(t.water.classify(20.0), RiskLevel::Medium);
        assert_eq!(t.water.classify(30.0), RiskLevel::High);
        assert_eq!(t.water.classify(40.0), RiskLevel::Critical);
        assert_eq!(t.water.classify(80.0), RiskLevel::Critical);
    }

    #[test]
    fn combined_takes_worse_class() {
        let t = RiskThresholds::default();

        // Calm water but a surge in the drain line
        assert_eq!(t.classify(10.0, 35.0), RiskLevel::High);

        // Standing water, little flow
        assert_eq!(t.classify(42.0, 5.0), RiskLevel::Critical);

        // Both calm
        assert_eq!(t.classify(10.0, 5.0), RiskLevel::Low);
    }

    #[test]
    fn default_thresholds_are_ordered() {
        assert!(RiskThresholds::default().validate().is_ok());
    }

    #[test]
    fn unordered_thresholds_rejected() {
        let mut t = RiskThresholds::default();
        t.water.high = t.water.medium - 1.0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn nan_thresholds_rejected() {
        let mut t = RiskThresholds::default();
        t.flow.critical = f32::NAN;
        assert!(t.validate().is_err());
    }

    proptest! {
        /// Classification never decreases as the water rises
        #[test]
        fn classification_monotonic_in_water(a in 0.0f32..100.0, b in 0.0f32..100.0) {
            let t = RiskThresholds::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(t.water.classify(lo) <= t.water.classify(hi));
        }

        /// Combined class is never milder than either sensor alone
        #[test]
        fn combined_never_milder(water in 0.0f32..100.0, flow in 0.0f32..60.0) {
            let t = RiskThresholds::default();
            let combined = t.classify(water, flow);
            prop_assert!(combined >= t.water.classify(water));
            prop_assert!(combined >= t.flow.classify(flow));
        }
    }
}
