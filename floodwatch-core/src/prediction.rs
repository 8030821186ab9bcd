//! Weighted flood-risk prediction
//!
//! Produces the risk score and recommendation published on the prediction
//! topic. The score blends three factors, each normalized to a percentage
//! of its saturation scale:
//!
//! ```text
//! water_factor = water_level / 60 cm    * 100   (weight 0.4)
//! flow_factor  = flow_rate   / 30 L/min * 100   (weight 0.3)
//! rain_factor  = rainfall    / 20 mm/h  * 100   (weight 0.3)
//! score        = clamp(weighted sum, 0, 100)
//! ```
//!
//! The recommendation text and time-to-flood estimate come from the risk
//! level, not the score, so they stay consistent with what the alert
//! pipeline sends.

use crate::constants::thresholds::{
    SCORE_SCALE_FLOW_LPM, SCORE_SCALE_RAIN_MM_PER_H, SCORE_SCALE_WATER_CM, SCORE_WEIGHT_FLOW,
    SCORE_WEIGHT_RAIN, SCORE_WEIGHT_WATER, TIME_TO_FLOOD_CRITICAL_MIN, TIME_TO_FLOOD_HIGH_MIN,
    TIME_TO_FLOOD_MEDIUM_MIN,
};
use crate::risk::RiskLevel;

/// Per-factor contributions to the risk score, as percentages
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RiskFactors {
    /// Water-level factor (0-100+, pre-clamp)
    pub water_level: f32,
    /// Flow-rate factor
    pub flow_rate: f32,
    /// Rainfall factor
    pub rainfall: f32,
}

/// Computed flood prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodPrediction {
    /// Risk level the prediction was computed at
    pub risk_level: RiskLevel,
    /// Weighted risk score, 0-100
    pub risk_score: f32,
    /// Estimated minutes until flooding, if any risk is present
    pub time_to_flood_min: Option<u32>,
    /// Operator guidance for this risk level
    pub recommendation: &'static str,
    /// Per-factor breakdown
    pub factors: RiskFactors,
}

/// Operator guidance for a risk level
pub const fn recommendation_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "IMMEDIATE EVACUATION REQUIRED! Flood imminent within 15 minutes.",
        RiskLevel::High => "HIGH FLOOD RISK! Prepare for evacuation. Monitor conditions closely.",
        RiskLevel::Medium => "Moderate flood risk. Stay alert and avoid low-lying areas.",
        RiskLevel::Low => "Conditions normal. Continue monitoring.",
    }
}

/// Estimated minutes to flooding for a risk level
pub const fn time_to_flood_for(level: RiskLevel) -> Option<u32> {
    match level {
        RiskLevel::Critical => Some(TIME_TO_FLOOD_CRITICAL_MIN),
        RiskLevel::High => Some(TIME_TO_FLOOD_HIGH_MIN),
        RiskLevel::Medium => Some(TIME_TO_FLOOD_MEDIUM_MIN),
        RiskLevel::Low => None,
    }
}

/// Compute a prediction from current conditions
///
/// `level` is the classification from [`crate::risk::RiskThresholds`];
/// negative inputs contribute zero rather than pulling the score down.
pub fn predict(
    level: RiskLevel,
    water_level_cm: f32,
    flow_rate_lpm: f32,
    rainfall_mm_per_h: f32,
) -> FloodPrediction {
    let factors = RiskFactors {
        water_level: factor(water_level_cm, SCORE_SCALE_WATER_CM),
        flow_rate: factor(flow_rate_lpm, SCORE_SCALE_FLOW_LPM),
        rainfall: factor(rainfall_mm_per_h, SCORE_SCALE_RAIN_MM_PER_H),
    };

    let score = factors.water_level * SCORE_WEIGHT_WATER
        + factors.flow_rate * SCORE_WEIGHT_FLOW
        + factors.rainfall * SCORE_WEIGHT_RAIN;

    FloodPrediction {
        risk_level: level,
        risk_score: score.clamp(0.0, 100.0),
        time_to_flood_min: time_to_flood_for(level),
        recommendation: recommendation_for(level),
        factors,
    }
}

fn factor(value: f32, scale: f32) -> f32 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    (value / scale) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskThresholds;

    #[test]
    fn calm_conditions_score_low() {
        let t = RiskThresholds::default();
        let p = predict(t.classify(15.0, 8.0), 15.0, 8.0, 0.0);

        // 15/60*40 + 8/30*30 = 10 + 8 = 18
        assert!((p.risk_score - 18.0).abs() < 0.01);
        assert_eq!(p.risk_level, RiskLevel::Low);
        assert_eq!(p.time_to_flood_min, None);
        assert_eq!(p.recommendation, "Conditions normal. Continue monitoring.");
    }

    #[test]
    fn flood_conditions_score_high() {
        let t = RiskThresholds::default();
        let level = t.classify(60.0, 30.0);
        let p = predict(level, 60.0, 30.0, 20.0);

        // All three factors saturated: 40 + 30 + 30 = 100
        assert!((p.risk_score - 100.0).abs() < 0.01);
        assert_eq!(p.risk_level, RiskLevel::Critical);
        assert_eq!(p.time_to_flood_min, Some(15));
    }

    #[test]
    fn score_is_clamped() {
        let p = predict(RiskLevel::Critical, 500.0, 500.0, 500.0);
        assert_eq!(p.risk_score, 100.0);

        let p = predict(RiskLevel::Low, -10.0, -10.0, -10.0);
        assert_eq!(p.risk_score, 0.0);
    }

    #[test]
    fn time_to_flood_tracks_level() {
        assert_eq!(time_to_flood_for(RiskLevel::High), Some(45));
        assert_eq!(time_to_flood_for(RiskLevel::Medium), Some(120));
        assert_eq!(time_to_flood_for(RiskLevel::Low), None);
    }

    #[test]
    fn nan_inputs_contribute_nothing() {
        let p = predict(RiskLevel::Low, f32::NAN, 8.0, 0.0);
        assert!(p.risk_score.is_finite());
        assert_eq!(p.factors.water_level, 0.0);
    }
}
