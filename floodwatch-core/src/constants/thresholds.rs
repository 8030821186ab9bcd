//! Flood-Risk Thresholds and Prediction Weights
//!
//! Default risk boundaries for a small drainage channel. Deployments tune
//! these per site: a house gutter might use 5/10/15 cm while a river
//! station uses 50/100/150 cm. The ordering invariant (normal < medium <
//! high < critical) is enforced by [`crate::risk::RiskThresholds`].

// ===== WATER LEVEL THRESHOLDS (cm) =====

/// Water level considered normal for the channel (cm).
pub const NORMAL_WATER_LEVEL_CM: f32 = 15.0;

/// Water level where risk becomes MEDIUM (cm).
pub const MEDIUM_WATER_LEVEL_CM: f32 = 20.0;

/// Water level where risk becomes HIGH (cm).
pub const HIGH_WATER_LEVEL_CM: f32 = 30.0;

/// Water level where risk becomes CRITICAL (cm).
pub const CRITICAL_WATER_LEVEL_CM: f32 = 40.0;

// ===== FLOW RATE THRESHOLDS (L/min) =====

/// Flow rate considered normal (L/min).
pub const NORMAL_FLOW_RATE_LPM: f32 = 10.0;

/// Flow rate where risk becomes MEDIUM (L/min).
pub const MEDIUM_FLOW_RATE_LPM: f32 = 20.0;

/// Flow rate where risk becomes HIGH (L/min).
pub const HIGH_FLOW_RATE_LPM: f32 = 30.0;

/// Flow rate where risk becomes CRITICAL (L/min).
pub const CRITICAL_FLOW_RATE_LPM: f32 = 40.0;

// ===== PREDICTION SCORE WEIGHTS =====
//
// The risk score blends three normalized factors. Water level dominates
// because it is the direct flood indicator; flow and rainfall are leading
// indicators of what the level will do next.

/// Weight of the water-level factor in the risk score.
pub const SCORE_WEIGHT_WATER: f32 = 0.4;

/// Weight of the flow-rate factor in the risk score.
pub const SCORE_WEIGHT_FLOW: f32 = 0.3;

/// Weight of the rainfall factor in the risk score.
pub const SCORE_WEIGHT_RAIN: f32 = 0.3;

/// Water level at which the water factor saturates at 100% (cm).
pub const SCORE_SCALE_WATER_CM: f32 = 60.0;

/// Flow rate at which the flow factor saturates at 100% (L/min).
pub const SCORE_SCALE_FLOW_LPM: f32 = 30.0;

/// Rainfall at which the rain factor saturates at 100% (mm/h).
pub const SCORE_SCALE_RAIN_MM_PER_H: f32 = 20.0;

// ===== TIME-TO-FLOOD ESTIMATES (minutes) =====

/// Estimated minutes to flooding at CRITICAL risk.
pub const TIME_TO_FLOOD_CRITICAL_MIN: u32 = 15;

/// Estimated minutes to flooding at HIGH risk.
pub const TIME_TO_FLOOD_HIGH_MIN: u32 = 45;

/// Estimated minutes to flooding at MEDIUM risk.
pub const TIME_TO_FLOOD_MEDIUM_MIN: u32 = 120;
