//! Constants for Floodwatch
//!
//! Centralized constants carried over from the station's configuration
//! header, grouped by concern. Every value documents its unit and where it
//! comes from (sensor datasheet or deployment default), and code elsewhere
//! uses these names instead of magic numbers.

/// Sensor hardware characteristics (HC-SR04, YF-S201 family) and pins.
pub mod hardware;

/// Flood-risk thresholds and prediction weights.
pub mod thresholds;

/// Sampling intervals, timeouts, and unit conversions.
pub mod time;

// Re-export commonly used constants for convenience
pub use hardware::{
    DEFAULT_FLOW_RATE_LPM, DEFAULT_SENSOR_HEIGHT_CM, DEFAULT_WATER_LEVEL_CM, MAX_DISTANCE_CM,
    MIN_DISTANCE_CM, YF_S201_PULSES_PER_LITER,
};

pub use thresholds::{
    CRITICAL_FLOW_RATE_LPM, CRITICAL_WATER_LEVEL_CM, HIGH_FLOW_RATE_LPM, HIGH_WATER_LEVEL_CM,
    MEDIUM_FLOW_RATE_LPM, MEDIUM_WATER_LEVEL_CM, NORMAL_FLOW_RATE_LPM, NORMAL_WATER_LEVEL_CM,
};

pub use time::{
    DEFAULT_ALERT_COOLDOWN_MIN, MQTT_KEEPALIVE_SECS, MS_PER_SECOND, PREDICTION_INTERVAL_MS,
    SENSOR_READ_INTERVAL_MS, SMOOTHING_SAMPLES, WEATHER_UPDATE_INTERVAL_MS,
};
