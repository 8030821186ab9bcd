//! Error types for sensor validation failures
//!
//! Errors are kept small and `Copy` because they are returned from the
//! sampling hot path on every tick. All messages are `&'static str` so no
//! allocation happens when a sensor misbehaves - exactly the moment the
//! device can least afford it.
//!
//! Categories:
//! - `OutOfRange` / `RateExceeded` / `InvalidValue`: the reading itself is
//!   implausible (echo outside the HC-SR04 window, water rising faster than
//!   physically possible, NaN from a failed conversion).
//! - `SensorFault`: the sensor is degraded or stuck; the monitor substitutes
//!   the configured fallback reading.
//! - `InsufficientData`: not enough history in the smoothing window yet.

use thiserror_no_std::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    /// Value outside the physically measurable range
    #[error("Value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The reading that failed validation
        value: f32,
        /// Minimum plausible value for this sensor
        min: f32,
        /// Maximum plausible value for this sensor
        max: f32,
    },

    /// Rate of change too high for the monitored channel
    #[error("Rate {rate}/s exceeds limit {max_rate}/s")]
    RateExceeded {
        /// Calculated rate of change (units per second)
        rate: f32,
        /// Maximum plausible rate
        max_rate: f32,
    },

    /// Sensor reported bad quality, is stuck, or is offline
    #[error("Sensor fault: {reason}")]
    SensorFault {
        /// What went wrong, suitable for the station log
        reason: &'static str,
    },

    /// Value makes no numeric sense (NaN, infinity)
    #[error("Invalid value: not a valid number")]
    InvalidValue,

    /// Threshold family violates the ordering invariant
    #[error("Invalid thresholds: {reason}")]
    InvalidThresholds {
        /// Which family is out of order
        reason: &'static str,
    },

    /// Not enough history for rate or smoothing checks
    #[error("Insufficient data: need {required}, have {available}")]
    InsufficientData {
        /// Minimum number of samples needed
        required: usize,
        /// Samples currently in the window
        available: usize,
    },
}
