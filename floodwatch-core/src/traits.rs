//! Core traits for sensor validators
//!
//! One validator per sensor type, all behind the same interface so the
//! station loop can treat the ultrasonic ranger, flow meter, and rain
//! gauge uniformly.

use crate::errors::ValidationResult;
use crate::time::Timestamp;
use crate::window::SampleWindow;

/// Size of the history window validators consult for rate checks.
///
/// Slightly larger than the smoothing window so a rate check can look
/// back past one full averaging span.
pub const MAX_HISTORY_SIZE: usize = 8;

/// Context passed to validators containing history and sensor health
#[derive(Clone)]
pub struct ValidationContext {
    /// Recent readings with timestamps for rate-of-change validation
    pub history: SampleWindow<MAX_HISTORY_SIZE>,

    /// Current timestamp in milliseconds
    pub timestamp: Timestamp,

    /// Sensor quality indicator (0.0 = dead, 1.0 = healthy)
    ///
    /// Derived from recent fault counts; a ranger that keeps timing out
    /// drops below the validators' quality floor.
    pub sensor_quality: f32,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            history: SampleWindow::new(),
            timestamp: 0,
            sensor_quality: 1.0,
        }
    }
}

impl ValidationContext {
    /// Add a reading to history, maintaining chronological order
    pub fn add_reading(&mut self, value: f32, timestamp: Timestamp) {
        self.history.push(crate::window::TimestampedReading { value, timestamp });
    }

    /// Time delta from the last reading in milliseconds
    pub fn time_delta_ms(&self) -> Option<u64> {
        self.history
            .last()
            .map(|last| self.timestamp.saturating_sub(last.timestamp))
    }
}

/// Core validator trait - implement this for each sensor type
pub trait Validator {
    /// The type of value this validator handles
    type Value;

    /// Validate a single reading
    fn validate(&self, value: Self::Value, context: &ValidationContext) -> ValidationResult<()>;

    /// Get the physical constraints this validator enforces
    fn constraints(&self) -> ValidatorConstraints;
}

/// Physical constraints for a validator
#[derive(Debug, Clone, Copy)]
pub struct ValidatorConstraints {
    /// Minimum valid value
    pub min_value: f32,

    /// Maximum valid value
    pub max_value: f32,

    /// Maximum rate of change per second
    pub max_rate_change: f32,
}

/// Trait for values that can be validated
pub trait Validatable {
    /// Check if the value is numerically valid (not NaN, infinite, etc)
    fn is_valid(&self) -> bool;
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}
