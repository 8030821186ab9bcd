//! Water-level validator for the ultrasonic ranger
//!
//! Validates levels derived from HC-SR04 distance readings:
//! - Level must sit between the channel floor and the mounting height
//! - Rate of change bounded by what a drainage channel can actually do
//! - Echo dropouts show up as NaN/Inf after conversion and are rejected

use crate::{
    constants::hardware::{DEFAULT_SENSOR_HEIGHT_CM, WATER_LEVEL_MAX_RATE_CM_PER_S},
    errors::{ValidationError, ValidationResult},
    traits::{Validatable, ValidationContext, Validator, ValidatorConstraints},
};

use super::utils;

/// Validator for water-level readings in centimeters
#[derive(Debug, Clone)]
pub struct WaterLevelValidator {
    /// Maximum valid level - the ranger's mounting height (cm)
    max_level_cm: f32,

    /// Maximum rate of change in cm/second
    max_rate_cm_per_sec: f32,
}

impl Default for WaterLevelValidator {
    fn default() -> Self {
        Self {
            // Water physically cannot rise above the sensor
            max_level_cm: DEFAULT_SENSOR_HEIGHT_CM,

            // Flash-flood onset in small channels stays well below this
            max_rate_cm_per_sec: WATER_LEVEL_MAX_RATE_CM_PER_S,
        }
    }
}

impl WaterLevelValidator {
    /// Create a validator for a specific installation
    ///
    /// `sensor_height_cm` is the measured distance from the ranger to the
    /// channel floor.
    pub fn new(sensor_height_cm: f32, max_rate: f32) -> Self {
        Self {
            max_level_cm: sensor_height_cm.max(0.0),
            max_rate_cm_per_sec: max_rate.abs(),
        }
    }

    /// Validator tuned for a small residential gutter (shallow, fast)
    pub fn residential() -> Self {
        Self {
            max_level_cm: 50.0,
            max_rate_cm_per_sec: 3.0,
        }
    }

    /// Validator tuned for a river station (deep, slow)
    pub fn river() -> Self {
        Self {
            max_level_cm: 400.0,
            max_rate_cm_per_sec: 1.0,
        }
    }
}

impl Validator for WaterLevelValidator {
    type Value = f32;

    fn validate(&self, value: Self::Value, context: &ValidationContext) -> ValidationResult<()> {
        if !value.is_valid() {
            return Err(ValidationError::InvalidValue);
        }

        utils::check_range(value, 0.0, self.max_level_cm)?;

        // Rate check only once we have history
        if let Some(last) = context.history.last() {
            let rate = utils::calculate_rate_from_reading(value, context.timestamp, last);

            if rate > self.max_rate_cm_per_sec {
                return Err(ValidationError::RateExceeded {
                    rate,
                    max_rate: self.max_rate_cm_per_sec,
                });
            }
        }

        if context.sensor_quality < 0.5 {
            return Err(ValidationError::SensorFault {
                reason: "Ultrasonic ranger degraded",
            });
        }

        Ok(())
    }

    fn constraints(&self) -> ValidatorConstraints {
        ValidatorConstraints {
            min_value: 0.0,
            max_value: self.max_level_cm,
            max_rate_change: self.max_rate_cm_per_sec,
        }
    }
}
