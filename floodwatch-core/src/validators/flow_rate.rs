//! Flow-rate validator for the hall-effect flow meter
//!
//! Validates L/min readings derived from YF-S201 pulse counts. The meter
//! itself cannot report negative flow, but a miscounted interrupt window
//! can produce absurd rates, and a seized rotor reads a permanent zero -
//! both cases end up here.

use crate::{
    constants::hardware::{FLOW_MAX_RATE_LPM_PER_S, FLOW_SENSOR_MAX_LPM},
    errors::{ValidationError, ValidationResult},
    traits::{Validatable, ValidationContext, Validator, ValidatorConstraints},
};

use super::utils;

/// Validator for flow-rate readings in liters per minute
#[derive(Debug, Clone)]
pub struct FlowRateValidator {
    /// Maximum meterable flow (L/min)
    max_lpm: f32,

    /// Maximum rate of change in L/min per second
    max_rate_lpm_per_sec: f32,
}

impl Default for FlowRateValidator {
    fn default() -> Self {
        Self {
            max_lpm: FLOW_SENSOR_MAX_LPM,
            max_rate_lpm_per_sec: FLOW_MAX_RATE_LPM_PER_S,
        }
    }
}

impl FlowRateValidator {
    /// Create a validator with custom limits
    pub fn new(max_lpm: f32, max_rate: f32) -> Self {
        Self {
            max_lpm: max_lpm.max(0.0),
            max_rate_lpm_per_sec: max_rate.abs(),
        }
    }
}

impl Validator for FlowRateValidator {
    type Value = f32;

    fn validate(&self, value: Self::Value, context: &ValidationContext) -> ValidationResult<()> {
        if !value.is_valid() {
            return Err(ValidationError::InvalidValue);
        }

        utils::check_range(value, 0.0, self.max_lpm)?;

        if let Some(last) = context.history.last() {
            let rate = utils::calculate_rate_from_reading(value, context.timestamp, last);

            if rate > self.max_rate_lpm_per_sec {
                return Err(ValidationError::RateExceeded {
                    rate,
                    max_rate: self.max_rate_lpm_per_sec,
                });
            }
        }

        if context.sensor_quality < 0.5 {
            return Err(ValidationError::SensorFault {
                reason: "Flow meter degraded",
            });
        }

        Ok(())
    }

    fn constraints(&self) -> ValidatorConstraints {
        ValidatorConstraints {
            min_value: 0.0,
            max_value: self.max_lpm,
            max_rate_change: self.max_rate_lpm_per_sec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_flow() {
        let validator = FlowRateValidator::default();
        let context = ValidationContext::default();

        assert!(validator.validate(8.0, &context).is_ok());
        assert!(validator.validate(0.0, &context).is_ok());
    }

    #[test]
    fn negative_flow_rejected() {
        let validator = FlowRateValidator::default();
        let context = ValidationContext::default();

        assert!(validator.validate(-1.0, &context).is_err());
    }

    #[test]
    fn implausible_flow_rejected() {
        let validator = FlowRateValidator::default();
        let context = ValidationContext::default();

        // Way past what a YF-S201 can meter
        assert!(validator.validate(500.0, &context).is_err());
    }

    #[test]
    fn surge_rate_rejected() {
        let validator = FlowRateValidator::default();
        let mut context = ValidationContext::default();

        // 5 -> 40 L/min in one second: miscounted window
        context.add_reading(5.0, 1000);
        context.timestamp = 2000;

        assert!(matches!(
            validator.validate(40.0, &context),
            Err(ValidationError::RateExceeded { .. })
        ));
    }
}
