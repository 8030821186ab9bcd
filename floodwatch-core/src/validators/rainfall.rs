//! Rainfall validator
//!
//! The station's weather block reports rainfall intensity in mm/h,
//! simulated or from a local gauge. Intensity feeds the prediction score,
//! so a stuck gauge reporting 900 mm/h would pin the score at maximum.

use crate::{
    constants::hardware::RAINFALL_MAX_MM_PER_H,
    errors::{ValidationError, ValidationResult},
    traits::{Validatable, ValidationContext, Validator, ValidatorConstraints},
};

use super::utils;

/// Validator for rainfall intensity in mm/h
#[derive(Debug, Clone)]
pub struct RainfallValidator {
    max_mm_per_h: f32,
}

impl Default for RainfallValidator {
    fn default() -> Self {
        Self {
            max_mm_per_h: RAINFALL_MAX_MM_PER_H,
        }
    }
}

impl RainfallValidator {
    /// Create a validator with a custom intensity ceiling
    pub fn new(max_mm_per_h: f32) -> Self {
        Self {
            max_mm_per_h: max_mm_per_h.max(0.0),
        }
    }
}

impl Validator for RainfallValidator {
    type Value = f32;

    fn validate(&self, value: Self::Value, _context: &ValidationContext) -> ValidationResult<()> {
        if !value.is_valid() {
            return Err(ValidationError::InvalidValue);
        }

        utils::check_range(value, 0.0, self.max_mm_per_h)
    }

    fn constraints(&self) -> ValidatorConstraints {
        ValidatorConstraints {
            min_value: 0.0,
            max_value: self.max_mm_per_h,
            // Rain intensity genuinely can step instantly (squall lines)
            max_rate_change: f32::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_rain() {
        let validator = RainfallValidator::default();
        let context = ValidationContext::default();

        assert!(validator.validate(0.0, &context).is_ok());
        assert!(validator.validate(25.0, &context).is_ok());
    }

    #[test]
    fn implausible_rain_rejected() {
        let validator = RainfallValidator::default();
        let context = ValidationContext::default();

        assert!(validator.validate(-1.0, &context).is_err());
        assert!(validator.validate(900.0, &context).is_err());
    }
}
