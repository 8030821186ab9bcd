//! Shared validation helpers
//!
//! Pure functions used by all validators. No allocation, no side effects,
//! safe to call from an interrupt context on the device.

use crate::{
    constants::time::MS_PER_SECOND,
    errors::{ValidationError, ValidationResult},
    window::TimestampedReading,
};

/// Check if a value is within the specified range
pub fn check_range(value: f32, min: f32, max: f32) -> ValidationResult<()> {
    if value < min || value > max {
        Err(ValidationError::OutOfRange { value, min, max })
    } else {
        Ok(())
    }
}

/// Calculate rate of change per second
///
/// Absolute value: both a rising and a draining channel have limits, and
/// a single threshold is easier to configure. Zero time delta returns
/// zero rate - batch reads share a timestamp and must not divide by zero.
pub fn calculate_rate(current: f32, previous: f32, time_delta_ms: u64) -> f32 {
    if time_delta_ms == 0 {
        return 0.0;
    }

    let value_delta = (current - previous).abs();
    value_delta * MS_PER_SECOND as f32 / time_delta_ms as f32
}

/// Calculate rate of change from the last timestamped reading
pub fn calculate_rate_from_reading(
    current_value: f32,
    current_time: u64,
    last_reading: &TimestampedReading,
) -> f32 {
    let time_delta = current_time.saturating_sub(last_reading.timestamp);
    calculate_rate(current_value, last_reading.value, time_delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check() {
        assert!(check_range(5.0, 0.0, 10.0).is_ok());
        assert!(check_range(-1.0, 0.0, 10.0).is_err());
        assert!(check_range(11.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn rate_calculation() {
        // 10 cm change in 1 second = 10 cm/s
        assert_eq!(calculate_rate(30.0, 20.0, 1000), 10.0);

        // 5 cm change in 500 ms = 10 cm/s
        assert_eq!(calculate_rate(25.0, 20.0, 500), 10.0);

        // Zero time = zero rate
        assert_eq!(calculate_rate(30.0, 20.0, 0), 0.0);

        // Draining counts too
        assert_eq!(calculate_rate(20.0, 30.0, 1000), 10.0);
    }
}
