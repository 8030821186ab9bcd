//! Raw sensor value conversions
//!
//! The HC-SR04 reports an echo round-trip time and the YF-S201 a pulse
//! count; everything downstream works in centimeters and liters per
//! minute. These conversions sit between the hardware driver and the
//! validators so a bad conversion is caught as an out-of-range reading,
//! not propagated as a bogus risk level.

use crate::constants::hardware::{ECHO_US_PER_CM, MAX_DISTANCE_CM, MIN_DISTANCE_CM};
use crate::constants::time::{MS_PER_SECOND, SECONDS_PER_MINUTE};

/// Convert an HC-SR04 echo round-trip time to distance (cm)
///
/// The ping covers the sensor-to-surface distance twice; 58 µs/cm is the
/// conventional divisor at room temperature.
pub fn echo_to_distance_cm(echo_us: f32) -> f32 {
    echo_us / ECHO_US_PER_CM
}

/// Whether a distance reading falls inside the HC-SR04 measurable window
///
/// The sensor cannot resolve surfaces closer than 2 cm or farther than
/// 400 cm; readings outside that window are echo artifacts and must be
/// treated as sensor faults, never converted to a water level. NaN
/// fails the check.
pub fn distance_is_measurable(distance_cm: f32) -> bool {
    (MIN_DISTANCE_CM..=MAX_DISTANCE_CM).contains(&distance_cm)
}

/// Convert a measured distance to water level above the channel floor (cm)
///
/// The ranger points down from `sensor_height` above the floor, so the
/// level is the complement of the distance. Clamped at zero: a distance
/// reading beyond the mounting height means an empty channel, not
/// negative water.
pub fn distance_to_level_cm(distance_cm: f32, sensor_height_cm: f32) -> f32 {
    (sensor_height_cm - distance_cm).max(0.0)
}

/// Convert a pulse count over a sampling window to flow rate (L/min)
///
/// `pulses_per_liter` comes from the meter datasheet (450 for YF-S201).
/// A zero-length window yields 0 L/min rather than dividing by zero.
pub fn pulses_to_flow_lpm(pulses: u32, window_ms: u64, pulses_per_liter: f32) -> f32 {
    if window_ms == 0 || pulses_per_liter <= 0.0 {
        return 0.0;
    }

    let liters = pulses as f32 / pulses_per_liter;
    let minutes = window_ms as f32 / (MS_PER_SECOND * SECONDS_PER_MINUTE) as f32;
    liters / minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::hardware::YF_S201_PULSES_PER_LITER;

    #[test]
    fn echo_conversion() {
        // 580 µs round trip = 10 cm
        assert!((echo_to_distance_cm(580.0) - 10.0).abs() < 0.01);
    }

    #[test]
    fn level_from_distance() {
        // Ranger 100 cm above the floor, surface 80 cm away = 20 cm of water
        assert_eq!(distance_to_level_cm(80.0, 100.0), 20.0);

        // Echo past the floor clamps to an empty channel
        assert_eq!(distance_to_level_cm(120.0, 100.0), 0.0);
    }

    #[test]
    fn flow_from_pulses() {
        // 450 pulses in one minute = 1 L/min on a YF-S201
        let lpm = pulses_to_flow_lpm(450, 60_000, YF_S201_PULSES_PER_LITER);
        assert!((lpm - 1.0).abs() < 0.001);

        // 225 pulses in 5 s = 6 L/min
        let lpm = pulses_to_flow_lpm(225, 5_000, YF_S201_PULSES_PER_LITER);
        assert!((lpm - 6.0).abs() < 0.001);
    }

    #[test]
    fn measurable_window_bounds() {
        assert!(distance_is_measurable(2.0));
        assert!(distance_is_measurable(98.0));
        assert!(distance_is_measurable(400.0));

        // Echo artifacts below the sensor floor would otherwise read as a
        // nearly full channel under an inverted mount
        assert!(!distance_is_measurable(1.0));
        assert!(!distance_is_measurable(0.0));
        assert!(!distance_is_measurable(400.1));
        assert!(!distance_is_measurable(f32::NAN));
    }

    #[test]
    fn zero_window_is_zero_flow() {
        assert_eq!(pulses_to_flow_lpm(100, 0, YF_S201_PULSES_PER_LITER), 0.0);
    }
}
