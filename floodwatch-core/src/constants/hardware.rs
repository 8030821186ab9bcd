//! Sensor Hardware Specifications
//!
//! Operational limits and calibration factors for the sensors the station
//! ships with: an HC-SR04 ultrasonic ranger mounted above the channel for
//! water level, and a YF-S201 hall-effect flow meter in the drain line.

// ===== HC-SR04 ULTRASONIC RANGER =====

/// Minimum distance the HC-SR04 can resolve (cm).
///
/// Readings below this are echo artifacts from the transducer itself.
///
/// Source: HC-SR04 datasheet (2 cm - 400 cm range)
pub const MIN_DISTANCE_CM: f32 = 2.0;

/// Maximum distance the HC-SR04 can resolve (cm).
///
/// Beyond this the echo is too weak to detect reliably.
///
/// Source: HC-SR04 datasheet
pub const MAX_DISTANCE_CM: f32 = 400.0;

/// Default mounting height of the ranger above the channel floor (cm).
///
/// Water level = mounting height - measured distance. Deployments
/// override this after measuring the actual installation.
pub const DEFAULT_SENSOR_HEIGHT_CM: f32 = 100.0;

/// Echo round-trip time per centimeter of distance (µs/cm).
///
/// Sound travels ~343 m/s at 20°C, and the ping covers the distance
/// twice, giving the conventional 58 µs/cm divisor.
///
/// Source: HC-SR04 application notes
pub const ECHO_US_PER_CM: f32 = 58.0;

/// Maximum rate the water level can plausibly change (cm/s).
///
/// Flash-flood onset in small drainage channels observed well below
/// this; faster changes indicate echo noise or a dislodged sensor.
pub const WATER_LEVEL_MAX_RATE_CM_PER_S: f32 = 5.0;

// ===== FLOW METER PULSE FACTORS =====

/// Pulses per liter for the YF-S201 (default flow meter).
///
/// Source: YF-S201 datasheet (450 pulses/L, F = 7.5 * Q)
pub const YF_S201_PULSES_PER_LITER: f32 = 450.0;

/// Pulses per liter for the YF-B1 variant.
pub const YF_B1_PULSES_PER_LITER: f32 = 660.0;

/// Pulses per liter for the YF-B2 variant.
pub const YF_B2_PULSES_PER_LITER: f32 = 450.0;

/// Pulses per liter for the small-bore YF-S402.
pub const YF_S402_PULSES_PER_LITER: f32 = 5880.0;

/// Maximum flow rate the YF-S201 can meter (L/min).
///
/// Source: YF-S201 datasheet (1-30 L/min working range), with headroom
/// for surge conditions before the reading is treated as implausible.
pub const FLOW_SENSOR_MAX_LPM: f32 = 60.0;

/// Maximum rate the flow reading can plausibly change (L/min per second).
pub const FLOW_MAX_RATE_LPM_PER_S: f32 = 10.0;

// ===== RAIN GAUGE PLAUSIBILITY =====

/// Maximum plausible rainfall intensity (mm/h).
///
/// The heaviest recorded cloudbursts stay under ~300 mm/h; anything
/// above this bound is a gauge fault.
pub const RAINFALL_MAX_MM_PER_H: f32 = 300.0;

// ===== DEFAULT PIN ASSIGNMENTS (ESP32 reference board) =====

/// HC-SR04 trigger pin.
pub const TRIG_PIN: u8 = 2;

/// HC-SR04 echo pin.
pub const ECHO_PIN: u8 = 4;

/// YF-S201 signal pin (must support interrupts for pulse counting).
pub const FLOW_SENSOR_PIN: u8 = 5;

// ===== FALLBACK READINGS =====

/// Water level substituted when the ranger faults (cm).
pub const DEFAULT_WATER_LEVEL_CM: f32 = 10.0;

/// Flow rate substituted when the flow meter faults (L/min).
pub const DEFAULT_FLOW_RATE_LPM: f32 = 5.0;
