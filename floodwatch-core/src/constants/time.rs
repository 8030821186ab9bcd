//! Timing Constants
//!
//! Sampling intervals and protocol timeouts for the station loop. All
//! intervals are milliseconds unless the name says otherwise.

// ===== UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1_000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = MS_PER_SECOND * SECONDS_PER_MINUTE;

// ===== SAMPLING INTERVALS =====

/// How often sensors are read and the sensor topic published (ms).
///
/// 5 s keeps the dashboard live without flooding the broker.
pub const SENSOR_READ_INTERVAL_MS: u64 = 5_000;

/// How often the prediction is recomputed and published (ms).
pub const PREDICTION_INTERVAL_MS: u64 = 30_000;

/// How often weather data is refreshed and published (ms).
pub const WEATHER_UPDATE_INTERVAL_MS: u64 = 60_000;

/// Number of samples in the moving-average smoothing window.
///
/// Five samples at the 5 s read interval smooths ultrasonic echo jitter
/// while still tracking a rising channel within half a minute.
pub const SMOOTHING_SAMPLES: usize = 5;

// ===== PROTOCOL TIMING =====

/// MQTT keepalive interval (seconds).
pub const MQTT_KEEPALIVE_SECS: u16 = 15;

/// Delay between MQTT reconnection attempts (ms).
pub const MQTT_RETRY_DELAY_MS: u64 = 5_000;

/// Maximum consecutive MQTT reconnection attempts before giving up.
pub const MAX_MQTT_RECONNECT_ATTEMPTS: u32 = 5;

// ===== ALERTING =====

/// Default minimum interval between Telegram alerts (minutes).
///
/// 15 min suits river/dam stations; small residential channels run 5-10.
/// Zero disables the cooldown entirely (alert on every qualifying change).
pub const DEFAULT_ALERT_COOLDOWN_MIN: u32 = 15;
