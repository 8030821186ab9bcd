//! Sensor validators for the flood station
//!
//! Each validator checks a reading against what the channel can
//! physically do, not just what the sensor can report:
//!
//! - Range: an HC-SR04 cannot see past 400 cm, and water cannot sit above
//!   the ranger's mounting height.
//! - Rate of change: a drainage channel does not gain 30 cm of water in
//!   one second; a jump like that is echo noise or a dislodged sensor.
//! - Quality: a sensor that keeps faulting gets its readings rejected so
//!   the monitor substitutes the configured fallback instead of feeding
//!   garbage into the risk classifier.
//!
//! Validators are deliberately permissive about history: with no prior
//! readings (cold start, cleared window) only range and sanity checks
//! apply. Rejecting on missing history would blind the station exactly
//! when it reboots during a storm.
//!
//! ```rust
//! use floodwatch_core::{Validator, WaterLevelValidator, ValidationContext};
//!
//! let validator = WaterLevelValidator::default();
//! let mut ctx = ValidationContext::default();
//! ctx.timestamp = 5_000;
//!
//! validator.validate(18.0, &ctx)?;
//! # Ok::<(), floodwatch_core::ValidationError>(())
//! ```

mod flow_rate;
mod rainfall;
mod utils;
mod water_level;

pub use flow_rate::FlowRateValidator;
pub use rainfall::RainfallValidator;
pub use water_level::WaterLevelValidator;
