//! Core engine for Floodwatch
//!
//! Validates water-level and flow-rate readings from drainage sensors,
//! classifies flood risk against configurable thresholds, and computes
//! the weighted risk score published on the prediction topic.
//!
//! Key constraints:
//! - no_std capable (the reference station is an ESP32-class device)
//! - No heap allocation in the sampling path
//! - Deterministic classification: same readings, same risk level
//!
//! ```no_run
//! use floodwatch_core::{Validator, WaterLevelValidator, ValidationContext};
//!
//! let validator = WaterLevelValidator::default();
//! let context = ValidationContext::default();
//!
//! // Validate a smoothed water-level reading (cm)
//! match validator.validate(18.5, &context) {
//!     Ok(_) => {},   // Publish it
//!     Err(_e) => {}, // Fall back to the configured default reading
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod convert;
pub mod errors;
pub mod prediction;
pub mod risk;
pub mod time;
pub mod traits;
pub mod validators;
pub mod window;

#[cfg(feature = "std")]
pub mod telemetry;

// Public API
pub use errors::{ValidationError, ValidationResult};
pub use prediction::{FloodPrediction, RiskFactors};
pub use risk::{RiskLevel, RiskThresholds};
pub use traits::{ValidationContext, Validator};
pub use validators::{FlowRateValidator, RainfallValidator, WaterLevelValidator};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
