//! Station library: configuration, simulated sensors, and the monitor loop
//!
//! The binary in `main.rs` is a thin CLI over these modules; they are a
//! library so integration tests can drive the monitor with fake
//! connectors and a fixed clock.

pub mod config;
pub mod monitor;
pub mod sim;

pub use config::StationConfig;
pub use monitor::{AlertSender, Monitor, TickOutcome};
pub use sim::{RawSample, SensorSimulator};
