//! Outbound connectors for Floodwatch stations
//!
//! Two delivery paths leave a station:
//!
//! - **MQTT** ([`mqtt`]): the telemetry firehose. Sensor, weather, and
//!   prediction payloads published to the broker every few seconds, QoS 1,
//!   over a persistent connection that survives broker restarts.
//! - **Telegram** ([`telegram`]): the alert path. Low volume, human
//!   recipients, delivered over plain HTTPS because the bot API is just a
//!   REST endpoint.
//!
//! Alert rate limiting lives in [`alerts`] rather than in the Telegram
//! client so the cooldown logic can be tested without a network and reused
//! if another alert channel is added.
//!
//! ## Example
//!
//! ```no_run
//! use floodwatch_connectors::{Connector, mqtt::{MqttConfig, MqttConnector}};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MqttConfig::new("broker.local", 1883)
//!     .client_id("flood-sensor-001")
//!     .keep_alive_secs(15);
//! let mut mqtt = MqttConnector::connect(config)?;
//!
//! mqtt.send("floodwatch/sensor/data", br#"{"waterLevel":12.5}"#)?;
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod mqtt;
pub mod telegram;

pub use alerts::{AlertGate, AlertPolicy};
pub use mqtt::{MqttConfig, MqttConnector, MqttError};
pub use telegram::{TelegramClient, TelegramConfig, TelegramError};

use thiserror::Error;

/// Errors common to all connectors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Connector has no live connection to its endpoint
    #[error("Not connected")]
    NotConnected,

    /// Endpoint did not respond in time
    #[error("Timeout")]
    Timeout,

    /// Protocol-level failure, wraps the underlying error text
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Bad connector configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Trait for outbound delivery paths
pub trait Connector {
    /// Connector-specific error type
    type Error;

    /// Send a payload to a topic (or endpoint path)
    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if the connector currently has a live connection
    fn is_connected(&self) -> bool;
}

/// Delivery statistics, shared across connector types
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages that failed to send
    pub messages_failed: u64,
    /// Total payload bytes sent
    pub bytes_sent: u64,
    /// Number of reconnections since startup
    pub reconnections: u32,
    /// Last error message, if any
    pub last_error: Option<String>,
}
