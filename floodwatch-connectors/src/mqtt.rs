//! MQTT connector for station telemetry
//!
//! Wraps the synchronous `rumqttc` client. The event loop runs on a
//! background thread so the monitor loop never blocks on broker I/O;
//! publishes go through the client handle and are flushed by that thread.
//!
//! Connection state is tracked from the event stream (ConnAck marks us
//! live, any connection error marks us down) and exposed through
//! [`Connector::is_connected`] so the monitor can log outages and count
//! reconnections without touching the socket itself. After
//! `max_reconnect_attempts` consecutive failures the event loop stops
//! and the connector stays marked down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};
use thiserror::Error;

use floodwatch_core::constants::time::MAX_MQTT_RECONNECT_ATTEMPTS;

use crate::{ConnectionStats, Connector};

/// MQTT-specific errors
#[derive(Debug, Error)]
pub enum MqttError {
    /// Publish rejected by the client (queue full, disconnected)
    #[error("Publish failed: {0}")]
    Publish(String),

    /// Bad connector configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// MQTT connection configuration
#[derive(Debug, Clone)]
pub struct MqttConfig {
    /// Broker hostname or IP
    pub host: String,
    /// Broker port (1883 plain, 8883 TLS)
    pub port: u16,
    /// Client identifier, doubles as the station's device id
    pub client_id: String,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
    /// Optional username/password credentials
    pub credentials: Option<(String, String)>,
    /// Outgoing request queue capacity
    pub queue_capacity: usize,
    /// Delay between reconnect attempts
    pub reconnect_delay: Duration,
    /// Consecutive failed attempts before the event loop gives up;
    /// 0 retries forever
    pub max_reconnect_attempts: u32,
}

impl MqttConfig {
    /// Create a configuration for the given broker
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: "floodwatch-station".into(),
            keep_alive_secs: 15,
            credentials: None,
            queue_capacity: 16,
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_attempts: MAX_MQTT_RECONNECT_ATTEMPTS,
        }
    }

    /// Set the client identifier
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Set the keep-alive interval
    pub fn keep_alive_secs(mut self, secs: u16) -> Self {
        self.keep_alive_secs = secs;
        self
    }

    /// Set username/password credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Set the delay between reconnect attempts
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the consecutive-failure cap for reconnection; 0 retries forever
    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    fn validate(&self) -> Result<(), MqttError> {
        if self.host.is_empty() {
            return Err(MqttError::Config("broker host is empty".into()));
        }
        if self.client_id.is_empty() {
            return Err(MqttError::Config("client id is empty".into()));
        }
        if self.keep_alive_secs == 0 {
            return Err(MqttError::Config("keep-alive must be nonzero".into()));
        }
        Ok(())
    }
}

/// Whether the event loop should stop retrying after `failures`
/// consecutive connection errors; a cap of 0 means retry forever
fn retries_exhausted(failures: u32, max_attempts: u32) -> bool {
    max_attempts != 0 && failures >= max_attempts
}

/// MQTT connector backed by a background event-loop thread
pub struct MqttConnector {
    client: Client,
    connected: Arc<AtomicBool>,
    stats: Arc<Mutex<ConnectionStats>>,
}

impl MqttConnector {
    /// Connect to the broker and start the event-loop thread
    ///
    /// Returns immediately; the connection is established asynchronously
    /// and `is_connected` flips once the broker acknowledges.
    pub fn connect(config: MqttConfig) -> Result<Self, MqttError> {
        config.validate()?;

        let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs as u64));
        if let Some((user, pass)) = &config.credentials {
            options.set_credentials(user, pass);
        }

        let (client, mut connection) = Client::new(options, config.queue_capacity);

        let connected = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(Mutex::new(ConnectionStats::default()));

        let flag = Arc::clone(&connected);
        let shared_stats = Arc::clone(&stats);
        let reconnect_delay = config.reconnect_delay;
        let max_attempts = config.max_reconnect_attempts;
        let broker = format!("{}:{}", config.host, config.port);

        thread::Builder::new()
            .name("mqtt-eventloop".into())
            .spawn(move || {
                let mut failures: u32 = 0;
                for notification in connection.iter() {
                    match notification {
                        Ok(Event::Incoming(Packet::ConnAck(_))) => {
                            info!("mqtt: connected to {}", broker);
                            failures = 0;
                            flag.store(true, Ordering::SeqCst);
                        }
                        Ok(Event::Incoming(Packet::Disconnect)) => {
                            warn!("mqtt: broker sent disconnect");
                            flag.store(false, Ordering::SeqCst);
                        }
                        Ok(event) => {
                            debug!("mqtt: event {:?}", event);
                        }
                        Err(e) => {
                            let was_connected = flag.swap(false, Ordering::SeqCst);
                            let mut s = shared_stats.lock().unwrap();
                            s.last_error = Some(e.to_string());
                            if was_connected {
                                s.reconnections += 1;
                                warn!("mqtt: connection lost ({}), retrying", e);
                            }
                            drop(s);
                            failures += 1;
                            if retries_exhausted(failures, max_attempts) {
                                error!(
                                    "mqtt: giving up on {} after {} consecutive failures",
                                    broker, failures
                                );
                                break;
                            }
                            // rumqttc's iterator reconnects on its own; pace it
                            thread::sleep(reconnect_delay);
                        }
                    }
                }
                debug!("mqtt: event loop finished");
            })
            .map_err(|e| MqttError::Config(format!("failed to spawn event loop: {e}")))?;

        Ok(Self {
            client,
            connected,
            stats,
        })
    }

    /// Publish a payload at QoS 1
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), MqttError> {
        match self
            .client
            .publish(topic, QoS::AtLeastOnce, false, payload.to_vec())
        {
            Ok(()) => {
                let mut s = self.stats.lock().unwrap();
                s.messages_sent += 1;
                s.bytes_sent += payload.len() as u64;
                Ok(())
            }
            Err(e) => {
                let mut s = self.stats.lock().unwrap();
                s.messages_failed += 1;
                s.last_error = Some(e.to_string());
                Err(MqttError::Publish(e.to_string()))
            }
        }
    }

    /// Snapshot of delivery statistics
    pub fn stats(&self) -> ConnectionStats {
        self.stats.lock().unwrap().clone()
    }

    /// Cleanly disconnect from the broker
    pub fn disconnect(&mut self) -> Result<(), MqttError> {
        self.client
            .disconnect()
            .map_err(|e| MqttError::Publish(e.to_string()))
    }
}

impl Connector for MqttConnector {
    type Error = MqttError;

    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        self.publish(topic, data)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = MqttConfig::new("broker.local", 1883)
            .client_id("flood-sensor-001")
            .keep_alive_secs(30)
            .credentials("station", "hunter2");

        assert_eq!(config.host, "broker.local");
        assert_eq!(config.client_id, "flood-sensor-001");
        assert_eq!(config.keep_alive_secs, 30);
        assert_eq!(
            config.credentials,
            Some(("station".into(), "hunter2".into()))
        );
        assert_eq!(config.max_reconnect_attempts, MAX_MQTT_RECONNECT_ATTEMPTS);
    }

    #[test]
    fn reconnect_cap_counts_consecutive_failures() {
        // Capped at 5: the fifth straight failure stops the loop
        assert!(!retries_exhausted(4, 5));
        assert!(retries_exhausted(5, 5));
        assert!(retries_exhausted(6, 5));

        // 0 disables the cap entirely
        assert!(!retries_exhausted(1_000, 0));
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(MqttConfig::new("", 1883).validate().is_err());
        assert!(MqttConfig::new("broker", 1883)
            .client_id("")
            .validate()
            .is_err());
        assert!(MqttConfig::new("broker", 1883)
            .keep_alive_secs(0)
            .validate()
            .is_err());
        assert!(MqttConfig::new("broker", 1883).validate().is_ok());
    }
}
