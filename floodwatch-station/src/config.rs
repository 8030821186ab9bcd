//! Station configuration
//!
//! Loaded from a TOML file; every field has a default matching the
//! reference deployment (HiveMQ public broker, `flood-mitigation/*`
//! topics, a 100 cm sensor mount over a small drainage channel), so an
//! empty file is a valid config.
//!
//! Telegram credentials can be supplied via `FLOODWATCH_TELEGRAM_TOKEN`
//! and `FLOODWATCH_TELEGRAM_CHAT_ID` to keep them out of the file.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use floodwatch_connectors::alerts::AlertPolicy;
use floodwatch_connectors::mqtt::MqttConfig;
use floodwatch_connectors::telegram::TelegramConfig;
use floodwatch_core::constants::hardware::{
    DEFAULT_FLOW_RATE_LPM, DEFAULT_SENSOR_HEIGHT_CM, DEFAULT_WATER_LEVEL_CM, MAX_DISTANCE_CM,
    MIN_DISTANCE_CM, YF_S201_PULSES_PER_LITER,
};
use floodwatch_core::constants::time::{
    DEFAULT_ALERT_COOLDOWN_MIN, MAX_MQTT_RECONNECT_ATTEMPTS, MQTT_KEEPALIVE_SECS,
    MQTT_RETRY_DELAY_MS, PREDICTION_INTERVAL_MS, SENSOR_READ_INTERVAL_MS,
    WEATHER_UPDATE_INTERVAL_MS,
};
use floodwatch_core::risk::{RiskThresholds, ThresholdFamily};
use floodwatch_core::telemetry::Location;

/// Environment variable overriding the Telegram bot token
pub const ENV_TELEGRAM_TOKEN: &str = "FLOODWATCH_TELEGRAM_TOKEN";
/// Environment variable overriding the Telegram chat id
pub const ENV_TELEGRAM_CHAT_ID: &str = "FLOODWATCH_TELEGRAM_CHAT_ID";

/// Top-level station configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationConfig {
    /// Station identity and location
    pub device: DeviceConfig,
    /// Broker connection
    pub mqtt: MqttSection,
    /// Publish topics
    pub topics: TopicsConfig,
    /// Sensor geometry, calibration, and timing
    pub sensors: SensorsConfig,
    /// Risk classification boundaries
    pub thresholds: ThresholdsConfig,
    /// Weather block
    pub weather: WeatherConfig,
    /// Prediction timing
    pub prediction: PredictionConfig,
    /// Telegram alerting
    pub telegram: TelegramSection,
}

/// Station identity
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Client id, also the `deviceId` in every payload
    pub id: String,
    /// Human-readable site name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: "flood-sensor-001".into(),
            name: "Flood Monitoring Station".into(),
            latitude: -6.302536,
            longitude: 107.300224,
        }
    }
}

impl DeviceConfig {
    /// Location in wire form
    pub fn location(&self) -> Location {
        Location {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

/// Broker connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MqttSection {
    /// Broker hostname
    pub host: String,
    /// Broker port
    pub port: u16,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
    /// Optional username
    pub username: Option<String>,
    /// Optional password
    pub password: Option<String>,
    /// Delay between reconnect attempts in milliseconds
    pub reconnect_delay_ms: u64,
    /// Consecutive failed reconnects before giving up; 0 retries forever
    pub max_reconnect_attempts: u32,
}

impl Default for MqttSection {
    fn default() -> Self {
        Self {
            host: "broker.hivemq.com".into(),
            port: 1883,
            keep_alive_secs: MQTT_KEEPALIVE_SECS,
            username: None,
            password: None,
            reconnect_delay_ms: MQTT_RETRY_DELAY_MS,
            max_reconnect_attempts: MAX_MQTT_RECONNECT_ATTEMPTS,
        }
    }
}

/// MQTT topic layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopicsConfig {
    /// Sensor data topic
    pub sensor: String,
    /// Weather data topic
    pub weather: String,
    /// Prediction topic
    pub prediction: String,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            sensor: "flood-mitigation/sensors/data".into(),
            weather: "flood-mitigation/weather/data".into(),
            prediction: "flood-mitigation/prediction/data".into(),
        }
    }
}

/// Sensor geometry, calibration, and sampling
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorsConfig {
    /// Ultrasonic mount height above the channel bed (cm)
    pub sensor_height_cm: f32,
    /// Flow meter calibration (YF-S201 = 450, YF-B1 = 660, YF-S402 = 5880)
    pub pulses_per_liter: f32,
    /// Sampling interval in milliseconds
    pub read_interval_ms: u64,
    /// Substitute water level when the ranger fails validation (cm)
    pub fallback_water_level_cm: f32,
    /// Substitute flow rate when the meter fails validation (L/min)
    pub fallback_flow_rate_lpm: f32,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            sensor_height_cm: DEFAULT_SENSOR_HEIGHT_CM,
            pulses_per_liter: YF_S201_PULSES_PER_LITER,
            read_interval_ms: SENSOR_READ_INTERVAL_MS,
            fallback_water_level_cm: DEFAULT_WATER_LEVEL_CM,
            fallback_flow_rate_lpm: DEFAULT_FLOW_RATE_LPM,
        }
    }
}

/// Risk boundaries for one quantity, mirrors [`ThresholdFamily`]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilySection {
    /// Upper bound of unremarkable readings
    pub normal: f32,
    /// MEDIUM boundary
    pub medium: f32,
    /// HIGH boundary
    pub high: f32,
    /// CRITICAL boundary
    pub critical: f32,
}

impl From<FamilySection> for ThresholdFamily {
    fn from(s: FamilySection) -> Self {
        ThresholdFamily {
            normal: s.normal,
            medium: s.medium,
            high: s.high,
            critical: s.critical,
        }
    }
}

/// Classification boundaries for both sensors
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdsConfig {
    /// Water-level boundaries (cm)
    pub water: Option<FamilySection>,
    /// Flow-rate boundaries (L/min)
    pub flow: Option<FamilySection>,
}

impl ThresholdsConfig {
    /// Resolve to core thresholds, using defaults for missing families
    pub fn resolve(&self) -> RiskThresholds {
        let defaults = RiskThresholds::default();
        RiskThresholds {
            water: self.water.clone().map(Into::into).unwrap_or(defaults.water),
            flow: self.flow.clone().map(Into::into).unwrap_or(defaults.flow),
        }
    }
}

/// Weather block settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// How often the weather payload is published (ms)
    pub update_interval_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: WEATHER_UPDATE_INTERVAL_MS,
        }
    }
}

/// Prediction timing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictionConfig {
    /// How often the prediction payload is published (ms)
    pub interval_ms: u64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            interval_ms: PREDICTION_INTERVAL_MS,
        }
    }
}

/// Telegram alerting settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelegramSection {
    /// Master switch for alerts
    pub enabled: bool,
    /// Bot token (prefer the environment variable)
    pub bot_token: String,
    /// Chat id (prefer the environment variable)
    pub chat_id: String,
    /// Minimum minutes between alerts at the same level; 0 disables
    pub cooldown_min: u32,
    /// Alert only on CRITICAL instead of HIGH and above
    pub critical_only: bool,
}

impl Default for TelegramSection {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: String::new(),
            chat_id: String::new(),
            cooldown_min: DEFAULT_ALERT_COOLDOWN_MIN,
            critical_only: false,
        }
    }
}

impl StationConfig {
    /// Load configuration from a TOML file and apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut config: StationConfig = toml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    pub fn from_defaults() -> Result<Self> {
        let mut config = StationConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(ENV_TELEGRAM_TOKEN) {
            self.telegram.bot_token = token;
        }
        if let Ok(chat_id) = std::env::var(ENV_TELEGRAM_CHAT_ID) {
            self.telegram.chat_id = chat_id;
        }
    }

    /// Check cross-field invariants the TOML schema cannot express
    pub fn validate(&self) -> Result<()> {
        self.thresholds
            .resolve()
            .validate()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("invalid risk thresholds")?;

        let height = self.sensors.sensor_height_cm;
        if !(MIN_DISTANCE_CM..=MAX_DISTANCE_CM).contains(&height) {
            bail!(
                "sensor_height_cm {} outside the HC-SR04 range [{}, {}]",
                height,
                MIN_DISTANCE_CM,
                MAX_DISTANCE_CM
            );
        }
        if self.sensors.pulses_per_liter <= 0.0 {
            bail!("pulses_per_liter must be positive");
        }
        if self.sensors.read_interval_ms == 0 {
            bail!("read_interval_ms must be nonzero");
        }
        if self.weather.update_interval_ms == 0 {
            bail!("weather update_interval_ms must be nonzero");
        }
        if self.prediction.interval_ms == 0 {
            bail!("prediction interval_ms must be nonzero");
        }
        if self.prediction.interval_ms < self.sensors.read_interval_ms {
            bail!("prediction interval shorter than the sensor read interval");
        }
        if self.telegram.enabled && (self.telegram.bot_token.is_empty() || self.telegram.chat_id.is_empty()) {
            bail!(
                "telegram alerts enabled but bot_token/chat_id missing (set them in the config or via {} / {})",
                ENV_TELEGRAM_TOKEN,
                ENV_TELEGRAM_CHAT_ID
            );
        }
        Ok(())
    }

    /// Connector configuration for the broker
    pub fn mqtt_config(&self) -> MqttConfig {
        let mut config = MqttConfig::new(&self.mqtt.host, self.mqtt.port)
            .client_id(&self.device.id)
            .keep_alive_secs(self.mqtt.keep_alive_secs)
            .reconnect_delay(Duration::from_millis(self.mqtt.reconnect_delay_ms))
            .max_reconnect_attempts(self.mqtt.max_reconnect_attempts);
        if let (Some(user), Some(pass)) = (&self.mqtt.username, &self.mqtt.password) {
            config = config.credentials(user, pass);
        }
        config
    }

    /// Telegram client configuration, if alerting is enabled
    pub fn telegram_config(&self) -> Option<TelegramConfig> {
        if !self.telegram.enabled {
            return None;
        }
        Some(TelegramConfig::new(
            &self.telegram.bot_token,
            &self.telegram.chat_id,
        ))
    }

    /// Alert gating policy
    pub fn alert_policy(&self) -> AlertPolicy {
        AlertPolicy {
            cooldown_min: self.telegram.cooldown_min,
            critical_only: self.telegram.critical_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodwatch_core::RiskLevel;

    #[test]
    fn empty_config_uses_reference_defaults() {
        let config: StationConfig = toml::from_str("").unwrap();
        assert_eq!(config.device.id, "flood-sensor-001");
        assert_eq!(config.mqtt.host, "broker.hivemq.com");
        assert_eq!(config.topics.sensor, "flood-mitigation/sensors/data");
        assert_eq!(config.sensors.sensor_height_cm, 100.0);
        assert_eq!(config.telegram.cooldown_min, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_thresholds_fall_back_to_defaults() {
        let config: StationConfig = toml::from_str(
            r#"
            [thresholds.water]
            normal = 10.0
            medium = 25.0
            high = 50.0
            critical = 90.0
            "#,
        )
        .unwrap();

        let resolved = config.thresholds.resolve();
        assert_eq!(resolved.water.critical, 90.0);
        // Flow family untouched
        assert_eq!(resolved.flow.critical, 40.0);
        assert_eq!(resolved.classify(60.0, 5.0), RiskLevel::High);
    }

    #[test]
    fn bad_thresholds_rejected() {
        let config: StationConfig = toml::from_str(
            r#"
            [thresholds.flow]
            normal = 10.0
            medium = 9.0
            high = 30.0
            critical = 40.0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn telegram_enabled_requires_credentials() {
        let config: StationConfig = toml::from_str(
            r#"
            [telegram]
            enabled = true
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<StationConfig, _> = toml::from_str(
            r#"
            [sensors]
            sensor_hieght_cm = 100.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_publish_intervals_rejected() {
        let config: StationConfig = toml::from_str(
            r#"
            [weather]
            update_interval_ms = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config: StationConfig = toml::from_str(
            r#"
            [prediction]
            interval_ms = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn sensor_height_must_be_measurable() {
        let config: StationConfig = toml::from_str(
            r#"
            [sensors]
            sensor_height_cm = 500.0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
