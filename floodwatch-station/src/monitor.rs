//! The monitoring loop
//!
//! [`Monitor::tick`] is the station's heartbeat. Every tick it converts
//! raw readings to engineering units, validates them, smooths the water
//! level, classifies risk, and publishes the sensor payload. Weather and
//! prediction payloads go out on their own slower intervals, and alerts
//! pass through the cooldown gate before reaching Telegram.
//!
//! A validation failure does not stop the loop: the reading is replaced
//! with the configured fallback and logged, matching what the firmware
//! does when a sensor times out. The dashboard keeps receiving data, just
//! flagged by the fact that it is suspiciously flat.

use anyhow::{Context, Result};
use log::{debug, info, warn};

use floodwatch_connectors::alerts::{format_alert, AlertGate};
use floodwatch_connectors::telegram::TelegramClient;
use floodwatch_connectors::Connector;
use floodwatch_core::constants::hardware::WATER_LEVEL_MAX_RATE_CM_PER_S;
use floodwatch_core::constants::time::SMOOTHING_SAMPLES;
use floodwatch_core::convert::{
    distance_is_measurable, distance_to_level_cm, echo_to_distance_cm, pulses_to_flow_lpm,
};
use floodwatch_core::prediction::predict;
use floodwatch_core::telemetry::{
    round1, round2, Location, PredictionReport, SensorReport, WeatherCondition, WeatherReport,
};
use floodwatch_core::time::Timestamp;
use floodwatch_core::traits::ValidationContext;
use floodwatch_core::window::{SampleWindow, TimestampedReading};
use floodwatch_core::{
    FlowRateValidator, RainfallValidator, RiskLevel, RiskThresholds, Validator,
    WaterLevelValidator,
};

use crate::config::StationConfig;
use crate::sim::RawSample;

/// Where alert messages go; lets tests capture them
pub trait AlertSender {
    /// Deliver one alert message
    fn send_alert(&mut self, message: &str) -> Result<(), String>;
}

impl AlertSender for TelegramClient {
    fn send_alert(&mut self, message: &str) -> Result<(), String> {
        self.send_message(message).map_err(|e| e.to_string())
    }
}

/// What one tick did, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Risk level after this tick
    pub risk_level: RiskLevel,
    /// Smoothed water level (cm)
    pub water_level_cm: f32,
    /// Flow rate (L/min)
    pub flow_rate_lpm: f32,
    /// Whether the water reading failed validation and was substituted
    pub water_fallback: bool,
    /// Whether the flow reading failed validation and was substituted
    pub flow_fallback: bool,
    /// Whether an alert was sent this tick
    pub alerted: bool,
}

/// Station monitoring state machine
pub struct Monitor<C: Connector> {
    device_id: String,
    location: Location,
    topics: Topics,

    sensor_height_cm: f32,
    pulses_per_liter: f32,
    read_interval_ms: u64,
    fallback_water_cm: f32,
    fallback_flow_lpm: f32,

    thresholds: RiskThresholds,
    water_validator: WaterLevelValidator,
    flow_validator: FlowRateValidator,
    rain_validator: RainfallValidator,
    water_ctx: ValidationContext,
    flow_ctx: ValidationContext,
    smoothing: SampleWindow<SMOOTHING_SAMPLES>,

    weather_interval_ms: u64,
    prediction_interval_ms: u64,
    last_weather_at: Option<Timestamp>,
    last_prediction_at: Option<Timestamp>,

    gate: AlertGate,
    alert_sender: Option<Box<dyn AlertSender>>,

    connector: C,
}

struct Topics {
    sensor: String,
    weather: String,
    prediction: String,
}

impl<C: Connector> Monitor<C>
where
    C::Error: std::fmt::Display,
{
    /// Build a monitor from configuration and an already-connected sink
    pub fn new(
        config: &StationConfig,
        connector: C,
        alert_sender: Option<Box<dyn AlertSender>>,
    ) -> Self {
        Self {
            device_id: config.device.id.clone(),
            location: config.device.location(),
            topics: Topics {
                sensor: config.topics.sensor.clone(),
                weather: config.topics.weather.clone(),
                prediction: config.topics.prediction.clone(),
            },
            sensor_height_cm: config.sensors.sensor_height_cm,
            pulses_per_liter: config.sensors.pulses_per_liter,
            read_interval_ms: config.sensors.read_interval_ms,
            fallback_water_cm: config.sensors.fallback_water_level_cm,
            fallback_flow_lpm: config.sensors.fallback_flow_rate_lpm,
            thresholds: config.thresholds.resolve(),
            water_validator: WaterLevelValidator::new(
                config.sensors.sensor_height_cm,
                WATER_LEVEL_MAX_RATE_CM_PER_S,
            ),
            flow_validator: FlowRateValidator::default(),
            rain_validator: RainfallValidator::default(),
            water_ctx: ValidationContext::default(),
            flow_ctx: ValidationContext::default(),
            smoothing: SampleWindow::new(),
            weather_interval_ms: config.weather.update_interval_ms,
            prediction_interval_ms: config.prediction.interval_ms,
            last_weather_at: None,
            last_prediction_at: None,
            gate: AlertGate::new(config.alert_policy()),
            alert_sender,
            connector,
        }
    }

    /// Process one raw sample taken at `now` (ms) / `wall_time` (RFC 3339)
    pub fn tick(&mut self, raw: &RawSample, now: Timestamp, wall_time: &str) -> Result<TickOutcome> {
        let (water_level, water_fallback) = self.water_reading(raw, now);
        let (flow_rate, flow_fallback) = self.flow_reading(raw, now);
        let rainfall = self.rain_reading(raw);

        self.smoothing.push(TimestampedReading {
            value: water_level,
            timestamp: now,
        });
        let smoothed = self.smoothing.mean().unwrap_or(water_level);

        let risk_level = self.thresholds.classify(smoothed, flow_rate);
        debug!(
            "tick: water {:.1} cm (smoothed {:.1}), flow {:.1} L/min, risk {}",
            water_level, smoothed, flow_rate, risk_level
        );

        self.publish_sensor(smoothed, flow_rate, rainfall, raw, risk_level, wall_time)?;

        if self.due(self.last_weather_at, self.weather_interval_ms, now) {
            self.publish_weather(raw, rainfall, wall_time)?;
            self.last_weather_at = Some(now);
        }

        let mut alerted = false;
        if self.due(self.last_prediction_at, self.prediction_interval_ms, now) {
            let prediction = predict(risk_level, smoothed, flow_rate, rainfall);
            self.publish_prediction(&prediction, smoothed, flow_rate, rainfall, wall_time)?;
            self.last_prediction_at = Some(now);

            alerted = self.maybe_alert(risk_level, smoothed, flow_rate, rainfall, now, wall_time);
        }

        Ok(TickOutcome {
            risk_level,
            water_level_cm: smoothed,
            flow_rate_lpm: flow_rate,
            water_fallback,
            flow_fallback,
            alerted,
        })
    }

    /// Whether the broker connection is currently up
    pub fn connected(&self) -> bool {
        self.connector.is_connected()
    }

    fn water_reading(&mut self, raw: &RawSample, now: Timestamp) -> (f32, bool) {
        let distance = echo_to_distance_cm(raw.echo_us);
        if !distance_is_measurable(distance) {
            // A sub-minimum echo inverts into a nearly full channel; treat
            // the reading as a fault before it reaches the level validator
            warn!("echo distance {distance:.1} cm outside the sensor window, using fallback");
            return (self.fallback_water_cm, true);
        }
        let level = distance_to_level_cm(distance, self.sensor_height_cm);

        self.water_ctx.timestamp = now;
        match self.water_validator.validate(level, &self.water_ctx) {
            Ok(()) => {
                self.water_ctx.add_reading(level, now);
                (level, false)
            }
            Err(e) => {
                warn!("water reading {level:.1} cm rejected ({e}), using fallback");
                (self.fallback_water_cm, true)
            }
        }
    }

    fn flow_reading(&mut self, raw: &RawSample, now: Timestamp) -> (f32, bool) {
        let flow = pulses_to_flow_lpm(raw.flow_pulses, self.read_interval_ms, self.pulses_per_liter);

        self.flow_ctx.timestamp = now;
        match self.flow_validator.validate(flow, &self.flow_ctx) {
            Ok(()) => {
                self.flow_ctx.add_reading(flow, now);
                (flow, false)
            }
            Err(e) => {
                warn!("flow reading {flow:.1} L/min rejected ({e}), using fallback");
                (self.fallback_flow_lpm, true)
            }
        }
    }

    fn rain_reading(&mut self, raw: &RawSample) -> f32 {
        // Rain only feeds the score; a bad gauge reading degrades to "dry"
        let ctx = ValidationContext::default();
        match self.rain_validator.validate(raw.rainfall, &ctx) {
            Ok(()) => raw.rainfall,
            Err(e) => {
                warn!("rainfall {:.1} mm/h rejected ({e}), treating as 0", raw.rainfall);
                0.0
            }
        }
    }

    fn due(&self, last: Option<Timestamp>, interval_ms: u64, now: Timestamp) -> bool {
        match last {
            None => true,
            Some(at) => now.saturating_sub(at) >= interval_ms,
        }
    }

    fn publish_sensor(
        &mut self,
        water_level: f32,
        flow_rate: f32,
        rainfall: f32,
        raw: &RawSample,
        risk_level: RiskLevel,
        wall_time: &str,
    ) -> Result<()> {
        let report = SensorReport {
            device_id: self.device_id.clone(),
            timestamp: wall_time.to_owned(),
            water_level: round2(water_level),
            flow_rate: round2(flow_rate),
            temperature: round1(raw.temperature),
            humidity: round1(raw.humidity),
            rainfall: round1(rainfall),
            risk_level,
            location: self.location,
        };
        self.publish(&self.topics.sensor.clone(), &report)
    }

    fn publish_weather(&mut self, raw: &RawSample, rainfall: f32, wall_time: &str) -> Result<()> {
        let report = WeatherReport {
            device_id: self.device_id.clone(),
            timestamp: wall_time.to_owned(),
            temperature: round1(raw.temperature),
            humidity: round1(raw.humidity),
            rainfall: round1(rainfall),
            weather_condition: WeatherCondition::from_rainfall(rainfall),
        };
        self.publish(&self.topics.weather.clone(), &report)
    }

    fn publish_prediction(
        &mut self,
        prediction: &floodwatch_core::FloodPrediction,
        water_level: f32,
        flow_rate: f32,
        rainfall: f32,
        wall_time: &str,
    ) -> Result<()> {
        let report = PredictionReport::from_prediction(
            self.device_id.clone(),
            wall_time,
            prediction,
            water_level,
            flow_rate,
            rainfall,
        );
        self.publish(&self.topics.prediction.clone(), &report)
    }

    fn publish<T: serde::Serialize>(&mut self, topic: &str, payload: &T) -> Result<()> {
        let json = serde_json::to_vec(payload).context("serializing payload")?;
        self.connector
            .send(topic, &json)
            .map_err(|e| anyhow::anyhow!("publish to {topic} failed: {e}"))
    }

    fn maybe_alert(
        &mut self,
        risk_level: RiskLevel,
        water_level: f32,
        flow_rate: f32,
        rainfall: f32,
        now: Timestamp,
        wall_time: &str,
    ) -> bool {
        let Some(sender) = self.alert_sender.as_mut() else {
            return false;
        };
        if !self.gate.should_alert(risk_level, now) {
            return false;
        }

        let prediction = predict(risk_level, water_level, flow_rate, rainfall);
        let message = format_alert(
            &self.device_id,
            wall_time,
            &prediction,
            water_level,
            flow_rate,
            rainfall,
        );

        match sender.send_alert(&message) {
            Ok(()) => {
                info!("alert sent at {risk_level}");
                self.gate.record(risk_level, now);
                true
            }
            Err(e) => {
                // Do not record: a failed send should be retried next round
                warn!("alert delivery failed: {e}");
                false
            }
        }
    }
}
