//! Wire types for the MQTT topics
//!
//! The dashboard consumes three JSON payloads: sensor data, weather data,
//! and the prediction. Field names are camelCase and risk levels are
//! upper-case strings - that contract predates this crate, so the serde
//! renames here are load-bearing. Timestamps travel as RFC 3339 strings.

use serde::{Deserialize, Serialize};

use crate::prediction::{FloodPrediction, RiskFactors};
use crate::risk::RiskLevel;

/// Station location included in sensor payloads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

/// Payload for the sensor topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReport {
    /// Station client id
    pub device_id: String,
    /// RFC 3339 wall-clock time of the sample
    pub timestamp: String,
    /// Smoothed water level (cm)
    pub water_level: f32,
    /// Flow rate (L/min)
    pub flow_rate: f32,
    /// Air temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Rainfall intensity (mm/h)
    pub rainfall: f32,
    /// Risk level at sample time
    pub risk_level: RiskLevel,
    /// Station location
    pub location: Location,
}

/// Sky condition derived from rainfall intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    /// No rain
    Clear,
    /// Light rain, up to 5 mm/h
    Drizzle,
    /// Sustained rain
    Rainy,
}

impl WeatherCondition {
    /// Derive the condition from rainfall intensity (mm/h)
    pub fn from_rainfall(mm_per_h: f32) -> Self {
        if mm_per_h > 5.0 {
            WeatherCondition::Rainy
        } else if mm_per_h > 0.0 {
            WeatherCondition::Drizzle
        } else {
            WeatherCondition::Clear
        }
    }
}

/// Payload for the weather topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// Station client id
    pub device_id: String,
    /// RFC 3339 wall-clock time
    pub timestamp: String,
    /// Air temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Rainfall intensity (mm/h)
    pub rainfall: f32,
    /// Derived sky condition
    pub weather_condition: WeatherCondition,
}

/// Payload for the prediction topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    /// Station client id
    pub device_id: String,
    /// RFC 3339 wall-clock time
    pub timestamp: String,
    /// Risk level the prediction was computed at
    pub risk_level: RiskLevel,
    /// Weighted risk score, 0-100
    pub risk_score: f32,
    /// Water level the score used (cm)
    pub water_level: f32,
    /// Flow rate the score used (L/min)
    pub flow_rate: f32,
    /// Rainfall the score used (mm/h)
    pub rainfall: f32,
    /// Estimated minutes to flooding; null when conditions are normal
    pub time_to_flood: Option<u32>,
    /// Operator guidance
    pub recommendation: String,
    /// Per-factor breakdown
    pub factors: RiskFactors,
}

impl PredictionReport {
    /// Build a report from a computed prediction
    pub fn from_prediction(
        device_id: impl Into<String>,
        timestamp: impl Into<String>,
        prediction: &FloodPrediction,
        water_level: f32,
        flow_rate: f32,
        rainfall: f32,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp: timestamp.into(),
            risk_level: prediction.risk_level,
            risk_score: round1(prediction.risk_score),
            water_level: round2(water_level),
            flow_rate: round2(flow_rate),
            rainfall: round1(rainfall),
            time_to_flood: prediction.time_to_flood_min,
            recommendation: prediction.recommendation.to_owned(),
            factors: RiskFactors {
                water_level: round1(prediction.factors.water_level),
                flow_rate: round1(prediction.factors.flow_rate),
                rainfall: round1(prediction.factors.rainfall),
            },
        }
    }
}

/// Round to one decimal place, as the dashboard displays values
pub fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places (levels and flow rates)
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::predict;

    #[test]
    fn sensor_report_uses_dashboard_field_names() {
        let report = SensorReport {
            device_id: "flood-sensor-001".into(),
            timestamp: "2024-01-15T07:30:00Z".into(),
            water_level: 18.25,
            flow_rate: 9.5,
            temperature: 27.0,
            humidity: 70.0,
            rainfall: 0.0,
            risk_level: RiskLevel::Low,
            location: Location { lat: -6.302536, lon: 107.300224 },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["deviceId"], "flood-sensor-001");
        assert_eq!(json["waterLevel"], 18.25);
        assert_eq!(json["riskLevel"], "LOW");
        assert_eq!(json["location"]["lat"], -6.302536);
    }

    #[test]
    fn weather_condition_cutoffs() {
        assert_eq!(WeatherCondition::from_rainfall(0.0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_rainfall(3.0), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_rainfall(12.0), WeatherCondition::Rainy);

        let json = serde_json::to_string(&WeatherCondition::Rainy).unwrap();
        assert_eq!(json, "\"rainy\"");
    }

    #[test]
    fn prediction_report_round_trips() {
        let p = predict(RiskLevel::High, 45.0, 22.0, 8.0);
        let report = PredictionReport::from_prediction(
            "flood-sensor-001",
            "2024-01-15T07:30:00Z",
            &p,
            45.0,
            22.0,
            8.0,
        );

        let json = serde_json::to_string(&report).unwrap();
        let back: PredictionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(back.time_to_flood, Some(45));
    }

    #[test]
    fn null_time_to_flood_for_low_risk() {
        let p = predict(RiskLevel::Low, 10.0, 5.0, 0.0);
        let report = PredictionReport::from_prediction("id", "t", &p, 10.0, 5.0, 0.0);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["timeToFlood"].is_null());
    }
}
