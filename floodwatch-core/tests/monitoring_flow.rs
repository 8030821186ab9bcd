//! Integration tests for the monitoring data path
//!
//! Exercises the full flow a station runs every tick: raw sensor
//! quantities through unit conversion, smoothing, validation, risk
//! classification, prediction, and finally the wire payload.

use floodwatch_core::{
    constants::hardware::{DEFAULT_SENSOR_HEIGHT_CM, YF_S201_PULSES_PER_LITER},
    convert::{distance_to_level_cm, echo_to_distance_cm, pulses_to_flow_lpm},
    prediction::predict,
    telemetry::{PredictionReport, WeatherCondition},
    time::{FixedClock, TimeSource},
    traits::ValidationContext,
    window::{SampleWindow, TimestampedReading},
    FlowRateValidator, RiskLevel, RiskThresholds, ValidationError, Validator,
    WaterLevelValidator,
};

/// One simulated tick's worth of raw hardware readings.
struct RawTick {
    echo_us: f32,
    flow_pulses: u32,
}

fn process_tick(
    raw: &RawTick,
    window: &mut SampleWindow<5>,
    water_ctx: &mut ValidationContext,
    flow_ctx: &mut ValidationContext,
    clock: &FixedClock,
) -> Result<(f32, f32), ValidationError> {
    let distance = echo_to_distance_cm(raw.echo_us);
    let level = distance_to_level_cm(distance, DEFAULT_SENSOR_HEIGHT_CM);
    let flow = pulses_to_flow_lpm(raw.flow_pulses, 1000, YF_S201_PULSES_PER_LITER);

    water_ctx.timestamp = clock.now();
    flow_ctx.timestamp = clock.now();
    WaterLevelValidator::default().validate(level, water_ctx)?;
    FlowRateValidator::default().validate(flow, flow_ctx)?;
    water_ctx.add_reading(level, clock.now());
    flow_ctx.add_reading(flow, clock.now());

    window.push(TimestampedReading { value: level, timestamp: clock.now() });
    let smoothed = window.mean().unwrap_or(level);
    Ok((smoothed, flow))
}

#[test]
fn calm_channel_stays_low_risk() {
    let mut clock = FixedClock::new(0);
    let mut window = SampleWindow::<5>::new();
    let mut water_ctx = ValidationContext::default();
    let mut flow_ctx = ValidationContext::default();
    let thresholds = RiskThresholds::default();

    // 90 cm echo distance under a 100 cm mount = 10 cm of water
    for _ in 0..5 {
        clock.advance(5_000);
        let (level, flow) = process_tick(
            &RawTick { echo_us: 90.0 * 58.0, flow_pulses: 38 },
            &mut window,
            &mut water_ctx,
            &mut flow_ctx,
            &clock,
        )
        .unwrap();

        assert!((level - 10.0).abs() < 0.1);
        assert_eq!(thresholds.classify(level, flow), RiskLevel::Low);
    }
}

#[test]
fn rising_water_escalates_and_predicts() {
    let mut clock = FixedClock::new(0);
    let mut window = SampleWindow::<5>::new();
    let mut water_ctx = ValidationContext::default();
    let mut flow_ctx = ValidationContext::default();
    let thresholds = RiskThresholds::default();

    // Water climbing 2 cm per 5 s tick, from 10 cm up past the HIGH line
    let mut worst = RiskLevel::Low;
    let mut last = (0.0, 0.0);
    for step in 0..16 {
        clock.advance(5_000);
        let level_cm = 10.0 + step as f32 * 2.0;
        let echo_us = (DEFAULT_SENSOR_HEIGHT_CM - level_cm) * 58.0;
        let (level, flow) = process_tick(
            &RawTick { echo_us, flow_pulses: 150 },
            &mut window,
            &mut water_ctx,
            &mut flow_ctx,
            &clock,
        )
        .unwrap();
        worst = worst.max(thresholds.classify(level, flow));
        last = (level, flow);
    }

    assert!(worst >= RiskLevel::High);

    let p = predict(worst, last.0, last.1, 12.0);
    assert!(p.risk_score > 30.0);
    assert!(p.time_to_flood_min.is_some());
    assert!(!p.recommendation.is_empty());
}

#[test]
fn implausible_jump_is_rejected_after_history_exists() {
    let mut clock = FixedClock::new(0);
    let mut window = SampleWindow::<5>::new();
    let mut water_ctx = ValidationContext::default();
    let mut flow_ctx = ValidationContext::default();

    clock.advance(5_000);
    process_tick(
        &RawTick { echo_us: 90.0 * 58.0, flow_pulses: 38 },
        &mut window,
        &mut water_ctx,
        &mut flow_ctx,
        &clock,
    )
    .unwrap();

    // 10 cm -> 70 cm in five seconds is not water, it's a floating branch
    clock.advance(5_000);
    let result = process_tick(
        &RawTick { echo_us: 30.0 * 58.0, flow_pulses: 38 },
        &mut window,
        &mut water_ctx,
        &mut flow_ctx,
        &clock,
    );
    assert!(matches!(result, Err(ValidationError::RateExceeded { .. })));
}

#[test]
fn prediction_report_carries_wire_names() {
    let thresholds = RiskThresholds::default();
    let level = thresholds.classify(34.0, 18.0);
    let p = predict(level, 34.0, 18.0, 9.0);

    let report = PredictionReport::from_prediction(
        "flood-sensor-001",
        "2024-01-15T07:30:00Z",
        &p,
        34.0,
        18.0,
        9.0,
    );
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["riskLevel"], "HIGH");
    assert_eq!(json["deviceId"], "flood-sensor-001");
    assert!(json["riskScore"].as_f64().unwrap() > 0.0);

    // 34/60 of the water scale, rounded to one decimal
    let water_factor = json["factors"]["waterLevel"].as_f64().unwrap();
    assert!((water_factor - 56.7).abs() < 0.01);
    assert_eq!(WeatherCondition::from_rainfall(9.0), WeatherCondition::Rainy);
}
