//! Simulated sensor hardware
//!
//! Stands in for the HC-SR04 ranger, YF-S201 flow meter, and weather block
//! when no hardware is attached. The simulator produces *raw* quantities
//! (echo microseconds, flow pulses) so the full conversion and validation
//! path runs exactly as it would against real sensors.
//!
//! Two regimes:
//! - **Normal**: water level and flow drift randomly inside calm bands
//!   (5-25 cm, 3-15 L/min).
//! - **Flood**: each step ramps the water by 2.5 cm and the flow by
//!   1.5 L/min toward 80 cm / 35 L/min, with rain building up after the
//!   first few steps. This reproduces a flash-flood onset in a drainage
//!   channel over roughly two minutes of ticks.
//!
//! Weather follows a compressed daily cycle: each 5 s tick advances the
//! simulated day by 5 minutes, with temperature swinging ±4°C around 27°C
//! and humidity moving inversely to it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One tick of raw readings, as the hardware would deliver them
#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    /// HC-SR04 echo round-trip time (µs)
    pub echo_us: f32,
    /// YF-S201 pulses counted over the sampling window
    pub flow_pulses: u32,
    /// Air temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Rainfall intensity (mm/h)
    pub rainfall: f32,
}

/// Simulated station hardware
pub struct SensorSimulator {
    rng: StdRng,
    sensor_height_cm: f32,
    pulses_per_liter: f32,
    window_ms: u64,

    water_level: f32,
    flow_rate: f32,
    temperature: f32,
    humidity: f32,
    rainfall: f32,

    flood: bool,
    step: u32,
    weather_cycle: u32,
}

impl SensorSimulator {
    /// Create a simulator for the given sensor geometry and sampling window
    pub fn new(sensor_height_cm: f32, pulses_per_liter: f32, window_ms: u64) -> Self {
        Self::with_rng(
            sensor_height_cm,
            pulses_per_liter,
            window_ms,
            StdRng::from_entropy(),
        )
    }

    /// Create a deterministic simulator from a seed
    pub fn seeded(sensor_height_cm: f32, pulses_per_liter: f32, window_ms: u64, seed: u64) -> Self {
        Self::with_rng(
            sensor_height_cm,
            pulses_per_liter,
            window_ms,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(sensor_height_cm: f32, pulses_per_liter: f32, window_ms: u64, rng: StdRng) -> Self {
        Self {
            rng,
            sensor_height_cm,
            pulses_per_liter,
            window_ms,
            water_level: 15.0,
            flow_rate: 8.0,
            temperature: 27.0,
            humidity: 65.0,
            rainfall: 0.0,
            flood: false,
            step: 0,
            weather_cycle: 0,
        }
    }

    /// Begin the flood scenario
    pub fn start_flood(&mut self) {
        self.flood = true;
        self.step = 0;
    }

    /// Return to calm conditions
    pub fn reset(&mut self) {
        self.flood = false;
        self.step = 0;
        self.water_level = 15.0;
        self.flow_rate = 8.0;
        self.rainfall = 0.0;
    }

    /// Whether the flood scenario is active
    pub fn flooding(&self) -> bool {
        self.flood
    }

    /// Advance one tick and produce raw readings
    pub fn tick(&mut self) -> RawSample {
        self.update_water();
        self.update_weather();

        // Back out the hardware quantities the firmware would measure
        let distance = (self.sensor_height_cm - self.water_level).max(0.0);
        let echo_us = distance * 58.0;
        let liters_per_ms = self.flow_rate / 60_000.0;
        let flow_pulses = (liters_per_ms * self.window_ms as f32 * self.pulses_per_liter) as u32;

        RawSample {
            echo_us,
            flow_pulses,
            temperature: self.temperature,
            humidity: self.humidity,
            rainfall: self.rainfall,
        }
    }

    fn update_water(&mut self) {
        if self.flood {
            self.step += 1;
            self.water_level = (15.0 + self.step as f32 * 2.5).min(80.0);
            self.flow_rate = (8.0 + self.step as f32 * 1.5).min(35.0);
            self.water_level += self.jitter(2.0);
            self.flow_rate += self.jitter(1.0);
        } else {
            self.water_level += self.jitter(1.0);
            self.flow_rate += self.jitter(0.5);
            self.water_level = self.water_level.clamp(5.0, 25.0);
            self.flow_rate = self.flow_rate.clamp(3.0, 15.0);
        }
    }

    fn update_weather(&mut self) {
        self.weather_cycle += 1;

        // Each tick advances the simulated day by five minutes
        let time_of_day = (self.weather_cycle * 5) % 1440;
        let daily = ((time_of_day as f32 / 1440.0) * core::f32::consts::TAU).sin() * 4.0;
        self.temperature = (27.0 + daily + self.jitter(2.0)).clamp(22.0, 35.0);

        self.humidity = (85.0 - (self.temperature - 27.0) * 2.0 + self.jitter(10.0)).clamp(40.0, 95.0);

        let rain_chance: f32 = self.rng.gen_range(0.0..100.0);
        if self.humidity > 80.0 && rain_chance < 25.0 {
            self.rainfall = self.rng.gen_range(0.0..15.0);
        } else if rain_chance < 10.0 {
            self.rainfall = self.rng.gen_range(0.0..5.0);
        } else {
            self.rainfall = (self.rainfall - 0.5).max(0.0);
        }

        if self.flood && self.step > 5 {
            self.rainfall = (self.rainfall + self.step as f32 * 0.8).min(25.0);
        }
    }

    /// Symmetric noise in (-half, half)
    fn jitter(&mut self, half: f32) -> f32 {
        (self.rng.gen_range(0.0f32..1.0) - 0.5) * half * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> SensorSimulator {
        SensorSimulator::seeded(100.0, 450.0, 5000, 42)
    }

    #[test]
    fn normal_regime_stays_in_calm_bands() {
        let mut sim = sim();
        for _ in 0..200 {
            let sample = sim.tick();

            // Invert echo back to a level for the assertion
            let level = 100.0 - sample.echo_us / 58.0;
            assert!((5.0..=25.0).contains(&level), "level {level} left the calm band");
            assert!(sample.rainfall >= 0.0);
            assert!((22.0..=35.0).contains(&sample.temperature));
            assert!((40.0..=95.0).contains(&sample.humidity));
        }
    }

    #[test]
    fn flood_regime_ramps_water_up() {
        let mut sim = sim();
        sim.start_flood();

        let mut last_level = 0.0;
        for _ in 0..30 {
            let sample = sim.tick();
            last_level = 100.0 - sample.echo_us / 58.0;
        }

        // 30 steps at 2.5 cm/step caps out near 80 cm
        assert!(last_level > 70.0, "flood only reached {last_level} cm");
    }

    #[test]
    fn reset_returns_to_calm() {
        let mut sim = sim();
        sim.start_flood();
        for _ in 0..20 {
            sim.tick();
        }

        sim.reset();
        let sample = sim.tick();
        let level = 100.0 - sample.echo_us / 58.0;
        assert!(level < 26.0);
        assert!(!sim.flooding());
    }

    #[test]
    fn pulses_match_flow_rate() {
        let mut sim = sim();
        let sample = sim.tick();

        // flow L/min over a 5 s window at 450 pulses/L
        let implied_lpm = sample.flow_pulses as f32 / 450.0 / 5.0 * 60.0;
        assert!((3.0..=15.5).contains(&implied_lpm), "implied flow {implied_lpm}");
    }
}
