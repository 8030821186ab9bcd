//! Floodwatch station binary
//!
//! Runs the monitoring loop against simulated sensors, publishing
//! telemetry to the configured MQTT broker and flood alerts to Telegram.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use log::{info, warn};

use floodwatch_connectors::mqtt::MqttConnector;
use floodwatch_connectors::telegram::TelegramClient;
use floodwatch_core::time::{SystemClock, TimeSource};

use floodwatch_station::config::StationConfig;
use floodwatch_station::monitor::{AlertSender, Monitor};
use floodwatch_station::sim::SensorSimulator;

#[derive(Debug, Parser)]
#[command(name = "floodwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flood monitoring station with MQTT telemetry and Telegram alerts")]
struct Cli {
    /// Path to the station config file (defaults apply if omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the monitoring loop
    Run {
        /// Start in the flood scenario instead of calm conditions
        #[arg(long)]
        flood: bool,

        /// Stop after this many ticks (runs forever if omitted)
        #[arg(long)]
        ticks: Option<u64>,

        /// Random seed for the sensor simulator
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate the config file and print the effective settings
    CheckConfig,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Run { flood, ticks, seed } => run(config, flood, ticks, seed),
        Command::CheckConfig => check_config(&config),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<StationConfig> {
    match path {
        Some(p) => StationConfig::load(p),
        None => StationConfig::from_defaults(),
    }
}

fn run(config: StationConfig, flood: bool, ticks: Option<u64>, seed: Option<u64>) -> Result<()> {
    info!(
        "starting station {} -> mqtt://{}:{}",
        config.device.id, config.mqtt.host, config.mqtt.port
    );

    let mqtt = MqttConnector::connect(config.mqtt_config()).context("connecting to broker")?;

    let alert_sender: Option<Box<dyn AlertSender>> = match config.telegram_config() {
        Some(tg) => {
            info!("telegram alerts enabled (cooldown {} min)", config.telegram.cooldown_min);
            Some(Box::new(TelegramClient::new(tg).context("building telegram client")?))
        }
        None => {
            info!("telegram alerts disabled");
            None
        }
    };

    let interval = Duration::from_millis(config.sensors.read_interval_ms);
    let mut simulator = match seed {
        Some(s) => SensorSimulator::seeded(
            config.sensors.sensor_height_cm,
            config.sensors.pulses_per_liter,
            config.sensors.read_interval_ms,
            s,
        ),
        None => SensorSimulator::new(
            config.sensors.sensor_height_cm,
            config.sensors.pulses_per_liter,
            config.sensors.read_interval_ms,
        ),
    };
    if flood {
        warn!("flood scenario active: readings will ramp toward critical");
        simulator.start_flood();
    }

    let mut monitor = Monitor::new(&config, mqtt, alert_sender);
    let clock = SystemClock;

    let mut tick_count: u64 = 0;
    loop {
        let raw = simulator.tick();
        let now = clock.now();
        let wall_time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        match monitor.tick(&raw, now, &wall_time) {
            Ok(outcome) => {
                info!(
                    "water {:.1} cm | flow {:.1} L/min | risk {}{}",
                    outcome.water_level_cm,
                    outcome.flow_rate_lpm,
                    outcome.risk_level,
                    if outcome.alerted { " | ALERT SENT" } else { "" },
                );
            }
            Err(e) => {
                if monitor.connected() {
                    warn!("tick failed: {e:#}");
                } else {
                    warn!("tick failed while broker is down: {e:#}");
                }
            }
        }

        tick_count += 1;
        if let Some(limit) = ticks {
            if tick_count >= limit {
                info!("stopping after {tick_count} ticks");
                return Ok(());
            }
        }

        thread::sleep(interval);
    }
}

fn check_config(config: &StationConfig) -> Result<()> {
    // Load already validated; print what the station would use
    println!("device:      {} ({})", config.device.id, config.device.name);
    println!(
        "location:    {:.6}, {:.6}",
        config.device.latitude, config.device.longitude
    );
    println!("broker:      {}:{}", config.mqtt.host, config.mqtt.port);
    println!("topics:      {}", config.topics.sensor);
    println!("             {}", config.topics.weather);
    println!("             {}", config.topics.prediction);
    println!(
        "sensors:     height {} cm, {} pulses/L, read every {} ms",
        config.sensors.sensor_height_cm,
        config.sensors.pulses_per_liter,
        config.sensors.read_interval_ms
    );

    let thresholds = config.thresholds.resolve();
    println!(
        "water (cm):  normal {} | medium {} | high {} | critical {}",
        thresholds.water.normal, thresholds.water.medium, thresholds.water.high,
        thresholds.water.critical
    );
    println!(
        "flow (L/m):  normal {} | medium {} | high {} | critical {}",
        thresholds.flow.normal, thresholds.flow.medium, thresholds.flow.high,
        thresholds.flow.critical
    );

    if config.telegram.enabled {
        println!(
            "telegram:    enabled, cooldown {} min{}",
            config.telegram.cooldown_min,
            if config.telegram.critical_only { ", critical only" } else { "" }
        );
    } else {
        println!("telegram:    disabled");
    }

    println!("\nconfig OK");
    Ok(())
}
