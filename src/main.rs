//! # Solar Telemetry
//!
//! Capture and log live telemetry from a solar-powered sensor node.
//!
//! This application reads newline-terminated telemetry lines from the
//! receiver's serial port, decodes them, keeps a bounded in-memory history
//! and appends each accepted sample to a CSV log.

use anyhow::Result;
use tracing::{debug, info, warn};
use tracing_subscriber;

use solar_telemetry::config::Config;
use solar_telemetry::ingest::Ingestor;
use solar_telemetry::serial::SensorSerial;

/// Default configuration file location
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Number of accepted samples between status log messages
const LOG_INTERVAL_SAMPLES: u64 = 100;

/// Main entry point for the Solar Telemetry application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (first CLI argument, or `config/default.toml`)
///    - Open the receiver's serial port
///    - Seed the history buffer from the existing CSV log
///
/// 2. **Main Loop**
///    - Read and ingest exactly one line per iteration
///    - Log each accepted sample at debug, a status line every 100 samples
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Log total accepted and rejected counts
///    - Clean exit
///
/// # Errors
///
/// Returns error if:
/// - Configuration is invalid
/// - Serial port cannot be opened (no receiver found)
/// - The CSV log cannot be created or read
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Solar Telemetry v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)?;
    let schema = config.schema();
    info!("Using {:?} schema, history capacity {}", schema, config.history.capacity);

    let mut ingestor = if config.log.enabled {
        info!("Logging samples to {}", config.log.path);
        Ingestor::with_log(schema, config.history.capacity, &config.log.path)?
    } else {
        Ingestor::new(schema, config.history.capacity)
    };

    // Open the receiver's serial port
    let device_paths: Vec<&str> = config.serial.device_paths.iter().map(String::as_str).collect();
    let serial = SensorSerial::open_with_paths(&device_paths, config.serial.baud_rate)?;
    info!("Receiver serial port opened at: {}", serial.device_path());
    let mut lines = serial.into_line_reader();

    info!("Starting telemetry capture loop");
    info!("Press Ctrl+C to exit");

    let mut last_log_count: u64 = 0;

    // Main capture loop: one line per iteration
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        warn!("Serial stream ended");
                        break;
                    }
                    Err(e) => {
                        warn!("Serial read failed: {}", e);
                        continue;
                    }
                };

                if let Some(sample) = ingestor.ingest_line(&line) {
                    debug!(
                        "Battery={}V Solar={}V Ultrasonic={:?} RSSI={:?}",
                        sample.battery_voltage,
                        sample.solar_voltage,
                        sample.ultrasonic_range,
                        sample.rssi
                    );

                    let accepted = ingestor.accepted();
                    if accepted - last_log_count >= LOG_INTERVAL_SAMPLES {
                        info!(
                            "Accepted {} samples ({} rejected, history {}/{})",
                            accepted,
                            ingestor.rejected(),
                            ingestor.history().len(),
                            ingestor.history().capacity()
                        );
                        last_log_count = accepted;
                    }
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!(
        "Total samples accepted: {} ({} lines rejected)",
        ingestor.accepted(),
        ingestor.rejected()
    );

    Ok(())
}
