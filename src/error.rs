//! # Error Types
//!
//! Custom error types for Solar Telemetry using `thiserror`.

use thiserror::Error;

/// Main error type for Solar Telemetry
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// No usable serial device found
    #[error("No serial port found, tried: {0}")]
    SerialPortNotFound(String),

    /// CSV log format errors (bad row encountered while loading)
    #[error("Log format error: {0}")]
    LogFormat(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Solar Telemetry
pub type Result<T> = std::result::Result<T, TelemetryError>;
