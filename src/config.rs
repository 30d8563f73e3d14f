//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::frame::protocol::Schema;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Device paths to try, in order
    #[serde(default = "default_device_paths")]
    pub device_paths: Vec<String>,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// CSV log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    /// Message schema: "basic" (battery + solar) or "extended"
    /// (battery, solar, ultrasonic range, RSSI)
    #[serde(default = "default_schema")]
    pub schema: String,
}

/// History buffer configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

// Default value functions
fn default_device_paths() -> Vec<String> {
    vec!["/dev/ttyUSB0".to_string(), "/dev/ttyACM0".to_string()]
}
fn default_baud_rate() -> u32 { 115_200 }

fn default_log_enabled() -> bool { true }
fn default_log_path() -> String { "data.csv".to_string() }
fn default_schema() -> String { "extended".to_string() }

fn default_capacity() -> usize { 10_000 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device_paths: default_device_paths(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
            path: default_log_path(),
            schema: default_schema(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            log: LogConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use solar_telemetry::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// The active message schema
    ///
    /// Only valid after [`Config::validate`]; unknown schema names fall
    /// back to extended.
    pub fn schema(&self) -> Schema {
        match self.log.schema.as_str() {
            "basic" => Schema::Basic,
            _ => Schema::Extended,
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.serial.device_paths.is_empty() {
            return Err(crate::error::TelemetryError::Config(
                toml::de::Error::custom("serial device_paths cannot be empty")
            ));
        }

        for path in &self.serial.device_paths {
            if path.is_empty() {
                return Err(crate::error::TelemetryError::Config(
                    toml::de::Error::custom("serial device path cannot be empty")
                ));
            }
        }

        if ![9600, 19200, 38400, 57600, 115_200, 230_400].contains(&self.serial.baud_rate) {
            return Err(crate::error::TelemetryError::Config(
                toml::de::Error::custom(
                    "baud_rate must be one of: 9600, 19200, 38400, 57600, 115200, 230400"
                )
            ));
        }

        if self.log.enabled && self.log.path.is_empty() {
            return Err(crate::error::TelemetryError::Config(
                toml::de::Error::custom("log path cannot be empty when enabled")
            ));
        }

        if self.log.schema != "basic" && self.log.schema != "extended" {
            return Err(crate::error::TelemetryError::Config(
                toml::de::Error::custom("log schema must be 'basic' or 'extended'")
            ));
        }

        if self.history.capacity == 0 || self.history.capacity > 1_000_000 {
            return Err(crate::error::TelemetryError::Config(
                toml::de::Error::custom("history capacity must be between 1 and 1000000")
            ));
        }

        Ok(())
    }
}
