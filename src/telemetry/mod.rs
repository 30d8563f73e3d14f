//! # Telemetry Persistence Module
//!
//! Durable append-only CSV log of accepted samples.
//!
//! This module handles:
//! - Formatting samples as CSV rows (basic or extended schema)
//! - Appending rows to the log file
//! - Loading an existing log back into memory at startup

pub mod log;

pub use log::CsvLog;
