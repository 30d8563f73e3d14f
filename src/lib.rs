//! # Solar Telemetry Library
//!
//! Capture and log live telemetry from a solar-powered sensor node over serial.
//!
//! This library provides the core functionality for decoding tagged ASCII
//! telemetry lines (battery voltage, solar voltage, ultrasonic range, RSSI),
//! keeping a bounded in-memory history, and appending accepted samples to a
//! CSV log.

pub mod config;
pub mod error;
pub mod frame;
pub mod history;
pub mod ingest;
pub mod serial;
pub mod telemetry;
