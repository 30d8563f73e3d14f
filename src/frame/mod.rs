//! # Telemetry Line Protocol Module
//!
//! Implementation of the tagged-field ASCII line protocol used by the
//! solar sensor node.
//!
//! This module handles:
//! - Structural pre-filtering of raw lines (length bounds, frame marker)
//! - Tagged key/value field decoding with unit conversion
//! - Sample materialization against the active schema

pub mod protocol;
pub mod decoder;
