//! # Ingestion Path
//!
//! The single writer of the history buffer and the CSV log.
//!
//! One line in, at most one sample out: pre-filter, decode, schema check,
//! timestamp, append, persist. Malformed or incomplete lines are absorbed
//! here and never surface as errors; they are equivalent to "no new data
//! this tick".

use crate::error::Result;
use crate::frame::decoder::decode_line;
use crate::frame::protocol::{Schema, TelemetrySample};
use crate::history::HistoryBuffer;
use crate::telemetry::{log, CsvLog};
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info, warn};

/// Owns the history buffer and the optional CSV log.
///
/// Single producer: all mutation of both stores goes through
/// [`Ingestor::ingest_line`]. Readers borrow the history via
/// [`Ingestor::history`].
#[derive(Debug)]
pub struct Ingestor {
    schema: Schema,
    history: HistoryBuffer,
    log: Option<CsvLog>,
    accepted: u64,
    rejected: u64,
}

impl Ingestor {
    /// Create an ingestor with no persistence
    ///
    /// # Arguments
    ///
    /// * `schema` - Active message schema for this session
    /// * `capacity` - History buffer capacity
    pub fn new(schema: Schema, capacity: usize) -> Self {
        Self {
            schema,
            history: HistoryBuffer::with_capacity(capacity),
            log: None,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Create an ingestor backed by a CSV log, seeding history from it
    ///
    /// Existing rows are loaded oldest-first and trimmed to `capacity`,
    /// so a restart resumes with the same live window the previous session
    /// ended with.
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be read or created.
    pub fn with_log<P: AsRef<Path>>(
        schema: Schema,
        capacity: usize,
        path: P,
    ) -> Result<Self> {
        let mut ingestor = Self::new(schema, capacity);

        let existing = log::load(&path, schema)?;
        if !existing.is_empty() {
            info!(
                "Loaded {} samples from {}",
                existing.len(),
                path.as_ref().display()
            );
        }
        ingestor.history.preload(existing);
        ingestor.log = Some(CsvLog::open(path, schema)?);

        Ok(ingestor)
    }

    /// Ingest one raw line, stamping it with the current local time
    ///
    /// # Returns
    ///
    /// * `Option<TelemetrySample>` - The accepted sample, or `None` if the
    ///   line was rejected or incomplete
    pub fn ingest_line(&mut self, line: &str) -> Option<TelemetrySample> {
        self.ingest_line_at(line, Local::now().naive_local())
    }

    /// Ingest one raw line with an explicit timestamp
    ///
    /// Split out from [`Ingestor::ingest_line`] so the clock is injectable.
    ///
    /// Persistence failures are reported and swallowed: the sample is
    /// already in the history, and losing one log row must not stop the
    /// capture loop.
    pub fn ingest_line_at(
        &mut self,
        line: &str,
        timestamp: NaiveDateTime,
    ) -> Option<TelemetrySample> {
        let fields = decode_line(line);

        let sample = match TelemetrySample::from_fields(&fields, self.schema, timestamp) {
            Some(sample) => sample,
            None => {
                self.rejected += 1;
                debug!("Rejected line: {:?}", line);
                return None;
            }
        };

        self.history.append(sample);
        self.accepted += 1;

        if let Some(log) = &mut self.log {
            if let Err(e) = log.append(&sample) {
                warn!("Failed to persist sample: {}", e);
            }
        }

        Some(sample)
    }

    /// Read-only view of the history buffer
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Active schema
    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Samples accepted since construction (preloaded rows not counted)
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Lines rejected since construction
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
