//! # Bounded History Store
//!
//! Fixed-capacity FIFO buffer of telemetry samples.
//!
//! This module handles:
//! - Appending samples in arrival order
//! - Evicting the oldest samples once capacity is exceeded
//! - Exposing read-only views for rendering and persistence

use crate::frame::protocol::TelemetrySample;
use std::collections::VecDeque;

/// Default history capacity (matches the node's ~10k point live window)
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Bounded, insertion-ordered sample history.
///
/// Capacity is fixed at construction. There is exactly one writer (the
/// ingestion path); readers get either a borrowed iterator or a cloned
/// snapshot, neither of which can mutate the buffer.
#[derive(Debug)]
pub struct HistoryBuffer {
    samples: VecDeque<TelemetrySample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty history with the given capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of retained samples (must be > 0;
    ///   clamped to 1 otherwise)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Append one sample as the newest entry
    ///
    /// Evicts from the front until the length is back at capacity.
    /// Amortized O(1).
    pub fn append(&mut self, sample: TelemetrySample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Seed the history from previously persisted samples
    ///
    /// Applies the same capacity trim as live ingestion, so loading an
    /// oversized log keeps only the newest `capacity` rows.
    pub fn preload<I: IntoIterator<Item = TelemetrySample>>(&mut self, samples: I) {
        for sample in samples {
            self.append(sample);
        }
    }

    /// Current ordered contents, oldest to newest, as an owned copy
    ///
    /// The returned vector is detached from the buffer; callers cannot
    /// corrupt the history through it.
    pub fn snapshot(&self) -> Vec<TelemetrySample> {
        self.samples.iter().copied().collect()
    }

    /// Borrowing iterator over the contents, oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    /// Newest sample, if any
    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are retained
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
