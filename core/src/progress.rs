//! Shared progress counter and throughput reporting
//!
//! Every worker holds a clone of the same [`ProgressCounter`]. Each loop
//! iteration increments it exactly once, before the request is issued, and
//! the worker whose increment observes a multiple of the reporting interval
//! prints a [`ThroughputReport`].

use crate::traits::Reporter;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of requests between throughput reports
pub const DEFAULT_REPORT_INTERVAL: u64 = 500;

/// Process-wide count of request attempts
///
/// Cloning is cheap and every clone shares the same count and start time.
/// The count never decreases.
#[derive(Debug, Clone)]
pub struct ProgressCounter {
    count: Arc<AtomicU64>,
    started_at: Instant,
    interval: u64,
}

impl ProgressCounter {
    /// Create a counter starting at zero, timed from now
    pub fn new(interval: u64) -> Self {
        Self {
            count: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
            interval,
        }
    }

    /// Record one attempt and return the value observed before it
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed)
    }

    /// Record one attempt unless `limit` attempts have already been made
    ///
    /// Returns the observed value, or `None` once the limit is reached.
    pub fn try_increment(&self, limit: u64) -> Option<u64> {
        self.count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                (current < limit).then_some(current + 1)
            })
            .ok()
    }

    /// Current number of recorded attempts
    pub fn value(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Reporting interval (K)
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Time since the counter was created
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Build a report if `observed` falls on a reporting boundary
    pub fn report_for(&self, observed: u64) -> Option<ThroughputReport> {
        if self.interval == 0 || observed % self.interval != 0 {
            return None;
        }
        Some(ThroughputReport::new(observed, self.elapsed()))
    }
}

impl Default for ProgressCounter {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_INTERVAL)
    }
}

/// Instantaneous throughput estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputReport {
    /// Attempts observed when the report was taken
    pub count: u64,
    /// Attempts per second since the run started
    pub rate: f64,
}

impl ThroughputReport {
    /// Compute the rate for `count` attempts over `elapsed`
    pub fn new(count: u64, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 { count as f64 / secs } else { 0.0 };
        Self { count, rate }
    }
}

impl std::fmt::Display for ThroughputReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request: {}, (p.s. {:.6})", self.count, self.rate)
    }
}

/// Writes each report as one line on standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&self, report: &ThroughputReport) {
        println!("{report}");
    }
}
