//! Per-worker outcome tallies

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Buckets for response statuses: index `n` holds `nxx`, index 0 anything
/// outside `100..=599`
pub const STATUS_CLASSES: usize = 6;

/// What a single worker saw over its lifetime
///
/// Every attempt lands in exactly one of `completed` or `errors`; a request
/// abandoned at shutdown lands in neither.
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Attempts that received an HTTP response, whatever the status
    pub completed: u64,

    /// Attempts that failed before a response was read
    pub errors: u64,

    /// Responses per status class
    pub status_classes: [u64; STATUS_CLASSES],

    /// Failures keyed by [`RequestError::kind`](crate::traits::RequestError::kind)
    pub error_kinds: BTreeMap<&'static str, u64>,

    /// When the loop started
    pub started_at: Option<Instant>,

    /// When the loop exited
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Empty tallies, clock not started
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of the loop
    pub fn begin(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Mark the end of the loop
    pub fn finish(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Attempts that finished one way or the other
    pub fn attempts(&self) -> u64 {
        self.completed + self.errors
    }

    /// Share of attempts that failed, 0.0 when nothing was attempted
    pub fn failure_ratio(&self) -> f64 {
        match self.attempts() {
            0 => 0.0,
            n => self.errors as f64 / n as f64,
        }
    }

    /// Wall time of the loop; still running if `finish` was not called
    pub fn run_time(&self) -> Option<Duration> {
        let start = self.started_at?;
        Some(match self.ended_at {
            Some(end) => end.saturating_duration_since(start),
            None => start.elapsed(),
        })
    }

    /// Count a response with the given status
    pub fn record_response(&mut self, status: u16) {
        self.completed += 1;
        self.status_classes[status_class(status)] += 1;
    }

    /// Count a failed attempt
    pub fn record_failure(&mut self, kind: &'static str) {
        self.errors += 1;
        *self.error_kinds.entry(kind).or_default() += 1;
    }

    /// Fold another worker's tallies into these
    ///
    /// Timestamps are left alone: workers overlap, so summing them means
    /// nothing.
    pub fn absorb(&mut self, other: &WorkerStats) {
        self.completed += other.completed;
        self.errors += other.errors;
        for (mine, theirs) in self.status_classes.iter_mut().zip(other.status_classes) {
            *mine += theirs;
        }
        for (kind, count) in &other.error_kinds {
            *self.error_kinds.entry(*kind).or_default() += count;
        }
    }
}

fn status_class(status: u16) -> usize {
    match status {
        100..=599 => usize::from(status / 100),
        _ => 0,
    }
}
