//! Run summary across workers

use std::collections::BTreeMap;
use std::time::Duration;

use crate::worker::WorkerStats;

/// Totals for a whole run
#[derive(Debug, Clone, Default)]
pub struct AggregatedStats {
    /// Number of workers that reported stats
    pub total_workers: usize,

    /// Attempts that received a response
    pub total_completed: u64,

    /// Attempts that failed
    pub total_errors: u64,

    /// Responses per status class, as in [`WorkerStats::status_classes`]
    pub status_classes: [u64; 6],

    /// Failures by kind
    pub error_kinds: BTreeMap<&'static str, u64>,

    /// Longest worker run
    pub total_duration: Duration,

    /// Attempts per second across all workers
    pub requests_per_second: f64,
}

impl AggregatedStats {
    /// Attempts that finished (completed + errors)
    pub fn total_requests(&self) -> u64 {
        self.total_completed + self.total_errors
    }

    /// Fraction of attempts that got a response
    pub fn success_rate(&self) -> f64 {
        match self.total_requests() {
            0 => 0.0,
            n => self.total_completed as f64 / n as f64,
        }
    }

    /// Responses outside 2xx
    pub fn non_success_responses(&self) -> u64 {
        self.total_completed - self.status_classes[2]
    }
}

/// Fold per-worker stats into a run summary
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    let mut merged = WorkerStats::new();
    stats.iter().for_each(|s| merged.absorb(s));

    // Workers overlap, so the slowest one is the run length
    let total_duration = stats
        .iter()
        .filter_map(WorkerStats::run_time)
        .max()
        .unwrap_or_default();

    let requests_per_second = match total_duration.as_secs_f64() {
        secs if secs > 0.0 => merged.attempts() as f64 / secs,
        _ => 0.0,
    };

    AggregatedStats {
        total_workers: stats.len(),
        total_completed: merged.completed,
        total_errors: merged.errors,
        status_classes: merged.status_classes,
        error_kinds: merged.error_kinds,
        total_duration,
        requests_per_second,
    }
}
