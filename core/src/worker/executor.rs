//! Worker request loop

use crate::progress::ProgressCounter;
use crate::traits::{Reporter, RequestError, StopCondition, TargetClient};

use super::rate_limiter::RequestRateLimiter;
use super::stats::WorkerStats;

use std::sync::Arc;
use tokio::sync::broadcast;

/// Worker issues requests in a loop: count -> report -> request -> repeat
///
/// Workers are tokio tasks spawned by the Orchestrator. They share the
/// target client, progress counter, reporter and rate limiter via Arc and
/// keep no mutable state beyond their own [`WorkerStats`].
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Target client (shared across workers)
    client: Arc<dyn TargetClient>,

    /// Shared attempt counter
    progress: ProgressCounter,

    /// Where throughput reports go
    reporter: Arc<dyn Reporter>,

    /// Rate limiter (shared across workers)
    rate_limiter: Arc<RequestRateLimiter>,

    /// Stop condition
    stop_condition: StopCondition,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        client: Arc<dyn TargetClient>,
        progress: ProgressCounter,
        reporter: Arc<dyn Reporter>,
        rate_limiter: Arc<RequestRateLimiter>,
        stop_condition: StopCondition,
    ) -> Self {
        Self {
            id,
            client,
            progress,
            reporter,
            rate_limiter,
            stop_condition,
        }
    }

    /// Run the worker loop
    ///
    /// Returns when the stop condition is met or shutdown is broadcast. With
    /// [`StopCondition::Indefinite`] and no shutdown it never returns.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> WorkerStats {
        let mut stats = WorkerStats::new();
        stats.begin();

        tracing::debug!(worker_id = self.id, url = self.client.target(), "Worker started");

        loop {
            if self.should_stop(&stats) {
                tracing::debug!(
                    worker_id = self.id,
                    completed = stats.completed,
                    errors = stats.errors,
                    "Worker reached stop condition"
                );
                break;
            }

            // Counted before the request is issued, success or failure
            let Some(observed) = self.claim_attempt() else {
                tracing::debug!(worker_id = self.id, "Request budget exhausted, worker stopping");
                break;
            };

            if let Some(report) = self.progress.report_for(observed) {
                self.reporter.report(&report);
            }

            tokio::select! {
                biased;

                _ = shutdown.recv() => {
                    tracing::debug!(worker_id = self.id, "Worker received shutdown signal");
                    break;
                }

                result = self.execute_one() => {
                    match result {
                        Ok(status) => {
                            stats.record_response(status);
                            tracing::trace!(worker_id = self.id, status, "Request completed");
                        }
                        Err(e) => {
                            stats.record_failure(e.kind());
                            tracing::warn!(
                                worker_id = self.id,
                                kind = e.kind(),
                                error = %e,
                                "Request failed"
                            );
                        }
                    }
                }
            }

            // A target that fails instantly must not starve the other tasks
            tokio::task::yield_now().await;
        }

        stats.finish();
        tracing::debug!(
            worker_id = self.id,
            completed = stats.completed,
            errors = stats.errors,
            elapsed_ms = ?stats.run_time().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }

    /// Issue a single request
    async fn execute_one(&self) -> Result<u16, RequestError> {
        self.rate_limiter.wait().await;
        self.client.get().await
    }

    /// Record one attempt on the shared counter
    ///
    /// Returns the value observed before the increment, or `None` once a
    /// request budget is exhausted.
    fn claim_attempt(&self) -> Option<u64> {
        match self.stop_condition {
            StopCondition::RequestCount(total) => self.progress.try_increment(total),
            _ => Some(self.progress.increment()),
        }
    }

    /// Check if the worker should stop based on stop condition
    fn should_stop(&self, stats: &WorkerStats) -> bool {
        match &self.stop_condition {
            StopCondition::Duration(duration) => {
                stats.run_time().is_some_and(|t| t >= *duration)
            }
            // Enforced by claim_attempt against the shared counter
            StopCondition::RequestCount(_) => false,
            StopCondition::Indefinite => false,
        }
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("target", &self.client.target())
            .field("rate_limiter", &self.rate_limiter)
            .field("stop_condition", &self.stop_condition)
            .finish()
    }
}
