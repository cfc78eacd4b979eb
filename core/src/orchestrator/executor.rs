//! Spawning, stopping and joining the worker tasks

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::LoadConfig;
use crate::error::{LoadError, LoadResult};
use crate::progress::ProgressCounter;
use crate::traits::{Reporter, StopCondition, TargetClient};
use crate::worker::{RequestRateLimiter, WorkerBuilder, WorkerStats};

use super::aggregator::aggregate_worker_stats;

/// Owns everything the workers share for one load run
///
/// Workers get clones of the client, counter, reporter and limiter handles.
/// The orchestrator keeps the shutdown sender.
pub struct Orchestrator {
    /// Run configuration
    pub(crate) config: LoadConfig,

    /// Target client (shared across workers)
    pub(crate) client: Arc<dyn TargetClient>,

    /// Throughput report sink (shared across workers)
    pub(crate) reporter: Arc<dyn Reporter>,

    /// Shared attempt counter
    pub(crate) progress: ProgressCounter,

    /// Global rate limiter
    pub(crate) rate_limiter: Arc<RequestRateLimiter>,

    /// Broadcasts stop to every worker
    pub(crate) shutdown_tx: broadcast::Sender<()>,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for a validated construction. The progress
    /// counter's clock starts here.
    pub fn new(
        config: LoadConfig,
        client: Arc<dyn TargetClient>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let progress = ProgressCounter::new(config.report_interval);
        let rate_limiter = Arc::new(RequestRateLimiter::new(config.rate_limit));
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            client,
            reporter,
            progress,
            rate_limiter,
            shutdown_tx,
        }
    }

    /// Subscribe to the stop broadcast
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Stop every worker, abandoning requests in flight
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get the run configuration
    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Get the shared progress counter
    pub fn progress(&self) -> &ProgressCounter {
        &self.progress
    }

    /// Run the load
    ///
    /// Spawns the worker tasks and waits for all of them. With
    /// [`StopCondition::Indefinite`] this only returns after [`shutdown`](Self::shutdown).
    pub async fn run(&self) -> LoadResult<Vec<WorkerStats>> {
        let start = Instant::now();
        let mut handles = Vec::with_capacity(self.config.workers);

        tracing::info!(
            target_url = self.client.target(),
            workers = self.config.workers,
            report_interval = self.config.report_interval,
            stop_condition = ?self.config.stop_condition,
            rate_limit = ?self.config.rate_limit,
            "Starting load run"
        );

        for worker_id in 0..self.config.workers {
            let worker = WorkerBuilder::new(worker_id)
                .client(Arc::clone(&self.client))
                .progress(self.progress.clone())
                .reporter(Arc::clone(&self.reporter))
                .rate_limiter(Arc::clone(&self.rate_limiter))
                .stop_condition(self.config.stop_condition.clone())
                .build()?;
            let shutdown_rx = self.shutdown_tx.subscribe();

            handles.push(tokio::spawn(worker.run(shutdown_rx)));
        }

        // Bounded runs also interrupt requests still in flight at the deadline
        let deadline = match self.config.stop_condition {
            StopCondition::Duration(duration) => {
                let shutdown_tx = self.shutdown_tx.clone();
                Some(tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    tracing::info!("Run duration reached, initiating shutdown...");
                    let _ = shutdown_tx.send(());
                }))
            }
            _ => None,
        };

        let mut results = Vec::with_capacity(handles.len());
        let mut worker_failures = 0;
        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => {
                    tracing::debug!(
                        worker_id = idx,
                        completed = stats.completed,
                        errors = stats.errors,
                        "Worker completed"
                    );
                    results.push(stats);
                }
                Err(e) => {
                    worker_failures += 1;
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                }
            }
        }

        if let Some(deadline) = deadline {
            deadline.abort();
        }

        if results.is_empty() && worker_failures > 0 {
            return Err(LoadError::orchestration(format!(
                "every worker task panicked ({worker_failures})"
            )));
        }

        let aggregated = aggregate_worker_stats(&results);
        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            attempts = self.progress.value(),
            completed = aggregated.total_completed,
            errors = aggregated.total_errors,
            non_2xx = aggregated.non_success_responses(),
            failures = ?aggregated.error_kinds,
            rps = aggregated.requests_per_second,
            "Load run finished"
        );

        Ok(results)
    }

    /// Run with Ctrl+C signal handling
    ///
    /// Ctrl+C broadcasts shutdown so workers stop and stats are reported.
    pub async fn run_with_signal_handling(&self) -> LoadResult<Vec<WorkerStats>> {
        let shutdown_tx = self.shutdown_tx.clone();

        let signal_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C, initiating shutdown...");
                    let _ = shutdown_tx.send(());
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        });

        let result = self.run().await;

        signal_handle.abort();

        result
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("target", &self.client.target())
            .field("progress", &self.progress.value())
            .finish()
    }
}
