//! Builder pattern for Worker construction

use crate::error::{LoadError, LoadResult};
use crate::progress::ProgressCounter;
use crate::traits::{Reporter, StopCondition, TargetClient};

use super::executor::Worker;
use super::rate_limiter::RequestRateLimiter;

use std::sync::Arc;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .client(client)
///     .progress(progress)
///     .reporter(Arc::new(StdoutReporter))
///     .stop_condition(StopCondition::Indefinite)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    client: Option<Arc<dyn TargetClient>>,
    progress: Option<ProgressCounter>,
    reporter: Option<Arc<dyn Reporter>>,
    rate_limiter: Option<Arc<RequestRateLimiter>>,
    stop_condition: Option<StopCondition>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            client: None,
            progress: None,
            reporter: None,
            rate_limiter: None,
            stop_condition: None,
        }
    }

    /// Set the target client
    pub fn client(mut self, client: Arc<dyn TargetClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the shared progress counter
    pub fn progress(mut self, progress: ProgressCounter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Set the throughput reporter
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Set a shared rate limiter (defaults to unlimited)
    pub fn rate_limiter(mut self, limiter: Arc<RequestRateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Set the stop condition
    pub fn stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = Some(condition);
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> LoadResult<Worker> {
        let client = self.client.ok_or(LoadError::missing_config("client"))?;
        let progress = self
            .progress
            .ok_or(LoadError::missing_config("progress"))?;
        let reporter = self
            .reporter
            .ok_or(LoadError::missing_config("reporter"))?;
        let stop_condition = self
            .stop_condition
            .ok_or(LoadError::missing_config("stop_condition"))?;
        let rate_limiter = self
            .rate_limiter
            .unwrap_or_else(|| Arc::new(RequestRateLimiter::unlimited()));

        Ok(Worker::new(
            self.id,
            client,
            progress,
            reporter,
            rate_limiter,
            stop_condition,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::StdoutReporter;

    #[test]
    fn test_builder_missing_client() {
        let result = WorkerBuilder::new(0)
            .progress(ProgressCounter::default())
            .reporter(Arc::new(StdoutReporter))
            .stop_condition(StopCondition::Indefinite)
            .build();

        let err = result.unwrap_err();
        assert!(matches!(err, LoadError::MissingConfig("client")));
    }

    #[test]
    fn test_builder_missing_progress() {
        let result = WorkerBuilder::new(0)
            .reporter(Arc::new(StdoutReporter))
            .stop_condition(StopCondition::Indefinite)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_missing_reporter() {
        let result = WorkerBuilder::new(0)
            .progress(ProgressCounter::default())
            .stop_condition(StopCondition::Indefinite)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_missing_stop_condition() {
        let result = WorkerBuilder::new(0)
            .progress(ProgressCounter::default())
            .reporter(Arc::new(StdoutReporter))
            .build();

        assert!(result.is_err());
    }
}
