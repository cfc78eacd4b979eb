//! Builder pattern for Orchestrator construction

use std::sync::Arc;

use crate::config::LoadConfig;
use crate::error::{LoadError, LoadResult};
use crate::progress::StdoutReporter;
use crate::traits::{Reporter, StopCondition, TargetClient};

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .workers(10)
///     .report_interval(500)
///     .client(client)
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: LoadConfig,
    client: Option<Arc<dyn TargetClient>>,
    reporter: Option<Arc<dyn Reporter>>,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LoadConfig::default(),
            client: None,
            reporter: None,
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: LoadConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the worker count
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the reporting interval
    pub fn report_interval(mut self, interval: u64) -> Self {
        self.config.report_interval = interval;
        self
    }

    /// Set the stop condition
    pub fn stop_condition(mut self, stop: StopCondition) -> Self {
        self.config.stop_condition = stop;
        self
    }

    /// Set the rate limit (requests per second)
    pub fn rate_limit(mut self, rps: Option<f64>) -> Self {
        self.config.rate_limit = rps;
        self
    }

    /// Set the target client
    pub fn client(mut self, client: Arc<dyn TargetClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the reporter (defaults to stdout)
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if no client is set or if configuration validation
    /// fails.
    pub fn build(self) -> LoadResult<Orchestrator> {
        let client = self
            .client
            .ok_or_else(|| LoadError::missing_config("client"))?;

        self.config
            .validate()
            .map_err(|e| LoadError::config(e.to_string()))?;

        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(StdoutReporter) as Arc<dyn Reporter>);

        Ok(Orchestrator::new(self.config, client, reporter))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
