//! Load run configuration types

use crate::progress::DEFAULT_REPORT_INTERVAL;
use crate::traits::StopCondition;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target used when none is configured
pub const DEFAULT_TARGET: &str = "https://127.0.0.1:6789";

/// Worker count used when none is configured
pub const DEFAULT_WORKERS: usize = 10;

/// Load run configuration
///
/// Defines how many workers hammer which target, how often throughput is
/// reported, and when (if ever) the run ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Number of concurrent worker tasks
    pub workers: usize,

    /// URL every worker sends GET requests to
    pub target: String,

    /// Requests between throughput reports (K)
    pub report_interval: u64,

    /// When workers stop
    pub stop_condition: StopCondition,

    /// Optional global rate limit (requests per second)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<f64>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            target: DEFAULT_TARGET.to_string(),
            report_interval: DEFAULT_REPORT_INTERVAL,
            stop_condition: StopCondition::default(),
            rate_limit: None,
        }
    }
}

impl LoadConfig {
    /// Create a new config with the given worker count
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    /// Set the target URL
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the reporting interval
    pub fn with_report_interval(mut self, interval: u64) -> Self {
        self.report_interval = interval;
        self
    }

    /// Set the stop condition
    pub fn with_stop_condition(mut self, stop: StopCondition) -> Self {
        self.stop_condition = stop;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rps: f64) -> Self {
        self.rate_limit = Some(rps);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers(
                "worker count must be at least 1".into(),
            ));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidReportInterval(
                "report interval must be at least 1".into(),
            ));
        }

        let url = reqwest::Url::parse(&self.target)
            .map_err(|e| ConfigError::InvalidTarget(format!("{}: {}", self.target, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidTarget(format!(
                "{}: scheme must be http or https",
                self.target
            )));
        }

        if let Some(rps) = self.rate_limit {
            if rps <= 0.0 {
                return Err(ConfigError::InvalidRateLimit(
                    "rate limit must be positive".into(),
                ));
            }
        }

        match self.stop_condition {
            StopCondition::RequestCount(0) => {
                return Err(ConfigError::InvalidStopCondition(
                    "request count must be at least 1".into(),
                ));
            }
            StopCondition::Duration(d) if d.is_zero() => {
                return Err(ConfigError::InvalidStopCondition(
                    "duration must be non-zero".into(),
                ));
            }
            _ => {}
        }

        Ok(())
    }
}

/// Paths of the PEM files that make up the client's TLS credentials
///
/// The client certificate and the CA bundle default to the same file,
/// but they are read independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsPaths {
    /// PEM client certificate (chain)
    pub cert: PathBuf,
    /// PEM private key for the client certificate
    pub key: PathBuf,
    /// PEM CA bundle
    pub ca: PathBuf,
}

impl Default for TlsPaths {
    fn default() -> Self {
        Self {
            cert: PathBuf::from("ca.pem"),
            key: PathBuf::from("ca-key.pem"),
            ca: PathBuf::from("ca.pem"),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count: {0}")]
    InvalidWorkers(String),

    /// Invalid reporting interval
    #[error("Invalid report interval: {0}")]
    InvalidReportInterval(String),

    /// Target is not an http(s) URL
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Invalid rate limit
    #[error("Invalid rate limit: {0}")]
    InvalidRateLimit(String),

    /// Invalid stop condition
    #[error("Invalid stop condition: {0}")]
    InvalidStopCondition(String),
}
