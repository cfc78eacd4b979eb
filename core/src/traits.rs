//! Core traits for target clients and throughput reporting
//!
//! Workers only see these seams; the HTTPS implementation lives in
//! [`crate::client`] and the stdout reporter in [`crate::progress`].

use crate::progress::ThroughputReport;
use async_trait::async_trait;
use std::time::Duration;

// ============================================================================
// Target Client Trait
// ============================================================================

/// Issues one request against the fixed target endpoint
///
/// Implementations must release every response resource before returning,
/// whether the request succeeded or not.
#[async_trait]
pub trait TargetClient: Send + Sync {
    /// URL every request is sent to
    fn target(&self) -> &str;

    /// Issue a single GET and return the response status code
    ///
    /// The status is not validated; any HTTP response counts as a completed
    /// request.
    async fn get(&self) -> Result<u16, RequestError>;
}

/// Failure of an individual request
///
/// Request errors never stop a worker; they are logged and the next
/// iteration fires immediately.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// HTTP, TLS or network error from the transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection could not be established
    #[error("connection error: {0}")]
    Connection(String),

    /// Request timed out
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl RequestError {
    /// Short classification used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::Http(e) if e.is_connect() => "connect",
            RequestError::Http(e) if e.is_timeout() => "timeout",
            RequestError::Http(e) if e.is_body() => "body",
            RequestError::Http(_) => "http",
            RequestError::Connection(_) => "connect",
            RequestError::Timeout(_) => "timeout",
        }
    }
}

// ============================================================================
// Reporter Trait
// ============================================================================

/// Sink for periodic throughput reports
pub trait Reporter: Send + Sync {
    /// Emit one report
    fn report(&self, report: &ThroughputReport);
}

// ============================================================================
// Stop Condition
// ============================================================================

/// When a load run ends
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StopCondition {
    /// Run until the process is terminated or shutdown is broadcast
    #[default]
    Indefinite,

    /// Issue exactly N requests in total across all workers
    RequestCount(u64),

    /// Run for the specified duration
    Duration(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_condition_default() {
        assert_eq!(StopCondition::default(), StopCondition::Indefinite);
    }

    #[test]
    fn test_request_error_kind() {
        assert_eq!(
            RequestError::Connection("refused".into()).kind(),
            "connect"
        );
        assert_eq!(
            RequestError::Timeout(Duration::from_secs(1)).kind(),
            "timeout"
        );
    }

    #[test]
    fn test_request_error_display() {
        let err = RequestError::Connection("connection refused".into());
        assert_eq!(err.to_string(), "connection error: connection refused");
    }
}
