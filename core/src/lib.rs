//! mtls-load-core: concurrent request loop and throughput counter
//!
//! This crate provides everything behind the `mtls-load` binary:
//!
//! - Mutual-TLS client construction from PEM files ([`tls`], [`client`])
//! - The worker request loop ([`worker`])
//! - The shared progress counter and throughput reports ([`progress`])
//! - The orchestrator that spawns and stops workers ([`orchestrator`])
//! - Run configuration and error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod tls;
pub mod traits;
pub mod worker;

pub use client::HttpsTargetClient;
pub use config::{ConfigError, LoadConfig, TlsPaths, DEFAULT_TARGET, DEFAULT_WORKERS};
pub use error::{CredentialRole, LoadError, LoadResult};
pub use orchestrator::{aggregate_worker_stats, AggregatedStats, Orchestrator, OrchestratorBuilder};
pub use progress::{ProgressCounter, StdoutReporter, ThroughputReport, DEFAULT_REPORT_INTERVAL};
pub use tls::TlsCredentials;
pub use traits::{Reporter, RequestError, StopCondition, TargetClient};
pub use worker::{RequestRateLimiter, Worker, WorkerBuilder, WorkerStats};
