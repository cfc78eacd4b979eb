//! Orchestrator for load run lifecycle management
//!
//! The Orchestrator drives a load run:
//! - Spawning the fixed pool of worker tasks on one shared target client
//! - Owning the shared progress counter and rate limiter
//! - Broadcasting shutdown (bounded runs, Ctrl+C, tests)
//! - Aggregating worker stats once they finish
//!
//! # Example
//!
//! ```ignore
//! use mtls_load_core::{LoadConfig, OrchestratorBuilder, StdoutReporter};
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .config(LoadConfig::new(10))
//!     .client(client)
//!     .reporter(Arc::new(StdoutReporter))
//!     .build()?;
//!
//! let stats = orchestrator.run_with_signal_handling().await?;
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, AggregatedStats};
pub use builder::OrchestratorBuilder;
pub use executor::Orchestrator;
