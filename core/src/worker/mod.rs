//! Worker module for issuing load requests
//!
//! A Worker is one tokio task running the request loop:
//! **count -> report -> request -> release -> repeat**.
//!
//! Each iteration:
//!
//! 1. Claims one attempt on the shared [`ProgressCounter`](crate::progress::ProgressCounter)
//! 2. Emits a throughput report if the observed count is on a reporting boundary
//! 3. Waits on the optional shared rate limiter
//! 4. Issues one GET via the [`TargetClient`](crate::traits::TargetClient), which
//!    drains and releases the response
//! 5. Logs request failures and moves on without backoff
//!
//! Under [`StopCondition::Indefinite`](crate::traits::StopCondition::Indefinite)
//! the loop only ends when shutdown is broadcast or the process exits.
//!
//! # Example
//!
//! ```ignore
//! use mtls_load_core::worker::WorkerBuilder;
//! use mtls_load_core::traits::StopCondition;
//!
//! let worker = WorkerBuilder::new(0)
//!     .client(client)
//!     .progress(progress.clone())
//!     .reporter(reporter)
//!     .stop_condition(StopCondition::Indefinite)
//!     .build()?;
//!
//! let stats = worker.run(shutdown_rx).await;
//! println!("Attempts: {}", stats.attempts());
//! ```

mod builder;
mod executor;
mod rate_limiter;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use rate_limiter::RequestRateLimiter;
pub use stats::WorkerStats;

#[cfg(test)]
mod tests;
