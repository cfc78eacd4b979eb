//! Optional global request rate cap

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::time::Duration;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Permit gate shared by all workers through an `Arc`
///
/// Fractional rates work because permits are spaced `1 / rps` apart rather
/// than granted per whole second.
pub struct RequestRateLimiter {
    gate: Option<(Duration, DirectLimiter)>,
}

impl RequestRateLimiter {
    /// Cap at `rate_limit` requests per second
    ///
    /// `None`, zero, negative or non-finite rates leave requests unthrottled.
    pub fn new(rate_limit: Option<f64>) -> Self {
        let gate = rate_limit
            .filter(|rps| rps.is_finite() && *rps > 0.0)
            .and_then(|rps| Duration::try_from_secs_f64(rps.recip()).ok())
            .and_then(|period| Some((period, RateLimiter::direct(Quota::with_period(period)?))));

        Self { gate }
    }

    /// Never waits
    pub fn unlimited() -> Self {
        Self { gate: None }
    }

    /// Block until the next request may go out
    pub async fn wait(&self) {
        if let Some((_, limiter)) = &self.gate {
            limiter.until_ready().await;
        }
    }

    /// Whether a cap is in effect
    pub fn is_enabled(&self) -> bool {
        self.gate.is_some()
    }

    /// Spacing between permits, if capped
    pub fn period(&self) -> Option<Duration> {
        self.gate.as_ref().map(|(period, _)| *period)
    }
}

impl Default for RequestRateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl std::fmt::Debug for RequestRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRateLimiter")
            .field("period", &self.period())
            .finish()
    }
}
