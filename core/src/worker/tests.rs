//! Integration tests for the Worker module

use super::*;
use crate::progress::{ProgressCounter, ThroughputReport};
use crate::traits::{Reporter, RequestError, StopCondition, TargetClient};

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

// ============================================================================
// Mock TargetClient
// ============================================================================

struct MockTargetClient {
    calls: AtomicU64,
    delay: Option<Duration>,
    fail_first: u64,
}

impl MockTargetClient {
    fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            delay: None,
            fail_first: 0,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the first `n` requests with a simulated connection error
    fn with_fail_first(mut self, n: u64) -> Self {
        self.fail_first = n;
        self
    }

    fn always_failing() -> Self {
        Self::new().with_fail_first(u64::MAX)
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TargetClient for MockTargetClient {
    fn target(&self) -> &str {
        "https://mock.invalid"
    }

    async fn get(&self) -> Result<u16, RequestError> {
        let count = self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if count < self.fail_first {
            return Err(RequestError::Connection(
                "simulated connection refused".to_string(),
            ));
        }

        Ok(200)
    }
}

// ============================================================================
// Collecting Reporter
// ============================================================================

#[derive(Default)]
struct CollectingReporter {
    reports: Mutex<Vec<ThroughputReport>>,
}

impl CollectingReporter {
    fn counts(&self) -> Vec<u64> {
        self.reports.lock().unwrap().iter().map(|r| r.count).collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, report: &ThroughputReport) {
        self.reports.lock().unwrap().push(*report);
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn create_test_worker(
    id: usize,
    client: Arc<MockTargetClient>,
    progress: ProgressCounter,
    reporter: Arc<CollectingReporter>,
    stop_condition: StopCondition,
) -> (Worker, broadcast::Sender<()>) {
    let (shutdown_tx, _) = broadcast::channel(1);

    let worker = WorkerBuilder::new(id)
        .client(client)
        .progress(progress)
        .reporter(reporter)
        .stop_condition(stop_condition)
        .build()
        .expect("Failed to build worker");

    (worker, shutdown_tx)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_worker_run_request_count() {
    let client = Arc::new(MockTargetClient::new());
    let progress = ProgressCounter::new(500);
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client.clone(),
        progress.clone(),
        reporter,
        StopCondition::RequestCount(5),
    );

    let stats = worker.run(shutdown_tx.subscribe()).await;

    assert_eq!(stats.completed, 5);
    assert_eq!(stats.errors, 0);
    assert_eq!(client.calls(), 5);
    assert_eq!(progress.value(), 5);
}

#[tokio::test]
async fn test_worker_survives_consecutive_failures() {
    let failures = 10;
    let client = Arc::new(MockTargetClient::new().with_fail_first(failures));
    let progress = ProgressCounter::new(500);
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client.clone(),
        progress.clone(),
        reporter,
        StopCondition::RequestCount(failures + 1),
    );

    let stats = worker.run(shutdown_tx.subscribe()).await;

    // Request N+1 was still issued, and it succeeded
    assert_eq!(client.calls(), failures + 1);
    assert_eq!(stats.errors, failures);
    assert_eq!(stats.completed, 1);
    // Failed attempts are counted too
    assert_eq!(progress.value(), failures + 1);
}

#[tokio::test]
async fn test_worker_counts_every_failed_attempt() {
    let client = Arc::new(MockTargetClient::always_failing());
    let progress = ProgressCounter::new(500);
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client.clone(),
        progress.clone(),
        reporter,
        StopCondition::RequestCount(50),
    );

    let stats = worker.run(shutdown_tx.subscribe()).await;

    assert_eq!(stats.errors, 50);
    assert_eq!(stats.completed, 0);
    assert!((stats.failure_ratio() - 1.0).abs() < f64::EPSILON);
    assert_eq!(stats.error_kinds.get("connect"), Some(&50));
    assert_eq!(client.calls(), 50);
    assert_eq!(progress.value(), 50);
}

#[tokio::test]
async fn test_worker_reports_on_interval_boundaries() {
    let client = Arc::new(MockTargetClient::new());
    let progress = ProgressCounter::new(10);
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client,
        progress,
        reporter.clone(),
        StopCondition::RequestCount(25),
    );

    worker.run(shutdown_tx.subscribe()).await;

    assert_eq!(reporter.counts(), vec![0, 10, 20]);
}

#[tokio::test]
async fn test_worker_reports_after_interval_even_when_failing() {
    let client = Arc::new(MockTargetClient::always_failing());
    let progress = ProgressCounter::new(5);
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client,
        progress,
        reporter.clone(),
        StopCondition::RequestCount(6),
    );

    worker.run(shutdown_tx.subscribe()).await;

    let counts = reporter.counts();
    assert_eq!(counts, vec![0, 5]);
    assert!(counts.iter().all(|c| c % 5 == 0));
}

#[tokio::test]
async fn test_worker_run_shutdown() {
    let client = Arc::new(MockTargetClient::new().with_delay(Duration::from_millis(10)));
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client,
        ProgressCounter::new(500),
        reporter,
        StopCondition::Indefinite,
    );

    let shutdown_rx = shutdown_tx.subscribe();
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(60)).await;
    shutdown_tx.send(()).expect("Failed to send shutdown");

    let stats = handle.await.expect("Worker task panicked");
    assert!(stats.completed >= 1);
    assert!(stats.ended_at.is_some());
}

#[tokio::test]
async fn test_worker_shutdown_abandons_in_flight_request() {
    let client = Arc::new(MockTargetClient::new().with_delay(Duration::from_secs(30)));
    let progress = ProgressCounter::new(500);
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client,
        progress.clone(),
        reporter,
        StopCondition::Indefinite,
    );

    let shutdown_rx = shutdown_tx.subscribe();
    let start = Instant::now();
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    shutdown_tx.send(()).expect("Failed to send shutdown");

    let stats = handle.await.expect("Worker task panicked");
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(stats.completed, 0);
    // The abandoned attempt was still counted
    assert_eq!(progress.value(), 1);
}

#[tokio::test]
async fn test_failing_worker_does_not_starve_runtime() {
    // Default test runtime is single-threaded: the sleep below only
    // completes if the worker yields between instant failures.
    let client = Arc::new(MockTargetClient::always_failing());
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client,
        ProgressCounter::new(500),
        reporter,
        StopCondition::Indefinite,
    );

    let shutdown_rx = shutdown_tx.subscribe();
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    shutdown_tx.send(()).expect("Failed to send shutdown");

    let stats = handle.await.expect("Worker task panicked");
    assert!(stats.errors > 0);
    assert_eq!(stats.completed, 0);
}

#[tokio::test]
async fn test_worker_run_duration() {
    let client = Arc::new(MockTargetClient::new().with_delay(Duration::from_millis(5)));
    let reporter = Arc::new(CollectingReporter::default());

    let (worker, shutdown_tx) = create_test_worker(
        0,
        client,
        ProgressCounter::new(500),
        reporter,
        StopCondition::Duration(Duration::from_millis(100)),
    );

    let start = Instant::now();
    let stats = worker.run(shutdown_tx.subscribe()).await;

    assert!(start.elapsed() >= Duration::from_millis(100));
    assert!(stats.completed > 0);
}

#[tokio::test]
async fn test_workers_share_progress_counter() {
    let client = Arc::new(MockTargetClient::new().with_delay(Duration::from_millis(1)));
    let progress = ProgressCounter::new(500);
    let reporter = Arc::new(CollectingReporter::default());
    let (shutdown_tx, _) = broadcast::channel(1);

    let mut handles = Vec::new();
    for id in 0..4 {
        let worker = WorkerBuilder::new(id)
            .client(client.clone())
            .progress(progress.clone())
            .reporter(reporter.clone())
            .stop_condition(StopCondition::RequestCount(100))
            .build()
            .expect("Failed to build worker");
        let shutdown_rx = shutdown_tx.subscribe();
        handles.push(tokio::spawn(async move { worker.run(shutdown_rx).await }));
    }

    let mut total = WorkerStats::new();
    for handle in handles {
        total.absorb(&handle.await.expect("Worker task panicked"));
    }

    assert_eq!(total.attempts(), 100);
    assert_eq!(client.calls(), 100);
    assert_eq!(progress.value(), 100);
    // Only the worker that observed 0 reports
    assert_eq!(reporter.counts(), vec![0]);
}

#[tokio::test]
async fn test_worker_with_rate_limit() {
    let client = Arc::new(MockTargetClient::new());
    let reporter = Arc::new(CollectingReporter::default());
    let (shutdown_tx, _) = broadcast::channel(1);

    let worker = WorkerBuilder::new(0)
        .client(client.clone())
        .progress(ProgressCounter::new(500))
        .reporter(reporter)
        .rate_limiter(Arc::new(RequestRateLimiter::new(Some(50.0))))
        .stop_condition(StopCondition::RequestCount(3))
        .build()
        .expect("Failed to build worker");

    let start = Instant::now();
    let stats = worker.run(shutdown_tx.subscribe()).await;

    assert_eq!(stats.completed, 3);
    // 50 rps spaces permits 20ms apart after the first
    assert!(start.elapsed() >= Duration::from_millis(35));
}
