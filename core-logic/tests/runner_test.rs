use anyhow::Result;
use async_trait::async_trait;
use core_logic::{Worker, WorkerRunner, WorkerStats};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;

struct TestWorker {
    name: String,
    sleep: Duration,
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    barrier: Option<Arc<Barrier>>,
}

impl TestWorker {
    fn new(name: &str, sleep: Duration, current: Arc<AtomicUsize>, peak: Arc<AtomicUsize>) -> Self {
        Self {
            name: name.to_string(),
            sleep,
            current,
            peak,
            barrier: None,
        }
    }
}

#[async_trait]
impl Worker for TestWorker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run_cycle(&self, token: CancellationToken) -> Result<WorkerStats> {
        let in_flight = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(in_flight, Ordering::SeqCst);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        tokio::select! {
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(self.sleep) => {}
        }

        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(WorkerStats {
            success: 1,
            failed: 0,
        })
    }
}

struct FailingWorker;

#[async_trait]
impl Worker for FailingWorker {
    fn name(&self) -> &str {
        "failing"
    }

    async fn run_cycle(&self, _token: CancellationToken) -> Result<WorkerStats> {
        Err(anyhow::anyhow!("boom"))
    }
}

fn counters() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)))
}

#[tokio::test]
async fn all_workers_complete_one_cycle() {
    let (current, peak) = counters();
    let workers: Vec<Arc<dyn Worker>> = vec![
        Arc::new(TestWorker::new(
            "a1",
            Duration::from_millis(10),
            current.clone(),
            peak.clone(),
        )),
        Arc::new(TestWorker::new(
            "a2",
            Duration::from_millis(10),
            current.clone(),
            peak.clone(),
        )),
    ];

    let token = CancellationToken::new();
    let stats = WorkerRunner::run_cycle(&workers, None, &token).await;

    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(current.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unbounded_cycle_runs_workers_concurrently() {
    let (current, peak) = counters();
    let barrier = Arc::new(Barrier::new(2));

    let mut w1 = TestWorker::new("a1", Duration::from_millis(5), current.clone(), peak.clone());
    w1.barrier = Some(barrier.clone());
    let mut w2 = TestWorker::new("a2", Duration::from_millis(5), current.clone(), peak.clone());
    w2.barrier = Some(barrier);

    let workers: Vec<Arc<dyn Worker>> = vec![Arc::new(w1), Arc::new(w2)];
    let token = CancellationToken::new();
    let stats = WorkerRunner::run_cycle(&workers, None, &token).await;

    assert_eq!(stats.success, 2);
    assert_eq!(peak.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn bounded_cycle_serializes_workers() {
    let (current, peak) = counters();
    let workers: Vec<Arc<dyn Worker>> = (0..4)
        .map(|i| {
            Arc::new(TestWorker::new(
                &format!("a{}", i),
                Duration::from_millis(20),
                current.clone(),
                peak.clone(),
            )) as Arc<dyn Worker>
        })
        .collect();

    let token = CancellationToken::new();
    let stats = WorkerRunner::run_cycle(&workers, Some(1), &token).await;

    assert_eq!(stats.success, 4);
    assert_eq!(peak.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_worker_does_not_abort_siblings() {
    let (current, peak) = counters();
    let workers: Vec<Arc<dyn Worker>> = vec![
        Arc::new(FailingWorker),
        Arc::new(TestWorker::new(
            "survivor",
            Duration::from_millis(10),
            current,
            peak,
        )),
    ];

    let token = CancellationToken::new();
    let stats = WorkerRunner::run_cycle(&workers, None, &token).await;

    assert_eq!(stats.success, 1);
}

#[tokio::test]
async fn cancellation_stops_sleeping_workers_promptly() {
    let (current, peak) = counters();
    let workers: Vec<Arc<dyn Worker>> = vec![Arc::new(TestWorker::new(
        "sleeper",
        Duration::from_secs(60),
        current,
        peak,
    ))];

    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let start = tokio::time::Instant::now();
    let stats = WorkerRunner::run_cycle(&workers, None, &token).await;

    assert_eq!(stats.success, 1);
    assert!(start.elapsed() < Duration::from_secs(5));
}
