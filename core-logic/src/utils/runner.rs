use crate::traits::{Worker, WorkerStats};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument};

pub struct WorkerRunner;

impl WorkerRunner {
    /// Creates a shutdown token and spawns a background listener that
    /// cancels it on Ctrl+C. The orchestrator and every worker sleep
    /// race this token so shutdown is prompt.
    pub fn shutdown_token() -> CancellationToken {
        let token = CancellationToken::new();
        let cloned_token = token.clone();

        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C. Initiating graceful shutdown...");
                    cloned_token.cancel();
                }
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                }
            }
        });

        token
    }

    /// Runs every worker's cycle concurrently and waits for all of them
    /// (fan-out/fan-in, unordered completion). `max_concurrency` bounds
    /// the number of in-flight cycles; `None` means unbounded.
    ///
    /// A failing worker is logged and never aborts its siblings.
    pub async fn run_cycle(
        workers: &[Arc<dyn Worker>],
        max_concurrency: Option<usize>,
        token: &CancellationToken,
    ) -> WorkerStats {
        let mut set = JoinSet::new();
        let semaphore = max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));

        let start_time = std::time::Instant::now();
        info!("Starting cycle for {} workers...", workers.len());

        for (i, worker) in workers.iter().enumerate() {
            let id = i + 1;
            let worker = Arc::clone(worker);
            let child_token = token.clone();
            let semaphore = semaphore.clone();
            let span = tracing::info_span!("worker", worker_id = format!("{:03}", id));

            set.spawn(
                async move {
                    let _permit = match semaphore {
                        Some(s) => match s.acquire_owned().await {
                            Ok(permit) => Some(permit),
                            // Semaphore is never closed; bail out just in case.
                            Err(_) => return None,
                        },
                        None => None,
                    };

                    match worker.run_cycle(child_token).await {
                        Ok(stats) => Some(stats),
                        Err(e) => {
                            error!("Worker {} ({}) failed: {:?}", id, worker.name(), e);
                            None
                        }
                    }
                }
                .instrument(span),
            );
        }

        let mut totals = WorkerStats::default();
        while let Some(res) = set.join_next().await {
            match res {
                Ok(Some(stats)) => totals.merge(&stats),
                Ok(None) => {
                    // Already logged in the worker task
                }
                Err(e) => {
                    error!("A worker task panicked or failed to join: {:?}", e);
                }
            }
        }

        let total_duration = start_time.elapsed();
        info!(
            "Cycle complete in {:.1}s | Contributions: {} | Failed: {}",
            total_duration.as_secs_f64(),
            totals.success,
            totals.failed
        );

        totals
    }
}
