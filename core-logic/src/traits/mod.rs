use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Per-cycle counters returned by a worker and aggregated by the runner.
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    pub success: u64,
    pub failed: u64,
}

impl WorkerStats {
    pub fn merge(&mut self, other: &WorkerStats) {
        self.success += other.success;
        self.failed += other.failed;
    }
}

#[async_trait]
pub trait Worker: Send + Sync {
    /// Short identifier used in log lines (never a full credential)
    fn name(&self) -> &str;

    /// Runs one full cycle for this worker and returns its counters.
    /// The outer loop is owned by the orchestrator; a single call must
    /// terminate on its own or when the token is cancelled.
    async fn run_cycle(&self, cancellation_token: CancellationToken) -> Result<WorkerStats>;
}
