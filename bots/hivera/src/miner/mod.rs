//! The per-account mining worker.
//!
//! One `run_cycle` call walks the account through fetch, mining, and
//! cooldown. The orchestrator in `main.rs` restarts cycles forever; the
//! worker itself never loops past its cooldown.

use crate::api::{HiveraApi, MiningApi, UNKNOWN_USER};
use crate::config::HiveraConfig;
use anyhow::Result;
use async_trait::async_trait;
use core_logic::{with_retry, ProxyConfig, ProxyManager, RetryConfig, Worker, WorkerStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Knobs for one mining cycle, derived from [`HiveraConfig`].
#[derive(Debug, Clone)]
pub struct MinerSettings {
    pub power_threshold: f64,
    pub mine_interval: Duration,
    pub cooldown: Duration,
    pub contribute_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl From<&HiveraConfig> for MinerSettings {
    fn from(config: &HiveraConfig) -> Self {
        Self {
            power_threshold: config.power_threshold,
            mine_interval: Duration::from_secs(config.mine_interval_secs),
            cooldown: Duration::from_secs(config.cooldown_secs),
            contribute_retries: config.contribute_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        }
    }
}

/// Mining continues only while power is strictly above the threshold.
pub fn should_mine(power: f64, threshold: f64) -> bool {
    power > threshold
}

pub struct HiveraMiner {
    account: String,
    label: String,
    proxy: Option<ProxyConfig>,
    api: Arc<dyn MiningApi>,
    settings: MinerSettings,
}

impl HiveraMiner {
    pub fn new(
        account: String,
        proxy: Option<ProxyConfig>,
        api: Arc<dyn MiningApi>,
        settings: MinerSettings,
    ) -> Self {
        let label = account_label(&account);
        Self {
            account,
            label,
            proxy,
            api,
            settings,
        }
    }

    /// Builds a miner with its own proxy-bound HTTP client. A broken
    /// proxy fails only this account's construction.
    pub fn from_config(
        config: &HiveraConfig,
        account: String,
        proxy: Option<ProxyConfig>,
    ) -> Result<Self> {
        let client = ProxyManager::build_client(
            proxy.as_ref(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let api = Arc::new(HiveraApi::new(config.base_url.clone(), client));
        Ok(Self::new(account, proxy, api, MinerSettings::from(config)))
    }

    fn proxy_label(&self) -> &str {
        self.proxy.as_ref().map(|p| p.label()).unwrap_or("None")
    }

    /// Races a sleep against the cancellation token. Returns false when
    /// cancelled.
    async fn pause(&self, duration: Duration, token: &CancellationToken) -> bool {
        tokio::select! {
            _ = token.cancelled() => false,
            _ = sleep(duration) => true,
        }
    }
}

fn account_label(account: &str) -> String {
    let prefix: String = account.chars().take(12).collect();
    if account.chars().count() > 12 {
        format!("{}..", prefix)
    } else {
        prefix
    }
}

#[async_trait]
impl Worker for HiveraMiner {
    fn name(&self) -> &str {
        &self.label
    }

    async fn run_cycle(&self, token: CancellationToken) -> Result<WorkerStats> {
        let mut stats = WorkerStats::default();
        if token.is_cancelled() {
            return Ok(stats);
        }

        // Referral ping: the body is discarded and, unlike the other
        // calls, a non-2xx status does not abort the cycle. Kept to
        // match the service's expected call sequence.
        match self.api.fetch_referral(&self.account).await {
            Ok(status) if !status.is_success() => {
                debug!("Referral endpoint returned {} for {}", status, self.label);
            }
            Ok(_) => {}
            Err(e) => warn!("Referral request failed for {}: {:#}", self.label, e),
        }

        let username = match self.api.authenticate(&self.account).await {
            Ok(response) => response.username(),
            Err(e) => {
                error!("Auth failed for {}: {:#}", self.label, e);
                UNKNOWN_USER.to_string()
            }
        };

        let (hivera, mut power) = match self.api.fetch_power(&self.account).await {
            Ok(response) => (response.hivera(), response.power()),
            Err(e) => {
                error!("Fetching power failed for {}: {:#}", self.label, e);
                (0.0, 0.0)
            }
        };

        info!(
            "Username: {} | Hivera: {} | Power: {} | Proxy: {}",
            username,
            hivera,
            power,
            self.proxy_label()
        );

        while should_mine(power, self.settings.power_threshold) {
            if token.is_cancelled() {
                return Ok(stats);
            }

            let retry = RetryConfig::new(
                self.settings.contribute_retries,
                self.settings.retry_base_delay_ms,
            );
            match with_retry(retry, "contribute", || self.api.contribute(&self.account)).await {
                Ok(response) => {
                    stats.success += 1;
                    info!("Mining successful for user: {}", username);
                    if let Some(profile) = response.profile() {
                        info!("{:?}", profile);
                    }
                    power = response.power();

                    if !self.pause(self.settings.mine_interval, &token).await {
                        return Ok(stats);
                    }
                }
                Err(e) => {
                    // Backoff already happened inside the retry helper;
                    // a still-failing contribute ends the mining phase
                    // instead of spinning on the endpoint.
                    stats.failed += 1;
                    error!("Contribute failed for user {}: {:#}", username, e);
                    break;
                }
            }
        }

        warn!(
            "User {} does not have enough power to mine. Cooling down for {} minutes.",
            username,
            self.settings.cooldown.as_secs() / 60
        );
        self.pause(self.settings.cooldown, &token).await;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_gate_is_strict() {
        assert!(!should_mine(500.0, 500.0));
        assert!(should_mine(501.0, 500.0));
        assert!(should_mine(500.1, 500.0));
        assert!(!should_mine(0.0, 500.0));
    }

    #[test]
    fn long_accounts_are_truncated_in_labels() {
        assert_eq!(account_label("short"), "short");
        let label = account_label("query_id=AAF4gOp2AAAAAPiA6naIFI0X");
        assert_eq!(label, "query_id=AAF..");
    }
}
