use anyhow::Result;
use config::{Config, File};
use serde::Deserialize;

/// Bot configuration loaded from a TOML file. Every field has a
/// default matching the live service, so a missing or partial file
/// still yields a working setup.
#[derive(Debug, Clone, Deserialize)]
pub struct HiveraConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_proxies_file")]
    pub proxies_file: String,
    /// Mining continues only while POWER is strictly above this value.
    #[serde(default = "default_power_threshold")]
    pub power_threshold: f64,
    #[serde(default = "default_mine_interval_secs")]
    pub mine_interval_secs: u64,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Retries per contribute call before the account falls through to
    /// cooldown.
    #[serde(default = "default_contribute_retries")]
    pub contribute_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Caps concurrently running accounts; unbounded when unset.
    #[serde(default)]
    pub worker_amount: Option<usize>,
}

fn default_base_url() -> String {
    "https://api.hivera.org/".to_string()
}

fn default_users_file() -> String {
    "users.txt".to_string()
}

fn default_proxies_file() -> String {
    "proxies.txt".to_string()
}

fn default_power_threshold() -> f64 {
    500.0
}

fn default_mine_interval_secs() -> u64 {
    30
}

fn default_cooldown_secs() -> u64 {
    60 * 60
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_contribute_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

impl Default for HiveraConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            users_file: default_users_file(),
            proxies_file: default_proxies_file(),
            power_threshold: default_power_threshold(),
            mine_interval_secs: default_mine_interval_secs(),
            cooldown_secs: default_cooldown_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            contribute_retries: default_contribute_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            worker_amount: None,
        }
    }
}

impl HiveraConfig {
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_live_service() {
        let config = HiveraConfig::default();
        assert_eq!(config.base_url, "https://api.hivera.org/");
        assert_eq!(config.power_threshold, 500.0);
        assert_eq!(config.mine_interval_secs, 30);
        assert_eq!(config.cooldown_secs, 3600);
        assert!(config.worker_amount.is_none());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = HiveraConfig::load("no-such-config").unwrap();
        assert_eq!(config.users_file, "users.txt");
        assert_eq!(config.proxies_file, "proxies.txt");
        assert_eq!(config.request_timeout_secs, 30);
    }
}
