use serde::{Deserialize, Serialize};

/// One upstream proxy endpoint, normalized from a `proxies.txt` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Label safe for log lines (credentials are never printed).
    pub fn label(&self) -> &str {
        &self.url
    }
}
