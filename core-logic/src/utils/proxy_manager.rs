use crate::config::ProxyConfig;
use crate::error::NetworkError;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use super::accounts::read_lines;

pub struct ProxyManager;

impl ProxyManager {
    /// Loads proxies from a line-oriented text file.
    /// Accepted formats per line:
    ///   - full URI: `http://host:port` (credentials may be embedded)
    ///   - `ip:port` or `ip:port:username:password`
    ///
    /// Never fails: a missing or unreadable file logs and yields an
    /// empty list, which means "run without proxies".
    pub fn load_proxies(path: &Path) -> Vec<ProxyConfig> {
        let lines = match read_lines(path) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Error reading proxy file: {}. Running without proxies.", e);
                return Vec::new();
            }
        };

        let mut proxies = Vec::new();
        for line in lines {
            match parse_proxy_line(&line) {
                Some(proxy) => proxies.push(proxy),
                None => warn!("Skipping invalid proxy line: {}", line),
            }
        }

        if proxies.is_empty() {
            warn!("No proxies found in {}.", path.display());
        } else {
            info!("Loaded {} proxies from {}.", proxies.len(), path.display());
        }
        proxies
    }

    /// Deterministic round-robin assignment: account `index` gets
    /// `proxies[index % len]`, or no proxy when the list is empty.
    pub fn assign(proxies: &[ProxyConfig], index: usize) -> Option<ProxyConfig> {
        if proxies.is_empty() {
            None
        } else {
            Some(proxies[index % proxies.len()].clone())
        }
    }

    /// Builds an HTTP client bound to the given proxy (direct when `None`),
    /// with an explicit bounded request timeout.
    pub fn build_client(
        proxy: Option<&ProxyConfig>,
        timeout: Duration,
    ) -> Result<reqwest::Client, NetworkError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Some(conf) = proxy {
            let mut p = reqwest::Proxy::all(&conf.url).map_err(|e| NetworkError::ProxyBuild {
                url: conf.url.clone(),
                reason: e.to_string(),
            })?;
            if let (Some(u), Some(pw)) = (&conf.username, &conf.password) {
                p = p.basic_auth(u, pw);
            }
            builder = builder.proxy(p);
        }

        builder.build().map_err(|e| NetworkError::ProxyBuild {
            url: proxy.map(|c| c.url.clone()).unwrap_or_else(|| "direct".to_string()),
            reason: e.to_string(),
        })
    }
}

fn parse_proxy_line(line: &str) -> Option<ProxyConfig> {
    // Full URI lines are stored as-is; reqwest understands embedded creds.
    if line.contains("://") {
        return Some(ProxyConfig {
            url: line.to_string(),
            username: None,
            password: None,
        });
    }

    // ip:port:user:pass -> 4 parts
    // ip:port -> 2 parts
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() < 2 {
        return None;
    }

    let url = format!("http://{}:{}", parts[0], parts[1]);
    let (username, password) = if parts.len() >= 4 {
        (Some(parts[2].to_string()), Some(parts[3].to_string()))
    } else {
        (None, None)
    };

    Some(ProxyConfig {
        url,
        username,
        password,
    })
}
