use crate::error::ConfigError;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

pub struct AccountManager;

impl AccountManager {
    /// Loads account credentials from a line-oriented text file.
    /// One credential per line; lines are trimmed, blank lines and
    /// `#` comments are skipped, order is preserved.
    ///
    /// Never fails: a missing or unreadable file logs and yields an
    /// empty list. The caller decides whether that is fatal.
    pub fn load_accounts(path: &Path) -> Vec<String> {
        match read_lines(path) {
            Ok(accounts) => {
                if accounts.is_empty() {
                    warn!("No accounts found in {}.", path.display());
                } else {
                    info!("Loaded {} accounts from {}.", accounts.len(), path.display());
                }
                accounts
            }
            Err(e) => {
                error!("Error reading account file: {}", e);
                Vec::new()
            }
        }
    }
}

/// Shared line-list reader for accounts and proxies.
pub(crate) fn read_lines(path: &Path) -> Result<Vec<String>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        msg: e.to_string(),
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
