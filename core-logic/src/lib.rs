//! # Core Logic - Shared Utilities for the Bot Framework
//!
//! This crate provides shared utilities used across all bot implementations.
//! It includes account/proxy loading, worker orchestration, configuration, and more.
//!
//! ## Modules
//!
//! - [`config`] - Configuration structures shared by bot crates
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions
//! - [`utils`] - Utility modules (accounts, proxies, retry, runner)

// Module declarations - internal modules marked pub(crate)
pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

// Selective exports - only public API types
pub use config::ProxyConfig;
pub use error::{ConfigError, CoreError, NetworkError};
pub use traits::{Worker, WorkerStats};

// Utils are pub(crate) - only export specific public utilities
pub use utils::{setup_logger, AccountManager, ProxyManager, WorkerRunner};

// Export retry utilities for bot crates and testing
pub use utils::retry::{with_retry, RetryConfig};
