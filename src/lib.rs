//! Linkpulse: a friend-link liveness checker
//!
//! This crate verifies a configured list of friend links once per invocation,
//! trying direct access, an optional proxy rewrite, and a third-party status
//! API in order, then reconciles the outcomes against the previous run's
//! persisted report to track consecutive-failure streaks.

pub mod checker;
pub mod config;
pub mod report;
pub mod source;

use thiserror::Error;

/// Main error type for linkpulse operations
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Link source error: {0}")]
    Source(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in configuration: {0}")]
    InvalidUrl(String),
}

/// Result type alias for linkpulse operations
pub type Result<T> = std::result::Result<T, PulseError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use report::{BacklinkPresence, LinkStatus, RunReport, UNREACHABLE_LATENCY};
pub use source::LinkEntry;
