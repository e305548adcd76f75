//! linkchecker: a polite hyperlink checker
//!
//! This crate extracts the links of an HTML document (fetched from a URL or
//! read from a local file) and checks that each one is reachable, running one
//! serialized, rate-limited worker per destination host so that no single
//! server sees concurrent or rapid requests.

pub mod checker;
pub mod config;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for linkchecker operations
///
/// Every variant is fatal to the run and raised before scheduling starts.
/// Per-link failures are never errors; they are reported as
/// [`checker::FetchOutcome`] values.
#[derive(Debug, Error)]
pub enum LinkCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read input file {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to fetch page {url}: {source}")]
    FetchPage { url: String, source: reqwest::Error },

    #[error("Input is neither a readable file nor a valid URL: {input} ({source})")]
    InvalidInput {
        input: String,
        source: ::url::ParseError,
    },

    #[error("Failed to load ignore hosts file {path}: {source}")]
    IgnoreFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for linkchecker operations
pub type Result<T> = std::result::Result<T, LinkCheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use checker::{check_source, run_checks, FetchOutcome, LinkSource};
pub use config::CheckerConfig;
pub use output::{CheckSummary, OutcomeSink};
pub use url::{HostKey, IgnoreSet, Link, LinkNormalizer};
