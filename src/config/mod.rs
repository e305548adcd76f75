//! Configuration module for linkchecker
//!
//! Settings come from built-in defaults, an optional TOML file and
//! command-line overrides, in that order, and are validated once merged.
//!
//! # Example
//!
//! ```no_run
//! use linkchecker::config::{resolve_config, ConfigOverrides};
//! use std::path::Path;
//!
//! let overrides = ConfigOverrides {
//!     wait_secs: Some(5),
//!     ..Default::default()
//! };
//! let config = resolve_config(Some(Path::new("linkchecker.toml")), &overrides).unwrap();
//! println!("Waiting {}s between requests to one host", config.wait_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CheckerConfig, ConfigFile, TlsFloor, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, resolve_config, ConfigOverrides};
pub use validation::validate;
