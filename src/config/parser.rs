use crate::config::types::{CheckerConfig, ConfigFile, TlsFloor};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Values given on the command line, each overriding the file setting
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub timeout_secs: Option<u64>,
    pub wait_secs: Option<u64>,
    pub user_agent: Option<String>,
    /// `--no-internal` can only switch exclusion on
    pub exclude_internal: bool,
    pub ignore_file: Option<PathBuf>,
    pub min_tls: Option<TlsFloor>,
    pub max_concurrent_hosts: Option<usize>,
}

impl ConfigOverrides {
    /// Applies every override that was given onto `config`
    pub fn apply(&self, config: &mut CheckerConfig) {
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(wait) = self.wait_secs {
            config.wait_secs = wait;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        if self.exclude_internal {
            config.exclude_internal = true;
        }
        if let Some(path) = &self.ignore_file {
            config.ignore_file = Some(path.clone());
        }
        if let Some(min_tls) = self.min_tls {
            config.min_tls = min_tls;
        }
        if let Some(max) = self.max_concurrent_hosts {
            config.max_concurrent_hosts = Some(max);
        }
    }
}

/// Loads and parses a configuration file from the given path
///
/// Keys missing from the file keep their default values.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CheckerConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<CheckerConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate(&config)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<CheckerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)?;
    Ok(file.checker)
}

/// Builds the effective configuration for a run
///
/// Starts from the file at `path` (or the defaults when there is none),
/// applies the command-line overrides and validates the result.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<CheckerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => CheckerConfig::default(),
    };

    overrides.apply(&mut config);
    validate(&config)?;

    tracing::debug!(
        "Effective configuration: timeout={}s wait={}s min-tls={} exclude-internal={}",
        config.timeout_secs,
        config.wait_secs,
        config.min_tls,
        config.exclude_internal
    );

    Ok(config)
}
