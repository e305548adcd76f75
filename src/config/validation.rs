use crate::config::types::CheckerConfig;
use crate::ConfigError;
use reqwest::header::HeaderValue;
use tokio::sync::Semaphore;

/// Validates the entire configuration
pub fn validate(config: &CheckerConfig) -> Result<(), ConfigError> {
    validate_timing(config)?;
    validate_user_agent(&config.user_agent)?;
    validate_limits(config)?;
    Ok(())
}

/// Validates timeout and wait settings
fn validate_timing(config: &CheckerConfig) -> Result<(), ConfigError> {
    // A zero wait is allowed: it disables pacing but keeps requests serialized

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates the user agent string
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if HeaderValue::from_str(user_agent).is_err() {
        return Err(ConfigError::Validation(format!(
            "user_agent is not a valid HTTP header value: '{}'",
            user_agent.escape_debug()
        )));
    }

    Ok(())
}

/// Validates queue and concurrency limits
fn validate_limits(config: &CheckerConfig) -> Result<(), ConfigError> {
    if config.queue_capacity < 1 || config.queue_capacity > Semaphore::MAX_PERMITS {
        return Err(ConfigError::Validation(format!(
            "queue_capacity must be between 1 and {}, got {}",
            Semaphore::MAX_PERMITS,
            config.queue_capacity
        )));
    }

    if let Some(max) = config.max_concurrent_hosts {
        if max < 1 || max > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Validation(format!(
                "max_concurrent_hosts must be between 1 and {}, got {}",
                Semaphore::MAX_PERMITS,
                max
            )));
        }
    }

    Ok(())
}
