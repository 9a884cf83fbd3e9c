//! Configuration loading and validation.

use std::net::SocketAddr;
use std::path::Path;
use std::{env, fs};

use thiserror::Error;
use url::Url;

use crate::config::schema::ArbiterConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ArbiterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ArbiterConfig = toml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Apply environment overrides for the values the original deployment set
/// via its environment: endpoint URLs and the API key.
pub fn apply_env_overrides(config: &mut ArbiterConfig) {
    if let Ok(url) = env::var("MODEL_URL") {
        if !url.is_empty() {
            config.model.url = url;
        }
    }
    if let Ok(url) = env::var("NEST_URL") {
        if !url.is_empty() {
            config.nest.url = Some(url);
        }
    }
    if let Ok(key) = env::var("ARBITER_API_KEY") {
        config.server.api_key = key;
    }
}

/// Validate the invariants the rest of the system assumes.
pub fn validate_config(config: &ArbiterConfig) -> Result<(), ConfigError> {
    config
        .server
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::Invalid(format!(
                "bad bind_address '{}': {}",
                config.server.bind_address, e
            ))
        })?;

    Url::parse(&config.model.url)
        .map_err(|e| ConfigError::Invalid(format!("bad model url '{}': {}", config.model.url, e)))?;
    if let Some(nest_url) = &config.nest.url {
        Url::parse(nest_url)
            .map_err(|e| ConfigError::Invalid(format!("bad nest url '{}': {}", nest_url, e)))?;
    }

    if config.model.request_timeout_secs <= 0.0 {
        return Err(ConfigError::Invalid(
            "model.request_timeout_secs must be positive".into(),
        ));
    }
    if config.model.retry_backoff_secs <= 0.0 {
        return Err(ConfigError::Invalid(
            "model.retry_backoff_secs must be positive".into(),
        ));
    }
    if config.breaker.max_failures == 0 {
        return Err(ConfigError::Invalid(
            "breaker.max_failures must be at least 1".into(),
        ));
    }
    if config.breaker.reset_after_secs <= 0.0 {
        return Err(ConfigError::Invalid(
            "breaker.reset_after_secs must be positive".into(),
        ));
    }
    if !(config.scoring.ema_alpha > 0.0 && config.scoring.ema_alpha <= 1.0) {
        return Err(ConfigError::Invalid(
            "scoring.ema_alpha must be in (0, 1]".into(),
        ));
    }
    if config.scoring.state_path.is_empty() {
        return Err(ConfigError::Invalid(
            "scoring.state_path must not be empty".into(),
        ));
    }
    if config.scoring.history_capacity == 0 {
        return Err(ConfigError::Invalid(
            "scoring.history_capacity must be at least 1".into(),
        ));
    }

    Ok(())
}
