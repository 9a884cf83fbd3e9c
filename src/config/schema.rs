//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML config
//! files; defaults carry the arbiter's reference constants.

use serde::{Deserialize, Serialize};

/// Root configuration for the arbiter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Inbound HTTP settings.
    pub server: ServerConfig,

    /// Model endpoint and retry settings.
    pub model: ModelConfig,

    /// Circuit breaker thresholds.
    pub breaker: BreakerConfig,

    /// Scoring and adaptation constants.
    pub scoring: ScoringConfig,

    /// Optional nest context service.
    pub nest: NestConfig,
}

/// Inbound HTTP settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8090").
    pub bind_address: String,

    /// Inbound request timeout. Must exceed the worst-case retry sequence
    /// of a model call, since /ask blocks on it.
    pub request_timeout_secs: u64,

    /// API key required in `x-api-key` on /ask. Empty disables the check.
    pub api_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8090".to_string(),
            request_timeout_secs: 60,
            api_key: String::new(),
        }
    }
}

/// Model endpoint and retry settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model endpoint URL.
    pub url: String,

    /// Additional attempts after the first (total tries = max_retries + 1).
    pub max_retries: u32,

    /// Per-attempt timeout in seconds.
    pub request_timeout_secs: f64,

    /// Initial backoff between attempts; grows by 1.6 per failure.
    pub retry_backoff_secs: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: "https://mythos-model.onrender.com/ask".to_string(),
            max_retries: 2,
            request_timeout_secs: 12.0,
            retry_backoff_secs: 1.2,
        }
    }
}

/// Circuit breaker thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures before the breaker opens.
    pub max_failures: u32,

    /// Cool-down in seconds before the post-open probe is allowed.
    pub reset_after_secs: f64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: 3,
            reset_after_secs: 15.0,
        }
    }
}

/// Scoring and adaptation constants.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// EMA smoothing factor, in (0, 1].
    pub ema_alpha: f64,

    /// Path of the persisted weight state document.
    pub state_path: String,

    /// Recent interactions retained for the dashboard.
    pub history_capacity: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ema_alpha: 0.15,
            state_path: "arbiter_weights.json".to_string(),
            history_capacity: 10,
        }
    }
}

/// Optional nest context service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NestConfig {
    /// Base URL of the nest service; absent disables context lookup.
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_reference_constants() {
        let config = ArbiterConfig::default();
        assert_eq!(config.scoring.ema_alpha, 0.15);
        assert_eq!(config.model.max_retries, 2);
        assert_eq!(config.model.retry_backoff_secs, 1.2);
        assert_eq!(config.model.request_timeout_secs, 12.0);
        assert_eq!(config.breaker.max_failures, 3);
        assert_eq!(config.breaker.reset_after_secs, 15.0);
        assert!(config.server.api_key.is_empty());
        assert!(config.nest.url.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ArbiterConfig = toml::from_str(
            r#"
            [model]
            url = "http://localhost:9000/ask"
            max_retries = 1

            [server]
            api_key = "secret"
            "#,
        )
        .expect("parse");

        assert_eq!(config.model.url, "http://localhost:9000/ask");
        assert_eq!(config.model.max_retries, 1);
        assert_eq!(config.model.retry_backoff_secs, 1.2);
        assert_eq!(config.server.api_key, "secret");
        assert_eq!(config.breaker.max_failures, 3);
    }
}
