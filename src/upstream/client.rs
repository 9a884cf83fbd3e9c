//! Resilient client for the model endpoint.
//!
//! # Responsibilities
//! - Gate every call through the shared circuit breaker
//! - Retry failed attempts with growing backoff and a per-attempt timeout
//! - Extract the generated text from a loosely-shaped JSON body
//!
//! # Design Decisions
//! - `call` is infallible at the boundary: the reply is either generated
//!   text or one of two literal fallbacks, never an error
//! - Failure causes are not special-cased; transport errors, timeouts,
//!   bad statuses and unparseable bodies all retry identically
//! - The backoff sleep runs after every failed attempt, including the last

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;

use crate::config::ModelConfig;
use crate::resilience::{BackoffSchedule, CircuitBreaker};

/// Fallback returned without any network attempt while the breaker is open.
pub const CIRCUIT_OPEN_TEXT: &str = "[Model temporarily unavailable (circuit open)]";

/// Fallback returned once every attempt has failed.
pub const EXHAUSTED_TEXT: &str = "[Model temporarily unavailable — imagination mode engaged]";

/// Outcome of one `call`. The two fallback cases carry no payload; their
/// literal texts are the wire contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    /// Genuine upstream content.
    Generated(String),
    /// Short-circuited before any network attempt.
    CircuitOpen,
    /// All attempts failed.
    Exhausted,
}

impl ModelReply {
    /// Collapse to the text handed to downstream consumers.
    pub fn into_text(self) -> String {
        match self {
            ModelReply::Generated(text) => text,
            ModelReply::CircuitOpen => CIRCUIT_OPEN_TEXT.to_owned(),
            ModelReply::Exhausted => EXHAUSTED_TEXT.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ModelRequest<'a> {
    prompt: &'a str,
    context: &'a str,
    session_id: &'a str,
}

/// Client for the model endpoint with retries and circuit breaking.
pub struct UpstreamClient {
    http: reqwest::Client,
    model_url: String,
    breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    retry_backoff_secs: f64,
    request_timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &ModelConfig, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            http: reqwest::Client::new(),
            model_url: config.url.clone(),
            breaker,
            max_retries: config.max_retries,
            retry_backoff_secs: config.retry_backoff_secs,
            request_timeout: Duration::from_secs_f64(config.request_timeout_secs),
        }
    }

    /// Ask the model for text. Always returns a usable reply.
    pub async fn call(&self, prompt: &str, context: &str, session_id: &str) -> ModelReply {
        if !self.breaker.allow() {
            tracing::warn!(session_id, "circuit open, skipping model call");
            return ModelReply::CircuitOpen;
        }

        let payload = ModelRequest {
            prompt,
            context,
            session_id,
        };
        let mut backoff = BackoffSchedule::new(self.retry_backoff_secs);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.attempt(&payload).await {
                Ok(text) => {
                    self.breaker.record_success();
                    return ModelReply::Generated(text);
                }
                Err(e) => {
                    self.breaker.record_failure();
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "model call failed"
                    );
                    last_error = Some(e);
                    tokio::time::sleep(backoff.next_delay()).await;
                }
            }
        }

        if let Some(e) = last_error {
            tracing::warn!(error = %e, "model unreachable after retries");
        }
        ModelReply::Exhausted
    }

    async fn attempt(&self, payload: &ModelRequest<'_>) -> Result<String, reqwest::Error> {
        let response = self
            .http
            .post(&self.model_url)
            .header(ACCEPT, "application/json")
            .json(payload)
            .timeout(self.request_timeout)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        Ok(extract_text(body))
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("model_url", &self.model_url)
            .field("max_retries", &self.max_retries)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// A JSON object yields its `response` string field (empty if absent);
/// any other body is stringified.
fn extract_text(body: Value) -> String {
    match body {
        Value::Object(map) => map
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}
