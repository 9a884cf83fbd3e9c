//! Best-effort context lookup against the nest service.

use std::time::Duration;

use serde_json::{json, Value};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_LIMIT: u32 = 3;

/// Client for the optional nest context service. Every failure degrades to
/// an empty match list; a broken nest never fails a request.
#[derive(Debug, Clone)]
pub struct NestClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl NestClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Whether a nest endpoint is configured at all.
    pub fn is_linked(&self) -> bool {
        self.base_url.is_some()
    }

    /// Fetch contextual passages for a prompt.
    pub async fn search(&self, query: &str) -> Vec<Value> {
        let Some(base) = &self.base_url else {
            return Vec::new();
        };
        let url = format!("{}/search", base.trim_end_matches('/'));
        let payload = json!({ "query": query, "limit": SEARCH_LIMIT });

        let response = match self
            .http
            .post(&url)
            .json(&payload)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "nest connection failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "nest returned error status");
            return Vec::new();
        }

        match response.json::<Value>().await {
            Ok(body) => body
                .get("matches")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "nest returned malformed body");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_nest_returns_empty() {
        let nest = NestClient::new(None);
        assert!(!nest.is_linked());
        assert!(nest.search("anything").await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_nest_returns_empty() {
        // Discard port on loopback, connection refused immediately.
        let nest = NestClient::new(Some("http://127.0.0.1:9".to_owned()));
        assert!(nest.is_linked());
        assert!(nest.search("anything").await.is_empty());
    }
}
