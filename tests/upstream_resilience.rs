//! Failure injection tests for the upstream model client.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mythos_arbiter::config::ModelConfig;
use mythos_arbiter::upstream::client::{CIRCUIT_OPEN_TEXT, EXHAUSTED_TEXT};
use mythos_arbiter::{CircuitBreaker, ModelReply, UpstreamClient};

mod common;

fn test_model_config(addr: std::net::SocketAddr) -> ModelConfig {
    ModelConfig {
        url: format!("http://{}/ask", addr),
        max_retries: 2,
        request_timeout_secs: 2.0,
        retry_backoff_secs: 0.01,
    }
}

fn test_breaker() -> Arc<CircuitBreaker> {
    Arc::new(CircuitBreaker::new(3, Duration::from_secs(15)))
}

#[tokio::test]
async fn test_success_extracts_response_field() {
    let addr = common::start_model_backend(|| async {
        (200, r#"{"response": "the oracle speaks"}"#.to_string())
    })
    .await;

    let breaker = test_breaker();
    let client = UpstreamClient::new(&test_model_config(addr), breaker.clone());

    let reply = client.call("what now?", "", "s1").await;
    assert_eq!(reply, ModelReply::Generated("the oracle speaks".into()));
    assert_eq!(breaker.failure_count(), 0);
}

#[tokio::test]
async fn test_non_object_body_is_stringified() {
    let addr =
        common::start_model_backend(|| async { (200, r#""bare string body""#.to_string()) }).await;

    let client = UpstreamClient::new(&test_model_config(addr), test_breaker());
    let reply = client.call("p", "", "s1").await;
    assert_eq!(reply, ModelReply::Generated("bare string body".into()));
}

#[tokio::test]
async fn test_exhausted_retries_hit_backend_exactly_max_plus_one_times() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_seen = calls.clone();
    let addr = common::start_model_backend(move || {
        let calls = calls_seen.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            (503, "Service Unavailable".to_string())
        }
    })
    .await;

    let breaker = test_breaker();
    let client = UpstreamClient::new(&test_model_config(addr), breaker.clone());

    let reply = client.call("p", "", "s1").await;
    assert_eq!(reply, ModelReply::Exhausted);
    assert_eq!(reply.into_text(), EXHAUSTED_TEXT);
    assert_eq!(calls.load(Ordering::SeqCst), 3, "max_retries + 1 attempts");
    assert_eq!(breaker.failure_count(), 3);
}

#[tokio::test]
async fn test_malformed_body_counts_as_failure() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_seen = calls.clone();
    let addr = common::start_model_backend(move || {
        let calls = calls_seen.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            (200, "this is not json".to_string())
        }
    })
    .await;

    let breaker = test_breaker();
    let client = UpstreamClient::new(&test_model_config(addr), breaker.clone());

    assert_eq!(client.call("p", "", "s1").await, ModelReply::Exhausted);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_open_breaker_skips_the_network() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_seen = calls.clone();
    let addr = common::start_model_backend(move || {
        let calls = calls_seen.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            (200, r#"{"response": "never seen"}"#.to_string())
        }
    })
    .await;

    let breaker = test_breaker();
    for _ in 0..3 {
        breaker.record_failure();
    }
    assert!(breaker.is_open());

    let client = UpstreamClient::new(&test_model_config(addr), breaker);
    let reply = client.call("p", "", "s1").await;
    assert_eq!(reply, ModelReply::CircuitOpen);
    assert_eq!(reply.into_text(), CIRCUIT_OPEN_TEXT);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "no network attempt");
}

#[tokio::test]
async fn test_success_after_transient_failures_closes_breaker() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_seen = calls.clone();
    let addr = common::start_model_backend(move || {
        let calls = calls_seen.clone();
        async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                (502, "Bad Gateway".to_string())
            } else {
                (200, r#"{"response": "recovered"}"#.to_string())
            }
        }
    })
    .await;

    let breaker = test_breaker();
    let client = UpstreamClient::new(&test_model_config(addr), breaker.clone());

    let reply = client.call("p", "", "s1").await;
    assert_eq!(reply, ModelReply::Generated("recovered".into()));
    assert_eq!(breaker.failure_count(), 0, "success fully resets the breaker");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_per_attempt_timeout_is_a_failure() {
    let addr = common::start_model_backend(|| async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        (200, r#"{"response": "too late"}"#.to_string())
    })
    .await;

    let breaker = test_breaker();
    let config = ModelConfig {
        request_timeout_secs: 0.1,
        max_retries: 0,
        ..test_model_config(addr)
    };
    let client = UpstreamClient::new(&config, breaker.clone());

    assert_eq!(client.call("p", "", "s1").await, ModelReply::Exhausted);
    assert_eq!(breaker.failure_count(), 1);
}
