//! API-key guard for the ask endpoint.
//!
//! An empty configured key disables the check entirely.

use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};

/// Validate the `x-api-key` header against the configured key.
pub fn check_key(expected: &str, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    if expected.is_empty() {
        return Ok(());
    }

    let presented = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if presented == Some(expected) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid API key" })),
        ))
    }
}
