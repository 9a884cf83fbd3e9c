//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (trace, request timeout)
//! - Dispatch /ask through the four arbitration phases:
//!   model call → nest lookup → scoring + logging → adaptive weighting
//!
//! # Design Decisions
//! - The model call and nest lookup never surface errors here; their
//!   boundaries already degrade to fallbacks
//! - A weight-store failure is the one condition that becomes a 500:
//!   silently defaulting would fork the calibration state

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ArbiterConfig;
use crate::http::{auth, dashboard};
use crate::resilience::CircuitBreaker;
use crate::scoring::{
    evaluate, AxisTriple, InteractionLog, ScoreTriple, WeightController, WeightStore,
};
use crate::upstream::{NestClient, UpstreamClient};

type SharedController = Arc<WeightController<Box<dyn WeightStore>>>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub nest: Arc<NestClient>,
    pub controller: SharedController,
    pub history: Arc<InteractionLog>,
    pub api_key: Arc<String>,
}

/// Request body for /ask.
#[derive(Debug, Deserialize)]
pub struct AskBody {
    pub prompt: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

fn default_session_id() -> String {
    "default".to_string()
}

/// Response body for /ask.
#[derive(Debug, Serialize)]
pub struct AskOut {
    pub final_text: String,
    pub nest_context: Vec<Value>,
    pub scores: ScoreTriple,
    pub arbitrated: bool,
    pub delta_coherence: f64,
    pub weights: AxisTriple,
    pub ema: AxisTriple,
}

/// HTTP server for the arbiter.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Wire all subsystems from configuration and the given weight store.
    pub fn new(config: &ArbiterConfig, store: Box<dyn WeightStore>) -> Self {
        let breaker = Arc::new(CircuitBreaker::new(
            config.breaker.max_failures,
            Duration::from_secs_f64(config.breaker.reset_after_secs),
        ));
        let upstream = Arc::new(UpstreamClient::new(&config.model, breaker));
        let nest = Arc::new(NestClient::new(config.nest.url.clone()));
        let controller: SharedController =
            Arc::new(WeightController::new(store, config.scoring.ema_alpha));
        let history = Arc::new(InteractionLog::new(config.scoring.history_capacity));

        let state = AppState {
            upstream,
            nest,
            controller,
            history,
            api_key: Arc::new(config.server.api_key.clone()),
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ArbiterConfig, state: AppState) -> Router {
        Router::new()
            .route("/ask", post(ask))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/dashboard", get(dashboard_page))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            // Browser frontends on other origins talk to /ask directly.
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");
        axum::serve(listener, self.router).await
    }
}

/// Four-phase arbitration: model call, nest cross-reference, triadic
/// scoring, adaptive weighting.
async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AskBody>,
) -> Result<Json<AskOut>, (StatusCode, Json<Value>)> {
    auth::check_key(&state.api_key, &headers)?;

    // Phase 1 — model response (context intentionally empty; the nest
    // result is returned alongside, not fed back into the prompt).
    let reply = state.upstream.call(&body.prompt, "", &body.session_id).await;
    let text = reply.into_text();

    // Phase 2 — cross-reference from nest.
    let nest_context = state.nest.search(&body.prompt).await;

    // Phase 3 — triadic scoring.
    let scores = evaluate(&text);
    state.history.record(&body.prompt, &text, scores);

    // Phase 4 — adaptive weighting.
    let snapshot = state.controller.update(scores).map_err(|e| {
        tracing::error!(error = %e, "weight store unavailable");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "weight store unavailable" })),
        )
    })?;

    Ok(Json(AskOut {
        final_text: text,
        nest_context,
        scores,
        arbitrated: true,
        delta_coherence: 0.0,
        weights: snapshot.weights,
        ema: snapshot.ema,
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "arbiter-ok",
        "nest_linked": state.nest.is_linked(),
    }))
}

async fn metrics(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "interactions": state.history.total() }))
}

async fn dashboard_page(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Json<Value>)> {
    let row = state.controller.current().map_err(|e| {
        tracing::error!(error = %e, "weight store unavailable");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "weight store unavailable" })),
        )
    })?;
    let recent = state.history.recent_entries();
    Ok(Html(dashboard::render(state.history.total(), &row, &recent)))
}
