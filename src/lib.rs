//! Mythos Arbiter
//!
//! An arbiter between a request-serving frontend and an unreliable model
//! endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────┐
//!                  │                 MYTHOS ARBITER                  │
//!  POST /ask       │  ┌────────┐   ┌───────────┐   ┌─────────────┐  │
//!  ────────────────┼─▶│  http  │──▶│ upstream  │──▶│ resilience  │──┼──▶ Model
//!                  │  │ server │   │  client   │   │ breaker +   │  │    Endpoint
//!                  │  └───┬────┘   └───────────┘   │ retry/back- │  │
//!                  │      │                        │ off         │  │
//!                  │      │                        └─────────────┘  │
//!                  │      ▼                                          │
//!                  │  ┌─────────┐   ┌────────────┐   ┌───────────┐  │
//!  JSON response   │  │ scoring │──▶│ weight     │──▶│ weight    │  │
//!  ◀───────────────┼──│evaluator│   │ controller │   │ store     │  │
//!                  │  └─────────┘   └────────────┘   └───────────┘  │
//!                  │                                                 │
//!                  │  Cross-cutting: config, tracing, nest lookup    │
//!                  └────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod resilience;
pub mod scoring;
pub mod upstream;

pub use config::ArbiterConfig;
pub use http::HttpServer;
pub use resilience::CircuitBreaker;
pub use scoring::{evaluate, ScoreTriple, WeightController};
pub use upstream::{ModelReply, UpstreamClient};
