//! Outbound clients.
//!
//! `client.rs` talks to the model endpoint behind the circuit breaker and
//! retry loop; `nest.rs` does the best-effort context lookup. Both convert
//! every failure into a usable value at their boundary — nothing here
//! propagates an error to the request path.

pub mod client;
pub mod nest;

pub use client::{ModelReply, UpstreamClient};
pub use nest::NestClient;
