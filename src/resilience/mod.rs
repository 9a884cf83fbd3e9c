//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the model endpoint:
//!     → circuit_breaker.rs (gate: skip the network entirely while open)
//!     → per-attempt timeout on the request itself
//!     → On failure: backoff.rs (growing delay between attempts)
//! ```
//!
//! # Design Decisions
//! - Every outbound attempt has its own deadline; there is no overall
//!   deadline spanning the whole retry sequence
//! - All failure causes (transport, timeout, bad status, bad body) are
//!   retried identically
//! - The breaker is shared state owned by the client, not an ambient global

pub mod backoff;
pub mod circuit_breaker;

pub use backoff::BackoffSchedule;
pub use circuit_breaker::CircuitBreaker;
