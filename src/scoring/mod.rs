//! Triadic scoring and adaptive weighting.
//!
//! # Data Flow
//! ```text
//! generated text
//!     → evaluator.rs (pure heuristic → ScoreTriple)
//!     → controller.rs (EMA baselines + bounded weight nudges)
//!     → store.rs (atomic load-mutate-store of the one WeightState row)
//! history.rs keeps the in-memory interaction log for /metrics and /dashboard
//! ```
//!
//! # Design Decisions
//! - The evaluator is total and pure; it has no error path
//! - The weight update is one critical section per call so concurrent
//!   updates cannot interleave and drop a nudge
//! - Persistence failure is fatal, never silently defaulted: the stored row
//!   is the single authoritative calibration state

pub mod controller;
pub mod evaluator;
pub mod history;
pub mod store;

pub use controller::{AxisTriple, WeightController, WeightSnapshot};
pub use evaluator::{evaluate, ScoreTriple};
pub use history::{Interaction, InteractionLog};
pub use store::{JsonFileStore, MemoryStore, StoreError, WeightState, WeightStore};
