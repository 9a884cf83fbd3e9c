//! Persistence for the singleton calibration row.
//!
//! # Responsibilities
//! - Represent the one authoritative `WeightState` row
//! - Abstract the backing technology behind `WeightStore`
//! - Create the default row on first access
//!
//! # Design Decisions
//! - Single-key repository: exactly one row exists, mutated by every
//!   update, never deleted
//! - The file store writes via temp-file + rename so a crash mid-write
//!   cannot leave a torn row
//! - Store errors propagate; callers treat them as fatal rather than
//!   silently falling back to defaults

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The persisted calibration row: adaptive weights plus EMA baselines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightState {
    /// Adaptive weights, each held within [0.2, 3.0].
    pub w_coherence: f64,
    pub w_grounding: f64,
    pub w_illumination: f64,
    /// EMA baselines the calibration adapts to, within [0, 1] in steady state.
    pub ema_coherence: f64,
    pub ema_grounding: f64,
    pub ema_illumination: f64,
    /// Unix seconds of the last update.
    pub updated_at: f64,
}

impl Default for WeightState {
    fn default() -> Self {
        Self {
            w_coherence: 1.0,
            w_grounding: 1.0,
            w_illumination: 1.0,
            ema_coherence: 0.0,
            ema_grounding: 0.0,
            ema_illumination: 0.0,
            updated_at: 0.0,
        }
    }
}

/// Errors from the weight store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("weight store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored row is not valid JSON for a `WeightState`.
    #[error("weight store parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Atomic single-row repository for the calibration state.
///
/// `load` followed by `store` is composed into one atomic read-modify-write
/// by the caller (the controller holds the critical section).
pub trait WeightStore: Send {
    /// Load the row, creating the default row if absent.
    fn load(&mut self) -> Result<WeightState, StoreError>;

    /// Persist the full row.
    fn store(&mut self, state: &WeightState) -> Result<(), StoreError>;
}

impl WeightStore for Box<dyn WeightStore> {
    fn load(&mut self) -> Result<WeightState, StoreError> {
        (**self).load()
    }

    fn store(&mut self, state: &WeightState) -> Result<(), StoreError> {
        (**self).store(state)
    }
}

/// JSON document on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl WeightStore for JsonFileStore {
    fn load(&mut self) -> Result<WeightState, StoreError> {
        if !self.path.exists() {
            let state = WeightState::default();
            self.store(&state)?;
            tracing::info!(path = %self.path.display(), "created default weight state");
            return Ok(state);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn store(&mut self, state: &WeightState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// In-process store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Option<WeightState>,
}

impl WeightStore for MemoryStore {
    fn load(&mut self) -> Result<WeightState, StoreError> {
        Ok(self.state.clone().unwrap_or_default())
    }

    fn store(&mut self, state: &WeightState) -> Result<(), StoreError> {
        self.state = Some(state.clone());
        Ok(())
    }
}
