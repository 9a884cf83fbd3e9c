//! Adaptive weight controller.
//!
//! # Responsibilities
//! - Blend each new score triple into the persisted EMA baselines
//! - Nudge the adaptive weights toward axes that lag their baselines
//! - Emit a normalized weight snapshot for callers
//!
//! # Design Decisions
//! - The four nudges are coupled and order-sensitive, not three independent
//!   control loops; each weight is clamped to [0.2, 3.0] immediately after
//!   each nudge
//! - One load-mutate-store per update, behind a mutex, so concurrent
//!   updates cannot interleave
//! - Reported weights are normalized by their sum; stored weights stay raw

use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::scoring::evaluator::ScoreTriple;
use crate::scoring::store::{StoreError, WeightState, WeightStore};

const LEARNING_RATE: f64 = 0.05;
const WEIGHT_FLOOR: f64 = 0.2;
const WEIGHT_CEILING: f64 = 3.0;
const NORMALIZE_EPSILON: f64 = 1e-9;

/// One value per quality axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisTriple {
    pub coherence: f64,
    pub grounding: f64,
    pub illumination: f64,
}

/// Result of one calibration update.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeightSnapshot {
    /// Weights normalized to sum to 1.
    pub weights: AxisTriple,
    /// Raw EMA baselines after the update.
    pub ema: AxisTriple,
    /// Unix seconds of the update.
    pub updated_at: f64,
}

/// Controller owning the persisted calibration row.
#[derive(Debug)]
pub struct WeightController<S: WeightStore> {
    store: Mutex<S>,
    alpha: f64,
}

impl<S: WeightStore> WeightController<S> {
    /// `alpha` is the EMA smoothing factor in (0, 1].
    pub fn new(store: S, alpha: f64) -> Self {
        Self {
            store: Mutex::new(store),
            alpha,
        }
    }

    fn store(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fold a new score triple into the baselines and weights, persist the
    /// row, and return the normalized snapshot.
    pub fn update(&self, scores: ScoreTriple) -> Result<WeightSnapshot, StoreError> {
        let mut store = self.store();
        let mut row = store.load()?;

        // Baselines first; the deltas below read the updated values.
        row.ema_coherence = blend(row.ema_coherence, scores.coherence, self.alpha);
        row.ema_grounding = blend(row.ema_grounding, scores.grounding, self.alpha);
        row.ema_illumination = blend(row.ema_illumination, scores.illumination, self.alpha);

        let delta_c = scores.coherence - row.ema_coherence;
        let delta_g = scores.grounding - row.ema_grounding;
        let delta_i = scores.illumination - row.ema_illumination;

        let lr = LEARNING_RATE;

        // Coherence below baseline reads as destabilizing: pull up coherence
        // and grounding weight.
        row.w_coherence = clamp_weight(row.w_coherence + (-delta_c) * lr);
        row.w_grounding = clamp_weight(row.w_grounding + (-delta_c) * (lr / 2.0));

        // Grounding above baseline reads as over-caution: nudge illumination.
        row.w_illumination = clamp_weight(row.w_illumination + delta_g * lr);

        // Illumination lagging reinforces coherence weight, on top of the
        // value already nudged above.
        row.w_coherence = clamp_weight(row.w_coherence + (-delta_i) * (lr / 3.0));

        row.updated_at = unix_now();
        store.store(&row)?;

        Ok(snapshot_of(&row))
    }

    /// Read the raw persisted row without mutating it.
    pub fn current(&self) -> Result<WeightState, StoreError> {
        self.store().load()
    }
}

fn blend(prev: f64, new: f64, alpha: f64) -> f64 {
    alpha * new + (1.0 - alpha) * prev
}

fn clamp_weight(w: f64) -> f64 {
    w.clamp(WEIGHT_FLOOR, WEIGHT_CEILING)
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

fn snapshot_of(row: &WeightState) -> WeightSnapshot {
    let total = (row.w_coherence + row.w_grounding + row.w_illumination).max(NORMALIZE_EPSILON);
    WeightSnapshot {
        weights: AxisTriple {
            coherence: row.w_coherence / total,
            grounding: row.w_grounding / total,
            illumination: row.w_illumination / total,
        },
        ema: AxisTriple {
            coherence: row.ema_coherence,
            grounding: row.ema_grounding,
            illumination: row.ema_illumination,
        },
        updated_at: row.updated_at,
    }
}
