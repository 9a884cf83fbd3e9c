//! Heuristic triadic evaluator.
//!
//! Scores a piece of generated text on three quality axes, each in [0, 1]:
//! - coherence: punctuation density as a structural-consistency proxy
//! - grounding: length as a substantiation proxy
//! - illumination: lexical diversity
//!
//! Deliberately a placeholder heuristic, but its exact constants are the
//! behavioral contract: downstream calibration is tuned against them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One evaluation result. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub coherence: f64,
    pub grounding: f64,
    pub illumination: f64,
}

/// Score a piece of text. Pure and total; empty input yields the base
/// scores (0.4, 0.3, 0.3).
pub fn evaluate(text: &str) -> ScoreTriple {
    let n = text.trim().chars().count();
    let punctuation = text
        .chars()
        .filter(|&c| matches!(c, '.' | '!' | '?'))
        .count();
    let lowered = text.to_lowercase();
    let distinct_tokens: HashSet<&str> = lowered.split_whitespace().collect();

    // Division guard: empty text must not divide by zero.
    let guard = n.max(1) as f64;

    ScoreTriple {
        coherence: clamp01(0.4 + ((punctuation as f64 / guard) * 25.0).min(0.5)),
        grounding: clamp01(0.3 + (n as f64 / 8000.0).min(0.5)),
        illumination: clamp01(0.3 + ((distinct_tokens.len() as f64 / guard) * 12.0).min(0.6)),
    }
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
