//! In-memory interaction log.
//!
//! # Responsibilities
//! - Record every scored exchange (prompt, response, score triple)
//! - Track the running interaction total for /metrics
//! - Keep a bounded ring of recent entries for /dashboard
//!
//! # Design Decisions
//! - The calibration row is the only durable state this core owns; the
//!   interaction log lives in process memory

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use uuid::Uuid;

use crate::scoring::evaluator::ScoreTriple;

/// One scored exchange.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub id: Uuid,
    pub prompt: String,
    pub response: String,
    pub scores: ScoreTriple,
    /// Unix seconds.
    pub created_at: f64,
}

/// Bounded ring of recent interactions plus a monotone total.
#[derive(Debug)]
pub struct InteractionLog {
    recent: Mutex<VecDeque<Interaction>>,
    total: AtomicU64,
    capacity: usize,
}

impl InteractionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            total: AtomicU64::new(0),
            capacity,
        }
    }

    fn recent(&self) -> MutexGuard<'_, VecDeque<Interaction>> {
        self.recent.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(&self, prompt: &str, response: &str, scores: ScoreTriple) -> Uuid {
        let entry = Interaction {
            id: Uuid::new_v4(),
            prompt: prompt.to_owned(),
            response: response.to_owned(),
            scores,
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs_f64(),
        };
        let id = entry.id;

        let mut recent = self.recent();
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(entry);
        self.total.fetch_add(1, Ordering::Relaxed);
        id
    }

    /// Total interactions ever recorded, not just the retained ring.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Most recent entries, newest last.
    pub fn recent_entries(&self) -> Vec<Interaction> {
        self.recent().iter().cloned().collect()
    }
}
