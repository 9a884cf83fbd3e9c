//! Circuit breaker for model endpoint protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: endpoint assumed down, calls fail fast with a fallback
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= max_failures
//! Open → Closed: cool-down elapsed (observed by allow()) or any success
//! ```
//!
//! # Design Decisions
//! - No explicit half-open state: the first allow() after the cool-down is
//!   the probe, and one success fully resets the breaker
//! - The probe is not single-flight: several callers racing through the
//!   reopening window may each attempt and each re-extend the open period
//! - A mutex guards the counters so the breaker is Sync; the check-then-act
//!   window between allow() and the record calls is tolerated
//!   (eventually-consistent breaker state)

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct BreakerInner {
    failures: u32,
    opened_at: Option<Instant>,
}

/// Consecutive-failure circuit breaker shared by all callers of one endpoint.
#[derive(Debug)]
pub struct CircuitBreaker {
    max_failures: u32,
    reset_after: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(max_failures: u32, reset_after: Duration) -> Self {
        Self {
            max_failures,
            reset_after,
            inner: Mutex::new(BreakerInner {
                failures: 0,
                opened_at: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Check whether a call may proceed.
    ///
    /// While open, returns false until `reset_after` has elapsed; the first
    /// caller to observe the elapsed cool-down resets the breaker and gets
    /// true (the implicit probe).
    pub fn allow(&self) -> bool {
        let mut inner = self.lock();
        match inner.opened_at {
            None => true,
            Some(opened_at) if opened_at.elapsed() >= self.reset_after => {
                inner.failures = 0;
                inner.opened_at = None;
                tracing::info!("circuit breaker cool-down elapsed, allowing probe");
                true
            }
            Some(_) => false,
        }
    }

    /// Record a failed call. Opens the breaker once `max_failures`
    /// consecutive failures accumulate; further failures while open keep
    /// pushing `opened_at` forward.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.failures += 1;
        if inner.failures >= self.max_failures {
            if inner.opened_at.is_none() {
                tracing::warn!(
                    failures = inner.failures,
                    max_failures = self.max_failures,
                    reset_after_secs = self.reset_after.as_secs_f64(),
                    "circuit breaker opened"
                );
            }
            inner.opened_at = Some(Instant::now());
        }
    }

    /// Record a successful call. Fully closes the breaker regardless of the
    /// prior failure count.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.failures = 0;
        inner.opened_at = None;
    }

    /// Current consecutive failure count.
    pub fn failure_count(&self) -> u32 {
        self.lock().failures
    }

    /// True while calls are being suppressed.
    pub fn is_open(&self) -> bool {
        let inner = self.lock();
        match inner.opened_at {
            Some(opened_at) => opened_at.elapsed() < self.reset_after,
            None => false,
        }
    }
}
