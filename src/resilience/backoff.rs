//! Geometric backoff between retry attempts.

use std::time::Duration;

/// Growth factor applied to the delay after every failed attempt.
const GROWTH_FACTOR: f64 = 1.6;

/// Produces the retry delay sequence: initial, initial*1.6, initial*1.6², ...
///
/// Deterministic by contract — the reference sequence carries no jitter.
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    next_secs: f64,
}

impl BackoffSchedule {
    pub fn new(initial_secs: f64) -> Self {
        Self {
            next_secs: initial_secs,
        }
    }

    /// Take the current delay and advance the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs_f64(self.next_secs.max(0.0));
        self.next_secs *= GROWTH_FACTOR;
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_sequence() {
        let mut schedule = BackoffSchedule::new(1.2);
        assert_eq!(schedule.next_delay(), Duration::from_secs_f64(1.2));
        assert_eq!(schedule.next_delay(), Duration::from_secs_f64(1.2 * 1.6));
        assert_eq!(
            schedule.next_delay(),
            Duration::from_secs_f64(1.2 * 1.6 * 1.6)
        );
    }

    #[test]
    fn test_zero_initial_stays_zero() {
        let mut schedule = BackoffSchedule::new(0.0);
        assert_eq!(schedule.next_delay(), Duration::ZERO);
        assert_eq!(schedule.next_delay(), Duration::ZERO);
    }
}
