//! Bounded polling for motion completion.
//!
//! Startup homing, shake oscillation and the shutdown park all wait on driver
//! status flags the same way: evaluate, sleep, repeat, give up after a fixed
//! number of attempts or when shutdown is requested.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Poll interval and attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Predicate held on attempt `attempts` (1-based).
    Satisfied { attempts: u32 },
    /// Attempt budget spent.
    TimedOut,
    /// `running` went false before the predicate held.
    Cancelled,
}

impl PollOutcome {
    #[inline]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }
}

/// Evaluate `predicate` until it holds, sleeping `policy.interval` between attempts.
///
/// `running` is checked before every attempt.
pub fn await_condition<F>(mut predicate: F, policy: PollPolicy, running: &AtomicBool) -> PollOutcome
where
    F: FnMut() -> bool,
{
    for attempt in 1..=policy.max_attempts {
        if !running.load(Ordering::Acquire) {
            return PollOutcome::Cancelled;
        }
        if predicate() {
            return PollOutcome::Satisfied { attempts: attempt };
        }
        if attempt < policy.max_attempts {
            thread::sleep(policy.interval);
        }
    }
    PollOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: PollPolicy = PollPolicy::new(Duration::ZERO, 10);

    #[test]
    fn satisfied_reports_attempts() {
        let running = AtomicBool::new(true);
        let mut calls = 0;
        let outcome = await_condition(
            || {
                calls += 1;
                calls == 3
            },
            FAST,
            &running,
        );
        assert_eq!(outcome, PollOutcome::Satisfied { attempts: 3 });
        assert!(outcome.is_satisfied());
    }

    #[test]
    fn times_out_after_budget() {
        let running = AtomicBool::new(true);
        let mut calls = 0;
        let outcome = await_condition(
            || {
                calls += 1;
                false
            },
            FAST,
            &running,
        );
        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(calls, 10);
    }

    #[test]
    fn cancelled_before_first_attempt() {
        let running = AtomicBool::new(false);
        let outcome = await_condition(|| true, FAST, &running);
        assert_eq!(outcome, PollOutcome::Cancelled);
    }

    #[test]
    fn zero_budget_times_out() {
        let running = AtomicBool::new(true);
        let outcome = await_condition(|| true, PollPolicy::new(Duration::ZERO, 0), &running);
        assert_eq!(outcome, PollOutcome::TimedOut);
    }
}
