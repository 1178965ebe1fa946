//! Timestamp source for trades and quotes

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of Unix-nanosecond timestamps
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> i64 {
        // None only past the year 2262
        Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
    }
}

/// Deterministic clock for tests and replays
///
/// Every read returns the current value and then advances it by `step`.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
    step: i64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self::with_step(start, 0)
    }

    pub fn with_step(start: i64, step: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
            step,
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> i64 {
        self.now.fetch_add(self.step, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_fixed() {
        let clock = ManualClock::new(1708123456789000000);
        assert_eq!(clock.now_nanos(), 1708123456789000000);
        assert_eq!(clock.now_nanos(), 1708123456789000000);

        clock.set(5);
        assert_eq!(clock.now_nanos(), 5);
    }

    #[test]
    fn test_manual_clock_steps() {
        let clock = ManualClock::with_step(100, 10);
        assert_eq!(clock.now_nanos(), 100);
        assert_eq!(clock.now_nanos(), 110);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_nanos() > 1_577_836_800_000_000_000);
    }
}
