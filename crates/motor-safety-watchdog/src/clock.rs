//! Monotonic time sources.
//!
//! Deadlines are absolute timestamps expressed as the [`Duration`] elapsed
//! since a clock-specific epoch. A clock must never run backwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic timestamp provider.
pub trait MonotonicClock: Send + Sync {
    /// Current time since the clock's epoch. Never decreases.
    fn now(&self) -> Duration;
}

/// Wall-independent clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock whose epoch is the moment of creation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually driven clock for simulation and deterministic tests.
///
/// Time only moves when [`advance`](Self::advance) or [`set`](Self::set) is
/// called. Attempts to move it backwards are ignored.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock reading `start`.
    #[must_use]
    pub fn starting_at(start: Duration) -> Self {
        Self {
            nanos: AtomicU64::new(saturating_nanos(start)),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let delta = saturating_nanos(delta);
        let mut current = self.nanos.load(Ordering::Acquire);
        loop {
            let next = current.saturating_add(delta);
            match self.nanos.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Set the clock to `at`, unless that would move it backwards.
    pub fn set(&self, at: Duration) {
        self.nanos.fetch_max(saturating_nanos(at), Ordering::AcqRel);
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(Duration::from_millis(50));
        clock.advance(Duration::from_millis(25));
        assert_eq!(clock.now(), Duration::from_millis(75));
    }

    #[test]
    fn test_manual_clock_never_runs_backwards() {
        let clock = ManualClock::starting_at(Duration::from_secs(2));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(2));

        clock.set(Duration::from_secs(3));
        assert_eq!(clock.now(), Duration::from_secs(3));
    }

    #[test]
    fn test_manual_clock_saturates() {
        let clock = ManualClock::starting_at(Duration::from_nanos(u64::MAX - 1));
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_nanos(u64::MAX));
    }
}
