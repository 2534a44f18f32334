//! Per-handle timeout state machine.
//!
//! `HandleState` is the data guarded by a handle's instance lock. It is a plain
//! value with no synchronisation of its own, so every transition can be
//! exercised directly with explicit timestamps.
//!
//! ```text
//!  Disabled ──enable──► Alive ──deadline passes──► Expired ──check──► Stopped
//!     ▲                   ▲                           │                  │
//!     │                   └───────────feed────────────┴──────────────────┘
//!     └─────────────── disable (from any state) ─────────────────────────┘
//! ```

use std::time::Duration;

/// Observable state of a watchdog handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SafetyStatus {
    /// Enforcement is off for this handle; it is always reported alive.
    #[default]
    Disabled,
    /// Enforcement is on and the deadline lies in the future.
    Alive,
    /// The deadline has passed and no check has stopped the actuator yet.
    Expired,
    /// The deadline has passed and a check has stopped the actuator.
    Stopped,
}

impl SafetyStatus {
    /// Get the status as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::Alive => "Alive",
            Self::Expired => "Expired",
            Self::Stopped => "Stopped",
        }
    }

    /// True for the two states past the deadline.
    #[must_use]
    pub fn is_timed_out(self) -> bool {
        matches!(self, Self::Expired | Self::Stopped)
    }
}

impl std::fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters kept per handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleMetrics {
    /// Number of feeds.
    pub feed_count: u64,
    /// Number of checks that found the handle expired and stopped it.
    pub timeout_count: u64,
}

/// Mutable state of one watchdog handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleState {
    enabled: bool,
    expiration: Duration,
    deadline: Duration,
    last_fed: Duration,
    stopped: bool,
    metrics: HandleMetrics,
}

impl HandleState {
    /// Fresh state: disabled, deadline at `now`.
    #[must_use]
    pub fn new(expiration: Duration, now: Duration) -> Self {
        Self {
            enabled: false,
            expiration,
            deadline: now,
            last_fed: now,
            stopped: false,
            metrics: HandleMetrics::default(),
        }
    }

    /// Push the deadline to `now + expiration`.
    pub fn feed(&mut self, now: Duration) {
        self.deadline = now.saturating_add(self.expiration);
        self.last_fed = now;
        self.stopped = false;
        self.metrics.feed_count = self.metrics.feed_count.saturating_add(1);
    }

    /// Change the expiration period.
    ///
    /// A longer period takes effect at the next feed. A shorter one also
    /// pulls the current deadline in to `last_fed + period`.
    pub fn set_expiration(&mut self, period: Duration) {
        self.expiration = period;
        self.deadline = self.deadline.min(self.last_fed.saturating_add(period));
    }

    /// Current expiration period.
    #[must_use]
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Instant after which an enabled handle is expired.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Turn enforcement on or off. Disabling clears the stopped flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stopped = false;
        }
    }

    /// Whether enforcement is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled handles are always alive.
    #[must_use]
    pub fn is_alive(&self, now: Duration) -> bool {
        !self.enabled || self.deadline > now
    }

    /// Enabled and at or past the deadline.
    #[must_use]
    pub fn is_expired(&self, now: Duration) -> bool {
        !self.is_alive(now)
    }

    /// Record that a check stopped the actuator. The deadline is left as is.
    pub fn record_timeout(&mut self) {
        self.stopped = true;
        self.metrics.timeout_count = self.metrics.timeout_count.saturating_add(1);
    }

    /// Status at `now`.
    #[must_use]
    pub fn status(&self, now: Duration) -> SafetyStatus {
        if !self.enabled {
            SafetyStatus::Disabled
        } else if self.deadline > now {
            SafetyStatus::Alive
        } else if self.stopped {
            SafetyStatus::Stopped
        } else {
            SafetyStatus::Expired
        }
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn metrics(&self) -> HandleMetrics {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_new_state_is_disabled_and_alive() {
        let state = HandleState::new(ms(100), ms(5));
        assert!(!state.is_enabled());
        assert!(state.is_alive(ms(5)));
        assert!(state.is_alive(ms(10_000)));
        assert_eq!(state.deadline(), ms(5));
        assert_eq!(state.status(ms(5)), SafetyStatus::Disabled);
    }

    #[test]
    fn test_enabled_without_feed_is_expired_immediately() {
        let mut state = HandleState::new(ms(100), ms(5));
        state.set_enabled(true);
        assert!(state.is_expired(ms(5)));
        assert_eq!(state.status(ms(5)), SafetyStatus::Expired);
    }

    #[test]
    fn test_feed_extends_deadline() {
        let mut state = HandleState::new(ms(100), Duration::ZERO);
        state.set_enabled(true);
        state.feed(Duration::ZERO);

        assert!(state.is_alive(ms(99)));
        assert!(!state.is_alive(ms(100)));
        assert_eq!(state.status(ms(50)), SafetyStatus::Alive);
        assert_eq!(state.metrics().feed_count, 1);
    }

    #[test]
    fn test_timeout_then_feed_recovers() {
        let mut state = HandleState::new(ms(100), Duration::ZERO);
        state.set_enabled(true);
        state.feed(Duration::ZERO);

        state.record_timeout();
        assert_eq!(state.status(ms(150)), SafetyStatus::Stopped);
        assert_eq!(state.deadline(), ms(100));

        state.feed(ms(150));
        assert_eq!(state.status(ms(151)), SafetyStatus::Alive);
        assert_eq!(state.metrics().timeout_count, 1);
    }

    #[test]
    fn test_shortening_expiration_pulls_deadline_in() {
        let mut state = HandleState::new(ms(1000), Duration::ZERO);
        state.set_enabled(true);
        state.feed(Duration::ZERO);

        state.set_expiration(ms(10));
        assert_eq!(state.deadline(), ms(10));
        assert!(state.is_expired(ms(20)));
    }

    #[test]
    fn test_lengthening_expiration_waits_for_next_feed() {
        let mut state = HandleState::new(ms(10), Duration::ZERO);
        state.set_enabled(true);
        state.feed(Duration::ZERO);

        state.set_expiration(ms(1000));
        assert_eq!(state.deadline(), ms(10));
        assert!(state.is_expired(ms(20)));

        state.feed(ms(20));
        assert_eq!(state.deadline(), ms(1020));
    }

    #[test]
    fn test_disable_makes_alive_regardless_of_deadline() {
        let mut state = HandleState::new(ms(10), Duration::ZERO);
        state.set_enabled(true);
        state.record_timeout();

        state.set_enabled(false);
        assert!(state.is_alive(ms(1_000_000)));
        assert_eq!(state.status(ms(1_000_000)), SafetyStatus::Disabled);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SafetyStatus::Stopped.to_string(), "Stopped");
        assert!(SafetyStatus::Expired.is_timed_out());
        assert!(!SafetyStatus::Alive.is_timed_out());
    }
}
