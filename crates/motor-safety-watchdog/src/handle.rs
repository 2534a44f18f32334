//! Watchdog handles.
//!
//! A [`WatchdogHandle`] is owned by the actuator it protects and keeps only a
//! weak reference back to it. The registry holds the shared [`HandleEntry`];
//! dropping the handle removes that entry under the registry lock, so a sweep
//! either sees the entry whole or not at all.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::actuator::SafetyActuator;
use crate::diagnostics::timeout_context;
use crate::registry::RegistryShared;
use crate::state::{HandleMetrics, HandleState, SafetyStatus};

/// Registry-unique identifier of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(u64);

impl HandleId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of one per-handle check.
pub(crate) enum CheckOutcome {
    /// The operating mode suppresses enforcement.
    Suppressed,
    /// Nothing to do.
    Idle,
    /// The actuator was reported and stopped. The strong reference is handed
    /// back so the caller decides where it is released.
    Stopped(Arc<dyn SafetyActuator>),
}

/// Registry-side record of one handle.
pub(crate) struct HandleEntry {
    id: HandleId,
    actuator: Weak<dyn SafetyActuator>,
    state: Mutex<HandleState>,
}

impl HandleEntry {
    pub(crate) fn new(id: HandleId, actuator: Weak<dyn SafetyActuator>, state: HandleState) -> Self {
        Self {
            id,
            actuator,
            state: Mutex::new(state),
        }
    }

    pub(crate) fn id(&self) -> HandleId {
        self.id
    }

    /// The per-handle sweep step.
    ///
    /// The instance lock is released before the sink and the actuator are
    /// called, so `stop()` may feed its own handle.
    pub(crate) fn check(&self, registry: &RegistryShared) -> CheckOutcome {
        if registry.mode().suppresses_safety() {
            return CheckOutcome::Suppressed;
        }

        let now = registry.clock().now();
        let actuator = {
            let mut state = self.state.lock();
            if !state.is_expired(now) {
                return CheckOutcome::Idle;
            }
            // Not yet constructed, or already being dropped.
            let Some(actuator) = self.actuator.upgrade() else {
                return CheckOutcome::Idle;
            };
            state.record_timeout();
            actuator
        };

        let context = timeout_context(&actuator.describe());
        tracing::debug!(handle = %self.id, "Stopping expired actuator");
        registry.sink().report_timeout(&context);
        actuator.stop();
        CheckOutcome::Stopped(actuator)
    }
}

impl std::fmt::Debug for HandleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("HandleEntry");
        debug.field("id", &self.id);
        match self.state.try_lock() {
            Some(state) => debug.field("state", &*state),
            None => debug.field("state", &"<locked>"),
        };
        debug.finish_non_exhaustive()
    }
}

/// Watchdog guarding one actuator.
///
/// Created by [`SafetyRegistry::register`](crate::SafetyRegistry::register),
/// which inserts it into the registry. Dropping it removes it again. All
/// operations take only this handle's own lock, so feeding one actuator never
/// waits on another actuator's check.
pub struct WatchdogHandle {
    entry: Arc<HandleEntry>,
    registry: Arc<RegistryShared>,
}

impl WatchdogHandle {
    pub(crate) fn new(entry: Arc<HandleEntry>, registry: Arc<RegistryShared>) -> Self {
        Self { entry, registry }
    }

    /// Identifier of this handle in its registry.
    #[must_use]
    pub fn id(&self) -> HandleId {
        self.entry.id
    }

    /// Move the deadline to now plus the expiration period.
    pub fn feed(&self) {
        let now = self.registry.clock().now();
        self.entry.state.lock().feed(now);
    }

    /// Set the expiration period.
    ///
    /// Does not feed. A shorter period applies to the current deadline
    /// immediately; a longer one only from the next feed.
    pub fn set_expiration(&self, period: Duration) {
        self.entry.state.lock().set_expiration(period);
    }

    /// Current expiration period.
    #[must_use]
    pub fn expiration(&self) -> Duration {
        self.entry.state.lock().expiration()
    }

    /// True if enforcement is off or the deadline is still ahead.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        let now = self.registry.clock().now();
        self.entry.state.lock().is_alive(now)
    }

    /// Turn enforcement on or off.
    pub fn set_safety_enabled(&self, enabled: bool) {
        self.entry.state.lock().set_enabled(enabled);
    }

    /// Whether enforcement is on.
    #[must_use]
    pub fn is_safety_enabled(&self) -> bool {
        self.entry.state.lock().is_enabled()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> SafetyStatus {
        let now = self.registry.clock().now();
        self.entry.state.lock().status(now)
    }

    /// Feed and timeout counters.
    #[must_use]
    pub fn metrics(&self) -> HandleMetrics {
        self.entry.state.lock().metrics()
    }

    /// Run the sweep step for this handle alone.
    ///
    /// Unless the operating mode suppresses enforcement, an enabled handle at
    /// or past its deadline reports a timeout and stops its actuator. Every
    /// call while expired stops again. Returns whether the actuator was
    /// stopped.
    pub fn check(&self) -> bool {
        matches!(
            self.entry.check(&self.registry),
            CheckOutcome::Stopped(_)
        )
    }
}

impl Drop for WatchdogHandle {
    fn drop(&mut self) {
        self.registry.unregister_handle(self.entry.id);
    }
}

impl std::fmt::Debug for WatchdogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchdogHandle")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}
