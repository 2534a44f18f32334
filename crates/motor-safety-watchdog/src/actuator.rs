//! Actuator-side traits.
//!
//! [`SafetyActuator`] is what the watchdog needs from an output: a way to stop
//! it and a way to name it. [`MotorSafety`] is what an output offers its own
//! users once it owns a [`WatchdogHandle`].

use std::time::Duration;

use crate::handle::WatchdogHandle;
use crate::state::SafetyStatus;

/// An output that can be forced into its safe (stopped) state.
pub trait SafetyActuator: Send + Sync {
    /// Drive the output to its safe state.
    ///
    /// Called on every sweep while the handle stays expired, possibly from
    /// several threads at once, so it must be idempotent. It must not register
    /// or drop watchdog handles, since sweeps call it under the registry lock.
    fn stop(&self);

    /// Human-readable identification used in timeout reports.
    fn describe(&self) -> String;
}

/// Motor safety surface for outputs that own a watchdog handle.
///
/// Implementors only provide [`safety_handle`](Self::safety_handle); the rest
/// delegates to it.
pub trait MotorSafety: SafetyActuator {
    /// The handle guarding this output.
    fn safety_handle(&self) -> &WatchdogHandle;

    /// Signal that the output was just refreshed.
    fn feed(&self) {
        self.safety_handle().feed();
    }

    /// Set the expiration period.
    fn set_expiration(&self, period: Duration) {
        self.safety_handle().set_expiration(period);
    }

    /// Current expiration period.
    fn expiration(&self) -> Duration {
        self.safety_handle().expiration()
    }

    /// False once an enabled output has missed its deadline.
    fn is_alive(&self) -> bool {
        self.safety_handle().is_alive()
    }

    /// Turn watchdog enforcement on or off for this output.
    fn set_safety_enabled(&self, enabled: bool) {
        self.safety_handle().set_safety_enabled(enabled);
    }

    /// Whether watchdog enforcement is on.
    fn is_safety_enabled(&self) -> bool {
        self.safety_handle().is_safety_enabled()
    }

    /// Current watchdog status.
    fn safety_status(&self) -> SafetyStatus {
        self.safety_handle().status()
    }
}
