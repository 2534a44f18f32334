//! Registry of live watchdog handles and the global sweep.
//!
//! Two kinds of lock are involved and they never nest the other way round:
//!
//! - the list lock, held to insert or remove an entry and for a whole sweep;
//! - each handle's instance lock, held for state reads and writes only.
//!
//! A sweep takes the list lock and then each instance lock in turn. Handle
//! operations take only their instance lock, and registration and removal take
//! only the list lock.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::actuator::SafetyActuator;
use crate::clock::{MonotonicClock, SystemClock};
use crate::config::SafetyConfig;
use crate::diagnostics::{DiagnosticSink, TracingDiagnosticSink};
use crate::error::SafetyResult;
use crate::handle::{CheckOutcome, HandleEntry, HandleId, WatchdogHandle};
use crate::mode::{AlwaysEnabled, OperatingMode};
use crate::state::HandleState;

/// Summary of one sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Handles visited.
    pub checked: usize,
    /// Actuators stopped.
    pub stopped: usize,
    /// Handles skipped because the operating mode suppressed enforcement.
    pub suppressed: usize,
}

/// State shared by a registry and every handle it issued.
pub(crate) struct RegistryShared {
    handles: Mutex<HashMap<HandleId, Arc<HandleEntry>>>,
    next_id: AtomicU64,
    config: SafetyConfig,
    clock: Arc<dyn MonotonicClock>,
    mode: Arc<dyn OperatingMode>,
    sink: Arc<dyn DiagnosticSink>,
}

impl RegistryShared {
    pub(crate) fn clock(&self) -> &dyn MonotonicClock {
        self.clock.as_ref()
    }

    pub(crate) fn mode(&self) -> &dyn OperatingMode {
        self.mode.as_ref()
    }

    pub(crate) fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    fn next_id(&self) -> HandleId {
        HandleId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn register_handle(&self, entry: Arc<HandleEntry>) {
        let id = entry.id();
        self.handles.lock().insert(id, entry);
        tracing::debug!(handle = %id, "Watchdog handle registered");
    }

    pub(crate) fn unregister_handle(&self, id: HandleId) -> bool {
        let removed = self.handles.lock().remove(&id);
        if removed.is_some() {
            tracing::debug!(handle = %id, "Watchdog handle unregistered");
        }
        removed.is_some()
    }
}

/// Registry of every live watchdog handle.
///
/// Cloning is cheap and yields another reference to the same registry.
///
/// # Thread Safety
///
/// Registration, feeding, configuration and sweeping may run concurrently
/// from any threads. A feed that completes before a sweep starts is observed
/// by that sweep.
#[derive(Clone)]
pub struct SafetyRegistry {
    shared: Arc<RegistryShared>,
}

impl SafetyRegistry {
    /// Create a registry with the system clock, no mode suppression and the
    /// tracing diagnostic sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SafetyConfig) -> SafetyResult<Self> {
        Self::builder().config(config).build()
    }

    /// Create a registry builder.
    #[must_use]
    pub fn builder() -> SafetyRegistryBuilder {
        SafetyRegistryBuilder::default()
    }

    /// Register `actuator` and return the handle guarding it.
    ///
    /// The registry keeps only a weak reference, so this can be called from
    /// inside [`Arc::new_cyclic`] while the actuator is being built. The new
    /// handle is disabled, uses the configured default expiration and has its
    /// deadline at the current time.
    pub fn register<A>(&self, actuator: &Weak<A>) -> WatchdogHandle
    where
        A: SafetyActuator + 'static,
    {
        let actuator: Weak<dyn SafetyActuator> = actuator.clone();
        self.register_dyn(actuator)
    }

    /// Register a type-erased actuator.
    pub fn register_dyn(&self, actuator: Weak<dyn SafetyActuator>) -> WatchdogHandle {
        let shared = &self.shared;
        let state = HandleState::new(shared.config.default_expiration, shared.clock.now());
        let entry = Arc::new(HandleEntry::new(shared.next_id(), actuator, state));
        shared.register_handle(Arc::clone(&entry));
        WatchdogHandle::new(entry, Arc::clone(shared))
    }

    /// Check every registered handle and stop the expired ones.
    ///
    /// Never fails; timeouts go to the diagnostic sink.
    pub fn sweep_all(&self) -> SweepReport {
        let mut report = SweepReport::default();
        // Released after the list lock, so a last reference dropped here
        // cannot re-enter `unregister_handle` while the lock is held.
        let mut stopped: Vec<Arc<dyn SafetyActuator>> = Vec::new();

        {
            let handles = self.shared.handles.lock();
            for entry in handles.values() {
                report.checked = report.checked.saturating_add(1);
                match entry.check(&self.shared) {
                    CheckOutcome::Suppressed => {
                        report.suppressed = report.suppressed.saturating_add(1);
                    }
                    CheckOutcome::Idle => {}
                    CheckOutcome::Stopped(actuator) => {
                        report.stopped = report.stopped.saturating_add(1);
                        stopped.push(actuator);
                    }
                }
            }
        }

        drop(stopped);
        tracing::trace!(
            checked = report.checked,
            stopped = report.stopped,
            suppressed = report.suppressed,
            "Motor safety sweep"
        );
        report
    }

    /// Number of registered handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.handles.lock().len()
    }

    /// True if no handle is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.handles.lock().is_empty()
    }

    /// True if the handle with `id` is registered.
    #[must_use]
    pub fn contains(&self, id: HandleId) -> bool {
        self.shared.handles.lock().contains_key(&id)
    }

    /// Identifiers of all registered handles, in ascending order.
    #[must_use]
    pub fn handle_ids(&self) -> Vec<HandleId> {
        let mut ids: Vec<HandleId> = self.shared.handles.lock().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The configuration this registry was built with.
    #[must_use]
    pub fn config(&self) -> &SafetyConfig {
        &self.shared.config
    }

    /// The registry's time source.
    #[must_use]
    pub fn clock(&self) -> &dyn MonotonicClock {
        self.shared.clock()
    }

    /// Current time on the registry's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.shared.clock.now()
    }
}

impl Default for SafetyRegistry {
    fn default() -> Self {
        SafetyRegistryBuilder::default().assemble()
    }
}

impl std::fmt::Debug for SafetyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafetyRegistry")
            .field("config", &self.shared.config)
            .field("handle_count", &self.len())
            .finish_non_exhaustive()
    }
}

/// Builder for `SafetyRegistry`, used to inject collaborators.
#[derive(Default)]
pub struct SafetyRegistryBuilder {
    config: SafetyConfig,
    clock: Option<Arc<dyn MonotonicClock>>,
    mode: Option<Arc<dyn OperatingMode>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl SafetyRegistryBuilder {
    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: SafetyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the time source. Defaults to [`SystemClock`].
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn MonotonicClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the operating-mode oracle. Defaults to [`AlwaysEnabled`].
    #[must_use]
    pub fn operating_mode(mut self, mode: Arc<dyn OperatingMode>) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the diagnostic sink. Defaults to [`TracingDiagnosticSink`].
    #[must_use]
    pub fn diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> SafetyResult<SafetyRegistry> {
        self.config.validate()?;
        Ok(self.assemble())
    }

    fn assemble(self) -> SafetyRegistry {
        SafetyRegistry {
            shared: Arc::new(RegistryShared {
                handles: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                config: self.config,
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
                mode: self.mode.unwrap_or_else(|| Arc::new(AlwaysEnabled)),
                sink: self
                    .sink
                    .unwrap_or_else(|| Arc::new(TracingDiagnosticSink)),
            }),
        }
    }
}

impl std::fmt::Debug for SafetyRegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafetyRegistryBuilder")
            .field("config", &self.config)
            .field("custom_clock", &self.clock.is_some())
            .field("custom_mode", &self.mode.is_some())
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}
