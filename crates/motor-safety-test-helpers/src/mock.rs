//! Mock collaborators for watchdog tests.

use motor_safety_watchdog::{
    DiagnosticSink, MotorSafety, SafetyActuator, SafetyRegistry, WatchdogHandle,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Actuator that counts how often it was stopped.
#[derive(Debug)]
pub struct CountingActuator {
    description: String,
    stops: AtomicUsize,
    running: AtomicBool,
}

impl CountingActuator {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            stops: AtomicUsize::new(0),
            running: AtomicBool::new(false),
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }
}

impl SafetyActuator for CountingActuator {
    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Motor controller that owns its watchdog handle.
///
/// `set` commands the motor and feeds the handle, the way a speed controller
/// does on every output update.
#[derive(Debug)]
pub struct MockMotor {
    output: CountingActuator,
    refeed_on_stop: bool,
    safety: WatchdogHandle,
}

impl MockMotor {
    /// Build a motor registered with `registry`. Safety starts disabled.
    pub fn new(registry: &SafetyRegistry, description: impl Into<String>) -> Arc<Self> {
        Self::build(registry, description.into(), false)
    }

    /// Like [`MockMotor::new`], but `stop()` also feeds the motor's own handle.
    pub fn refeeding(registry: &SafetyRegistry, description: impl Into<String>) -> Arc<Self> {
        Self::build(registry, description.into(), true)
    }

    fn build(registry: &SafetyRegistry, description: String, refeed_on_stop: bool) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            output: CountingActuator::new(description),
            refeed_on_stop,
            safety: registry.register(weak),
        })
    }

    /// Command the motor and feed the watchdog.
    pub fn set(&self, running: bool) {
        self.output.set_running(running);
        self.feed();
    }

    pub fn output(&self) -> &CountingActuator {
        &self.output
    }

    pub fn stop_count(&self) -> usize {
        self.output.stop_count()
    }
}

impl SafetyActuator for MockMotor {
    fn stop(&self) {
        self.output.stop();
        if self.refeed_on_stop {
            self.feed();
        }
    }

    fn describe(&self) -> String {
        self.output.describe()
    }
}

impl MotorSafety for MockMotor {
    fn safety_handle(&self) -> &WatchdogHandle {
        &self.safety
    }
}

/// Diagnostic sink that keeps every report.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn last(&self) -> Option<String> {
        self.reports.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn report_timeout(&self, context: &str) {
        self.reports.lock().push(context.to_string());
    }
}
