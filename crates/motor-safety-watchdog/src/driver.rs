//! Fixed-rate sweep driver.
//!
//! Runs [`SafetyRegistry::sweep_all`] on a dedicated thread at the registry's
//! configured `sweep_period`, using absolute wake times so the rate does not
//! drift with sweep duration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{SafetyError, SafetyResult};
use crate::registry::SafetyRegistry;

const THREAD_NAME: &str = "motor-safety-sweep";

/// Background thread that sweeps a registry periodically.
///
/// The thread stops when [`shutdown`](Self::shutdown) is called or the driver
/// is dropped.
#[derive(Debug)]
pub struct SweepDriver {
    running: Arc<AtomicBool>,
    sweeps: Arc<AtomicU64>,
    stopped: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
}

impl SweepDriver {
    /// Start sweeping `registry` every `registry.config().sweep_period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(registry: SafetyRegistry) -> SafetyResult<Self> {
        let period = registry.config().sweep_period;
        let running = Arc::new(AtomicBool::new(true));
        let sweeps = Arc::new(AtomicU64::new(0));
        let stopped = Arc::new(AtomicU64::new(0));

        let loop_state = SweepLoop {
            registry,
            period,
            running: Arc::clone(&running),
            sweeps: Arc::clone(&sweeps),
            stopped: Arc::clone(&stopped),
        };
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || loop_state.run())
            .map_err(|e| SafetyError::driver_spawn(e.to_string()))?;

        tracing::info!(period = ?period, "Motor safety sweep driver started");
        Ok(Self {
            running,
            sweeps,
            stopped,
            thread: Some(thread),
        })
    }

    /// Number of completed sweep passes.
    #[must_use]
    pub fn sweep_count(&self) -> u64 {
        self.sweeps.load(Ordering::Acquire)
    }

    /// Total number of actuators stopped across all passes.
    #[must_use]
    pub fn stop_count(&self) -> u64 {
        self.stopped.load(Ordering::Acquire)
    }

    /// True until shutdown has been requested.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the thread and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep thread panicked.
    pub fn shutdown(mut self) -> SafetyResult<()> {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> SafetyResult<()> {
        self.running.store(false, Ordering::Release);
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        thread.thread().unpark();
        if thread.join().is_err() {
            tracing::error!("Motor safety sweep driver panicked");
            return Err(SafetyError::DriverPanicked);
        }
        tracing::info!(
            sweeps = self.sweep_count(),
            stopped = self.stop_count(),
            "Motor safety sweep driver stopped"
        );
        Ok(())
    }
}

impl Drop for SweepDriver {
    fn drop(&mut self) {
        if let Err(e) = self.stop_and_join() {
            tracing::warn!(error = %e, "Sweep driver did not stop cleanly");
        }
    }
}

struct SweepLoop {
    registry: SafetyRegistry,
    period: Duration,
    running: Arc<AtomicBool>,
    sweeps: Arc<AtomicU64>,
    stopped: Arc<AtomicU64>,
}

impl SweepLoop {
    fn run(self) {
        let mut next_tick = Instant::now();
        while self.running.load(Ordering::Acquire) {
            let report = self.registry.sweep_all();
            self.sweeps.fetch_add(1, Ordering::AcqRel);
            self.stopped
                .fetch_add(u64::try_from(report.stopped).unwrap_or(u64::MAX), Ordering::AcqRel);

            next_tick += self.period;
            let now = Instant::now();
            if next_tick <= now {
                // Overran the period; resynchronise instead of bursting.
                next_tick = now;
                continue;
            }
            // Unparked early on shutdown.
            while self.running.load(Ordering::Acquire) {
                let remaining = next_tick.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                thread::park_timeout(remaining);
            }
        }
    }
}
