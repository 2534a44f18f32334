//! # motor-safety-watchdog
//!
//! Per-actuator watchdogs that force motors and relays into their safe state
//! when the code commanding them stops refreshing them.
//!
//! Every output that can move something owns a [`WatchdogHandle`]. The
//! output's control code calls `feed()` whenever it issues a fresh command.
//! A periodic sweep over the [`SafetyRegistry`] stops every output whose
//! enabled handle has gone longer than its expiration period without a feed,
//! and reports the timeout to a [`DiagnosticSink`].
//!
//! ## Architecture
//!
//! - [`state`] - Per-handle deadline state machine
//! - [`handle`] - The handle an output owns
//! - [`registry`] - Handle registry and the sweep
//! - [`driver`] - Background thread running the sweep at a fixed rate
//! - [`global`] - Optional process-wide registry
//! - [`mode`] - Operating-mode oracle that suppresses enforcement
//! - [`clock`] - Monotonic time sources
//! - [`diagnostics`] - Timeout reporting
//! - [`config`] - Expiration and sweep period configuration
//! - [`error`] - Error types
//!
//! ## Locking
//!
//! Feeding, querying and configuring a handle take only that handle's lock.
//! A sweep holds the registry's list lock for its whole walk and takes each
//! handle's lock briefly. Actuators are stopped with no handle lock held, so
//! `stop()` may feed its own handle.
//!
//! ## Example
//!
//! ```rust
//! use motor_safety_watchdog::prelude::*;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//!
//! struct Relay {
//!     channel: u8,
//!     on: AtomicBool,
//!     safety: WatchdogHandle,
//! }
//!
//! impl SafetyActuator for Relay {
//!     fn stop(&self) {
//!         self.on.store(false, Ordering::SeqCst);
//!     }
//!
//!     fn describe(&self) -> String {
//!         format!("Relay ID {}", self.channel)
//!     }
//! }
//!
//! impl MotorSafety for Relay {
//!     fn safety_handle(&self) -> &WatchdogHandle {
//!         &self.safety
//!     }
//! }
//!
//! let clock = Arc::new(ManualClock::new());
//! let registry = SafetyRegistry::builder().clock(clock.clone()).build()?;
//!
//! let relay = Arc::new_cyclic(|weak| Relay {
//!     channel: 1,
//!     on: AtomicBool::new(true),
//!     safety: registry.register(weak),
//! });
//! relay.set_safety_enabled(true);
//! relay.feed();
//!
//! // No feed for longer than the 100 ms default expiration.
//! clock.advance(Duration::from_millis(150));
//! let report = registry.sweep_all();
//!
//! assert_eq!(report.stopped, 1);
//! assert!(!relay.on.load(Ordering::SeqCst));
//! assert_eq!(relay.safety_status(), SafetyStatus::Stopped);
//! # Ok::<(), SafetyError>(())
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod actuator;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod global;
pub mod handle;
pub mod mode;
pub mod registry;
pub mod state;

pub mod prelude;

pub use actuator::{MotorSafety, SafetyActuator};
pub use clock::{ManualClock, MonotonicClock, SystemClock};
pub use config::{DEFAULT_SAFETY_EXPIRATION, DEFAULT_SWEEP_PERIOD, SafetyConfig, SafetyConfigBuilder};
pub use diagnostics::{DiagnosticSink, TIMEOUT_SUFFIX, TracingDiagnosticSink, timeout_context};
pub use driver::SweepDriver;
pub use error::{SafetyError, SafetyResult};
pub use handle::{HandleId, WatchdogHandle};
pub use mode::{AlwaysEnabled, ControlWord, OperatingMode, SharedControlWord};
pub use registry::{SafetyRegistry, SafetyRegistryBuilder, SweepReport};
pub use state::{HandleMetrics, HandleState, SafetyStatus};
