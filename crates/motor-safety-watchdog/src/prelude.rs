//! Prelude for motor-safety-watchdog.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use motor_safety_watchdog::prelude::*;
//!
//! let registry = SafetyRegistry::new(SafetyConfig::default())?;
//! assert!(registry.is_empty());
//! assert_eq!(registry.sweep_all(), SweepReport::default());
//! # Ok::<(), SafetyError>(())
//! ```

pub use crate::actuator::{MotorSafety, SafetyActuator};
pub use crate::clock::{ManualClock, MonotonicClock, SystemClock};
pub use crate::config::{SafetyConfig, SafetyConfigBuilder};
pub use crate::diagnostics::{DiagnosticSink, TracingDiagnosticSink};
pub use crate::driver::SweepDriver;
pub use crate::error::{SafetyError, SafetyResult};
pub use crate::handle::{HandleId, WatchdogHandle};
pub use crate::mode::{AlwaysEnabled, ControlWord, OperatingMode, SharedControlWord};
pub use crate::registry::{SafetyRegistry, SafetyRegistryBuilder, SweepReport};
pub use crate::state::{HandleMetrics, SafetyStatus};
