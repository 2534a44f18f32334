//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use motor_safety_test_helpers::prelude::*;
//! ```

pub use crate::mock::{CountingActuator, MockMotor, RecordingSink};
pub use crate::must::{must, must_some, must_with};

/// Return type for fallible tests.
pub type TestResult = Result<(), Box<dyn std::error::Error>>;
