//! Shared test utilities for the motor safety watchdog.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`mock`] - Counting actuators and a recording diagnostic sink
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! motor-safety-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use motor_safety_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]

pub mod mock;
pub mod must;
pub mod prelude;

pub use must::*;
