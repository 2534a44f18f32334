//! Error types for the motor safety service.
//!
//! A timed-out actuator is not an error here: it is stopped and reported to the
//! diagnostic sink. These errors cover configuration and the lifecycle of the
//! process-wide registry and the sweep driver.

use thiserror::Error;

/// Errors that can occur while configuring or running the safety service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SafetyError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A process-wide registry is already installed.
    #[error("A motor safety registry is already installed")]
    RegistryAlreadyInstalled,

    /// No process-wide registry has been installed.
    #[error("No motor safety registry is installed")]
    RegistryNotInstalled,

    /// The sweep driver thread could not be started.
    #[error("Failed to spawn sweep driver: {0}")]
    DriverSpawn(String),

    /// The sweep driver thread panicked.
    #[error("Sweep driver thread panicked")]
    DriverPanicked,
}

impl SafetyError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create a driver spawn error.
    #[must_use]
    pub fn driver_spawn(reason: impl Into<String>) -> Self {
        Self::DriverSpawn(reason.into())
    }
}

/// A specialized `Result` type for motor safety operations.
pub type SafetyResult<T> = std::result::Result<T, SafetyError>;
