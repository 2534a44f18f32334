//! Configuration for the motor safety registry and its sweep driver.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{SafetyError, SafetyResult};

/// Expiration period given to newly registered handles.
pub const DEFAULT_SAFETY_EXPIRATION: Duration = Duration::from_millis(100);

/// Period at which the sweep driver checks every registered handle.
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_millis(20);

/// Motor safety configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Expiration period assigned to a handle when it is registered.
    pub default_expiration: Duration,
    /// Interval between two sweeps of the driver thread.
    pub sweep_period: Duration,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            default_expiration: DEFAULT_SAFETY_EXPIRATION,
            sweep_period: DEFAULT_SWEEP_PERIOD,
        }
    }
}

impl SafetyConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a period is zero, or if the sweep period is longer
    /// than the default expiration.
    pub fn validate(&self) -> SafetyResult<()> {
        if self.default_expiration.is_zero() {
            return Err(SafetyError::invalid_configuration(
                "default_expiration must be greater than 0",
            ));
        }
        if self.sweep_period.is_zero() {
            return Err(SafetyError::invalid_configuration(
                "sweep_period must be greater than 0",
            ));
        }
        if self.sweep_period > self.default_expiration {
            return Err(SafetyError::invalid_configuration(
                "sweep_period must not exceed default_expiration",
            ));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> SafetyConfigBuilder {
        SafetyConfigBuilder::default()
    }
}

/// Builder for `SafetyConfig`.
#[derive(Debug, Default)]
pub struct SafetyConfigBuilder {
    config: SafetyConfig,
}

impl SafetyConfigBuilder {
    /// Set the expiration period for new handles.
    #[must_use]
    pub fn default_expiration(mut self, period: Duration) -> Self {
        self.config.default_expiration = period;
        self
    }

    /// Set the sweep driver period.
    #[must_use]
    pub fn sweep_period(mut self, period: Duration) -> Self {
        self.config.sweep_period = period;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> SafetyResult<SafetyConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
