//! Operating-mode oracle.
//!
//! While the system is disabled or in test mode, motor safety enforcement is
//! suppressed for every handle, whatever its own enabled flag says.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// System-wide authority on whether safety enforcement applies.
pub trait OperatingMode: Send + Sync {
    /// True while the system is disabled.
    fn is_disabled(&self) -> bool;

    /// True while the system is in test mode.
    fn is_test(&self) -> bool;

    /// True when sweeps must not stop anything.
    fn suppresses_safety(&self) -> bool {
        self.is_disabled() || self.is_test()
    }
}

/// Snapshot of the driver station control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlWord {
    /// Outputs are allowed to run.
    pub enabled: bool,
    /// Autonomous period is active.
    pub autonomous: bool,
    /// Test mode is active.
    pub test: bool,
    /// Emergency stop has been latched.
    pub emergency_stop: bool,
    /// Field management system is attached.
    pub fms_attached: bool,
    /// Driver station is attached.
    pub ds_attached: bool,
}

impl ControlWord {
    /// Control word for an enabled teleoperated system.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ds_attached: true,
            ..Self::default()
        }
    }

    /// Control word for an enabled system in test mode.
    #[must_use]
    pub fn test_mode() -> Self {
        Self {
            test: true,
            ..Self::enabled()
        }
    }
}

impl OperatingMode for ControlWord {
    fn is_disabled(&self) -> bool {
        !self.enabled || self.emergency_stop
    }

    fn is_test(&self) -> bool {
        self.test
    }
}

/// Control word that can be updated while sweeps read it.
#[derive(Debug, Default)]
pub struct SharedControlWord {
    word: RwLock<ControlWord>,
}

impl SharedControlWord {
    /// Create an oracle holding `word`.
    #[must_use]
    pub fn new(word: ControlWord) -> Self {
        Self {
            word: RwLock::new(word),
        }
    }

    /// Replace the current control word.
    pub fn update(&self, word: ControlWord) {
        *self.word.write() = word;
    }

    /// Set only the enabled bit.
    pub fn set_enabled(&self, enabled: bool) {
        self.word.write().enabled = enabled;
    }

    /// Set only the test bit.
    pub fn set_test(&self, test: bool) {
        self.word.write().test = test;
    }

    /// Copy of the current control word.
    #[must_use]
    pub fn get(&self) -> ControlWord {
        *self.word.read()
    }
}

impl OperatingMode for SharedControlWord {
    fn is_disabled(&self) -> bool {
        self.word.read().is_disabled()
    }

    fn is_test(&self) -> bool {
        self.word.read().is_test()
    }
}

/// Oracle that never suppresses enforcement.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEnabled;

impl OperatingMode for AlwaysEnabled {
    fn is_disabled(&self) -> bool {
        false
    }

    fn is_test(&self) -> bool {
        false
    }
}
