//! Process-wide registry.
//!
//! Outputs created deep inside a robot program usually have no registry to
//! hand, so one registry can be installed for the whole process. The sweep
//! driver and the free [`sweep_all`] function operate on it.

use parking_lot::RwLock;

use crate::error::{SafetyError, SafetyResult};
use crate::registry::{SafetyRegistry, SweepReport};

static GLOBAL: RwLock<Option<SafetyRegistry>> = parking_lot::const_rwlock(None);

/// Install `registry` as the process-wide registry.
///
/// # Errors
///
/// Returns [`SafetyError::RegistryAlreadyInstalled`] if one is installed.
pub fn install(registry: SafetyRegistry) -> SafetyResult<()> {
    let mut global = GLOBAL.write();
    if global.is_some() {
        return Err(SafetyError::RegistryAlreadyInstalled);
    }
    tracing::info!(config = ?registry.config(), "Motor safety registry installed");
    *global = Some(registry);
    Ok(())
}

/// The process-wide registry.
///
/// # Errors
///
/// Returns [`SafetyError::RegistryNotInstalled`] if none is installed.
pub fn registry() -> SafetyResult<SafetyRegistry> {
    try_registry().ok_or(SafetyError::RegistryNotInstalled)
}

/// The process-wide registry, if installed.
#[must_use]
pub fn try_registry() -> Option<SafetyRegistry> {
    GLOBAL.read().clone()
}

/// Remove the process-wide registry and return it.
///
/// Handles already issued keep working against the returned registry.
pub fn teardown() -> Option<SafetyRegistry> {
    let removed = GLOBAL.write().take();
    if let Some(registry) = &removed {
        tracing::info!(handles = registry.len(), "Motor safety registry torn down");
    }
    removed
}

/// Sweep the process-wide registry.
///
/// Returns an empty report when no registry is installed.
pub fn sweep_all() -> SweepReport {
    // Cloned out so the sweep does not hold the global lock.
    match try_registry() {
        Some(registry) => registry.sweep_all(),
        None => SweepReport::default(),
    }
}
