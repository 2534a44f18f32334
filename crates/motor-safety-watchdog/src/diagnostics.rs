//! Timeout diagnostics.

/// Text appended to the actuator description in every timeout report.
pub const TIMEOUT_SUFFIX: &str = "... Output not updated often enough.";

/// Receiver of timeout reports.
///
/// Fire-and-forget: implementations must not block the sweep and must not
/// panic back into it.
pub trait DiagnosticSink: Send + Sync {
    /// Report that an actuator timed out and is being stopped.
    fn report_timeout(&self, context: &str);
}

/// Build the context text of a timeout report.
#[must_use]
pub fn timeout_context(description: &str) -> String {
    format!("{description}{TIMEOUT_SUFFIX}")
}

/// Sink that forwards timeout reports to `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn report_timeout(&self, context: &str) {
        tracing::error!(context = context, "Motor safety timeout");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_context() {
        assert_eq!(
            timeout_context("PWM 3"),
            "PWM 3... Output not updated often enough."
        );
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingDiagnosticSink.report_timeout("Relay ID 1... Output not updated often enough.");
    }
}
