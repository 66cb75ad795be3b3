//=========================================================================
// Diagnostics
//=========================================================================
//
// Injected diagnostic sink shared by every stage, scene and resource.
//
// Two channels:
//   log()   → best-effort trace of soft failures (debug builds only)
//   fatal() → failed invariant, never returns
//
// Soft failures return `false` to the caller after logging. Wiring and
// programmer errors go through `fatal()` and are never retried.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error};

//=== Diagnostics Trait ===================================================

/// Sink for soft-failure logging and fatal invariant checks.
///
/// Passed around as `Arc<dyn Diagnostics>` inside the [`Runtime`].
///
/// [`Runtime`]: crate::core::Runtime
pub trait Diagnostics: Send + Sync {
    /// Records a soft failure or notable event. Best-effort.
    fn log(&self, message: &str);

    /// Reports a failed invariant and halts.
    fn fatal(&self, message: &str) -> !;
}

//=== LogDiagnostics ======================================================

/// Default sink backed by the `log` facade.
///
/// `log()` is compiled out of release builds. `fatal()` logs at error level
/// and panics, unwinding the scheduling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn log(&self, message: &str) {
        if cfg!(debug_assertions) {
            debug!(target: "diagnostics", "{}", message);
        }
    }

    fn fatal(&self, message: &str) -> ! {
        error!(target: "diagnostics", "FATAL: {}", message);
        panic!("fatal: {}", message);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_does_not_panic() {
        LogDiagnostics.log("scene 7 not found");
    }

    #[test]
    #[should_panic(expected = "fatal: resource underflow")]
    fn fatal_panics_with_message() {
        LogDiagnostics.fatal("resource underflow");
    }

    #[test]
    fn usable_as_trait_object() {
        let sink: std::sync::Arc<dyn Diagnostics> = std::sync::Arc::new(LogDiagnostics);
        sink.log("shared");
    }
}
