//=========================================================================
// Lifecycle Flags
//=========================================================================
//
// Guarded Init/Load/Unload/Deinit shared by objects, scenes and stages.
//
// States:
//   Uninitialized ──init──▶ Initialized ──load──▶ Loaded
//                 ◀─deinit─             ◀─unload─
//
// Each transition is a no-op when its flag already has the target value.
// The flag only flips when the supplied body reports success.
//
//=========================================================================

//=== Lifecycle ===========================================================

/// Initialized/loaded flags with idempotent transition guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    initialized: bool,
    loaded: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    //--- Guarded Transitions ----------------------------------------------

    /// Runs `body` unless already initialized.
    pub fn init_with(&mut self, body: impl FnOnce() -> bool) -> bool {
        if self.initialized {
            return true;
        }
        self.reinit_with(body)
    }

    /// Runs `body` unconditionally; sets the initialized flag on success.
    pub fn reinit_with(&mut self, body: impl FnOnce() -> bool) -> bool {
        let ok = body();
        if ok {
            self.initialized = true;
        }
        ok
    }

    /// Runs `body` unless already loaded.
    pub fn load_with(&mut self, body: impl FnOnce() -> bool) -> bool {
        if self.loaded {
            return true;
        }
        let ok = body();
        if ok {
            self.loaded = true;
        }
        ok
    }

    /// Runs `body` only when loaded.
    pub fn unload_with(&mut self, body: impl FnOnce() -> bool) -> bool {
        if !self.loaded {
            return true;
        }
        let ok = body();
        if ok {
            self.loaded = false;
        }
        ok
    }

    /// Runs `body` only when initialized.
    pub fn deinit_with(&mut self, body: impl FnOnce() -> bool) -> bool {
        if !self.initialized {
            return true;
        }
        let ok = body();
        if ok {
            self.initialized = false;
        }
        ok
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn init_runs_once() {
        let calls = Cell::new(0);
        let mut state = Lifecycle::new();

        assert!(state.init_with(|| {
            calls.set(calls.get() + 1);
            true
        }));
        assert!(state.init_with(|| {
            calls.set(calls.get() + 1);
            true
        }));

        assert_eq!(calls.get(), 1);
        assert!(state.is_initialized());
    }

    #[test]
    fn reinit_always_runs() {
        let calls = Cell::new(0);
        let mut state = Lifecycle::new();

        for _ in 0..3 {
            state.reinit_with(|| {
                calls.set(calls.get() + 1);
                true
            });
        }

        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn failed_body_keeps_flag() {
        let mut state = Lifecycle::new();
        assert!(!state.load_with(|| false));
        assert!(!state.is_loaded());

        assert!(state.load_with(|| true));
        assert!(state.is_loaded());
    }

    #[test]
    fn unload_and_deinit_guarded_symmetrically() {
        let mut state = Lifecycle::new();

        // Nothing to undo yet
        assert!(state.unload_with(|| panic!("must not run")));
        assert!(state.deinit_with(|| panic!("must not run")));

        state.init_with(|| true);
        state.load_with(|| true);

        assert!(state.unload_with(|| true));
        assert!(!state.is_loaded());
        assert!(state.deinit_with(|| true));
        assert!(!state.is_initialized());
    }
}
