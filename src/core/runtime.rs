//=========================================================================
// Runtime
//=========================================================================
//
// Collaborators shared by every stage and scene of one engine.
//
// Architecture:
//   Arc<Runtime>
//     ├─ pool: WorkerPool           (per-frame object updates)
//     ├─ resources: ResourceCache   (shared, ref-counted assets)
//     └─ diagnostics: Arc<dyn Diagnostics>
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::diagnostics::{Diagnostics, LogDiagnostics};
use crate::core::resource::{AssetLoader, NullLoader, ResourceCache};
use crate::core::worker::WorkerPool;

//=== Runtime =============================================================

/// Worker pool, resource cache and diagnostic sink of one engine.
pub struct Runtime {
    pool: WorkerPool,
    resources: ResourceCache,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Runtime {
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn new(
        workers: usize,
        loader: Arc<dyn AssetLoader>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        info!("Creating runtime with {} workers", workers);

        Self {
            pool: WorkerPool::new(workers),
            resources: ResourceCache::new(loader, Arc::clone(&diagnostics)),
            diagnostics,
        }
    }

    /// Single worker, no assets, `log`-backed diagnostics.
    pub fn minimal() -> Self {
        Self::new(1, Arc::new(NullLoader), Arc::new(LogDiagnostics))
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn resources(&self) -> &ResourceCache {
        &self.resources
    }

    pub fn diagnostics(&self) -> &Arc<dyn Diagnostics> {
        &self.diagnostics
    }

    //--- Shorthands -------------------------------------------------------

    pub fn log(&self, message: &str) {
        self.diagnostics.log(message);
    }

    pub fn fatal(&self, message: &str) -> ! {
        self.diagnostics.fatal(message)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::MemoryLoader;
    use crate::core::testing::RecordingDiagnostics;

    #[test]
    fn resources_share_the_injected_sink() {
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        let runtime = Runtime::new(
            2,
            Arc::new(MemoryLoader::new().with("a", 1u32)),
            diagnostics.clone(),
        );

        let resource = runtime.resources().get_or_create("a");
        let stale = resource.load::<u32>();
        resource.force_unload();
        resource.unload(stale);

        assert!(diagnostics.contains("stale unload"));
        assert_eq!(runtime.pool().size(), 2);
    }

    #[test]
    #[should_panic(expected = "Worker count must be positive")]
    fn zero_workers_rejected() {
        Runtime::new(0, Arc::new(NullLoader), Arc::new(LogDiagnostics));
    }
}
