//=========================================================================
// Resource Cache
//=========================================================================
//
// One shared Resource per normalized path, created on first request and
// kept for the lifetime of the cache.
//
// Reference counting:
//   load()   → first caller performs the physical load; every caller
//              increments the active count
//   unload() → decrements; reaching zero releases the payload
//   force_unload() → releases immediately and bumps the generation,
//              invalidating every outstanding handle
//
// Invariant: payload is present iff the resource is loaded.
//
// Lock order: shared I/O lock, then the resource's own state lock.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::{Asset, AssetKind, AssetLoader, AssetPath, Payload, ResourceHandle};
use crate::core::diagnostics::Diagnostics;

//=== Resource ============================================================

struct ResourceState {
    payload: Option<Payload>,
    kind: Option<AssetKind>,
    active: usize,
    generation: u64,
}

/// A single physical asset instance shared by many consumers.
///
/// Consumers normally go through [`ResourceHandle`]; the raw API takes and
/// returns generation tokens so stale releases can be detected.
pub struct Resource {
    path: AssetPath,
    loader: Arc<dyn AssetLoader>,
    io_lock: Arc<Mutex<()>>,
    diagnostics: Arc<dyn Diagnostics>,
    state: Mutex<ResourceState>,
}

impl Resource {
    fn new(
        path: AssetPath,
        loader: Arc<dyn AssetLoader>,
        io_lock: Arc<Mutex<()>>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            path,
            loader,
            io_lock,
            diagnostics,
            state: Mutex::new(ResourceState {
                payload: None,
                kind: None,
                active: 0,
                generation: 0,
            }),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn path(&self) -> &AssetPath {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().payload.is_some()
    }

    /// Number of handles currently holding the resource loaded.
    pub fn active_count(&self) -> usize {
        self.state.lock().active
    }

    /// Bumped by every forced release.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Type-erased payload, if loaded.
    pub fn payload(&self) -> Option<Payload> {
        self.state.lock().payload.clone()
    }

    //--- Reference Counting -----------------------------------------------

    /// Registers one active user, loading the asset on first use.
    ///
    /// Returns the generation token to hand back to [`Resource::unload`].
    /// A loader error or a kind conflict with the already loaded payload
    /// is fatal.
    pub fn load<T: Asset>(&self) -> u64 {
        let kind = AssetKind::of::<T>();
        let _io = self.io_lock.lock();
        let mut state = self.state.lock();

        match state.kind {
            None => {
                let payload = match self.loader.load(&self.path, kind) {
                    Ok(payload) => payload,
                    Err(err) => self
                        .diagnostics
                        .fatal(&format!("failed to load resource {}: {}", self.path, err)),
                };

                if !payload.is::<T>() {
                    self.diagnostics.fatal(&format!(
                        "resource {} loaded as a different type than {}",
                        self.path,
                        kind.name()
                    ));
                }

                debug!(target: "resource", "Loaded {} as {}", self.path, kind.name());
                state.payload = Some(payload);
                state.kind = Some(kind);
            }
            Some(loaded) if loaded != kind => {
                self.diagnostics.fatal(&format!(
                    "resource {} is loaded as {}, requested as {}",
                    self.path,
                    loaded.name(),
                    kind.name()
                ));
            }
            Some(_) => {}
        }

        state.active += 1;
        trace!(target: "resource", "{} active count -> {}", self.path, state.active);
        state.generation
    }

    /// Drops one active user; the last one releases the asset.
    ///
    /// Returns `false` without touching the count when `generation` is
    /// stale (the resource was force-unloaded since). Releasing a current
    /// generation with no active users is fatal.
    pub fn unload(&self, generation: u64) -> bool {
        let _io = self.io_lock.lock();
        let mut state = self.state.lock();

        if generation != state.generation {
            self.diagnostics.log(&format!(
                "stale unload of {} ignored (generation {} != {})",
                self.path, generation, state.generation
            ));
            return false;
        }

        if state.active == 0 {
            self.diagnostics.fatal(&format!(
                "unload of {} with no active handles",
                self.path
            ));
        }

        state.active -= 1;
        trace!(target: "resource", "{} active count -> {}", self.path, state.active);

        if state.active == 0 {
            self.release(&mut state);
        }
        true
    }

    /// Releases the asset regardless of the active count.
    ///
    /// Every outstanding handle observes itself as inactive afterwards.
    pub fn force_unload(&self) {
        let _io = self.io_lock.lock();
        let mut state = self.state.lock();

        if state.active > 0 {
            debug!(
                target: "resource",
                "Force-unloading {} with {} active handles",
                self.path, state.active
            );
        }

        state.active = 0;
        state.generation += 1;
        self.release(&mut state);
    }

    fn release(&self, state: &mut ResourceState) {
        state.kind = None;
        if state.payload.take().is_some() {
            self.loader.unload(&self.path);
            debug!(target: "resource", "Released {}", self.path);
        }
    }
}

//=== ResourceCache =======================================================

/// Path-keyed store of shared resources.
pub struct ResourceCache {
    entries: Mutex<HashMap<AssetPath, Arc<Resource>>>,
    loader: Arc<dyn AssetLoader>,
    io_lock: Arc<Mutex<()>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ResourceCache {
    pub fn new(loader: Arc<dyn AssetLoader>, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            loader,
            io_lock: Arc::new(Mutex::new(())),
            diagnostics,
        }
    }

    /// Returns the unique resource for `path`, creating it on first request.
    pub fn get_or_create(&self, path: impl Into<AssetPath>) -> Arc<Resource> {
        let path = path.into();
        let mut entries = self.entries.lock();

        entries
            .entry(path.clone())
            .or_insert_with(|| {
                trace!(target: "resource", "Registered {}", path);
                Arc::new(Resource::new(
                    path,
                    Arc::clone(&self.loader),
                    Arc::clone(&self.io_lock),
                    Arc::clone(&self.diagnostics),
                ))
            })
            .clone()
    }

    /// Creates a new, inactive handle on the resource at `path`.
    pub fn handle<T: Asset>(&self, path: impl Into<AssetPath>) -> ResourceHandle<T> {
        ResourceHandle::new(self.get_or_create(path))
    }

    /// Number of known resources, loaded or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of resources currently holding a payload.
    pub fn loaded_count(&self) -> usize {
        let entries: Vec<Arc<Resource>> = self.entries.lock().values().cloned().collect();
        entries.iter().filter(|r| r.is_loaded()).count()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::LogDiagnostics;
    use crate::core::resource::MemoryLoader;
    use crate::core::testing::RecordingDiagnostics;

    fn cache_with(loader: Arc<MemoryLoader>) -> ResourceCache {
        ResourceCache::new(loader, Arc::new(LogDiagnostics))
    }

    //=====================================================================
    // Cache Identity
    //=====================================================================

    #[test]
    fn same_path_returns_same_resource() {
        let cache = cache_with(Arc::new(MemoryLoader::new()));

        let a = cache.get_or_create("textures/cell");
        let b = cache.get_or_create(AssetPath::new("textures/", "cell"));

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn creation_does_not_load() {
        let loader = Arc::new(MemoryLoader::new().with("a", 1u32));
        let cache = cache_with(Arc::clone(&loader));

        let resource = cache.get_or_create("a");

        assert!(!resource.is_loaded());
        assert_eq!(loader.load_count(), 0);
        assert_eq!(cache.loaded_count(), 0);
    }

    //=====================================================================
    // Reference Counting
    //=====================================================================

    #[test]
    fn only_first_load_is_physical() {
        let loader = Arc::new(MemoryLoader::new().with("a", 1u32));
        let cache = cache_with(Arc::clone(&loader));
        let resource = cache.get_or_create("a");

        let g1 = resource.load::<u32>();
        let g2 = resource.load::<u32>();

        assert_eq!(g1, g2);
        assert_eq!(loader.load_count(), 1);
        assert_eq!(resource.active_count(), 2);
        assert!(resource.is_loaded());
    }

    #[test]
    fn last_unload_releases_payload() {
        let loader = Arc::new(MemoryLoader::new().with("a", 1u32));
        let cache = cache_with(Arc::clone(&loader));
        let resource = cache.get_or_create("a");

        let g = resource.load::<u32>();
        resource.load::<u32>();

        assert!(resource.unload(g));
        assert!(resource.is_loaded());
        assert_eq!(loader.unload_count(), 0);

        assert!(resource.unload(g));
        assert!(!resource.is_loaded());
        assert!(resource.payload().is_none());
        assert_eq!(loader.unload_count(), 1);
    }

    #[test]
    fn reload_after_release_is_physical_again() {
        let loader = Arc::new(MemoryLoader::new().with("a", 1u32));
        let cache = cache_with(Arc::clone(&loader));
        let resource = cache.get_or_create("a");

        let g = resource.load::<u32>();
        resource.unload(g);
        resource.load::<u32>();

        assert_eq!(loader.load_count(), 2);
    }

    #[test]
    #[should_panic(expected = "no active handles")]
    fn unload_with_zero_count_is_fatal() {
        let loader = Arc::new(MemoryLoader::new().with("a", 1u32));
        let cache = cache_with(loader);
        let resource = cache.get_or_create("a");

        resource.unload(resource.generation());
    }

    //=====================================================================
    // Forced Release
    //=====================================================================

    #[test]
    fn force_unload_releases_regardless_of_count() {
        let loader = Arc::new(MemoryLoader::new().with("a", 1u32));
        let cache = cache_with(Arc::clone(&loader));
        let resource = cache.get_or_create("a");

        let g = resource.load::<u32>();
        resource.load::<u32>();
        resource.force_unload();

        assert!(!resource.is_loaded());
        assert_eq!(resource.active_count(), 0);
        assert_eq!(resource.generation(), g + 1);
        assert_eq!(loader.unload_count(), 1);
    }

    #[test]
    fn stale_unload_is_ignored_and_logged() {
        let loader = Arc::new(MemoryLoader::new().with("a", 1u32));
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        let cache = ResourceCache::new(loader, diagnostics.clone());
        let resource = cache.get_or_create("a");

        let stale = resource.load::<u32>();
        resource.force_unload();

        assert!(!resource.unload(stale));
        assert_eq!(resource.active_count(), 0);
        assert!(diagnostics.contains("stale unload"));
    }

    //=====================================================================
    // Failures
    //=====================================================================

    #[test]
    #[should_panic(expected = "failed to load resource missing")]
    fn missing_asset_is_fatal() {
        let cache = cache_with(Arc::new(MemoryLoader::new()));
        cache.get_or_create("missing").load::<u32>();
    }

    #[test]
    #[should_panic(expected = "failed to load resource a")]
    fn type_mismatch_is_fatal() {
        let cache = cache_with(Arc::new(MemoryLoader::new().with("a", 1u32)));
        cache.get_or_create("a").load::<String>();
    }

    #[test]
    fn concurrent_loads_trigger_one_physical_load() {
        let loader = Arc::new(MemoryLoader::new().with("shared", 5u64));
        let cache = Arc::new(cache_with(Arc::clone(&loader)));

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.get_or_create("shared").load::<u64>();
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        let resource = cache.get_or_create("shared");
        assert_eq!(loader.load_count(), 1);
        assert_eq!(resource.active_count(), 8);
    }
}
