//=========================================================================
// Resource Handle
//=========================================================================
//
// Per-consumer proxy onto a shared Resource.
//
// A handle is active between a successful load() and the matching
// unload(). It records the resource generation it loaded under, so a
// forced release elsewhere deactivates it without a broadcast list.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::marker::PhantomData;
use std::sync::Arc;

//=== Internal Dependencies ===============================================

use super::{Asset, AssetPath, Resource};

//=== ResourceHandle ======================================================

/// Typed, per-consumer view of a shared [`Resource`].
///
/// Dropping an active handle unloads it.
pub struct ResourceHandle<T: Asset> {
    resource: Arc<Resource>,
    generation: Option<u64>,
    _asset: PhantomData<fn() -> T>,
}

impl<T: Asset> ResourceHandle<T> {
    pub(crate) fn new(resource: Arc<Resource>) -> Self {
        Self {
            resource,
            generation: None,
            _asset: PhantomData,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Activates the handle, loading the shared asset if needed.
    ///
    /// No-op while already active.
    pub fn load(&mut self) {
        if self.is_active() {
            return;
        }
        self.generation = Some(self.resource.load::<T>());
    }

    /// Deactivates the handle. The last active handle releases the asset.
    ///
    /// No-op while inactive, including after a forced release.
    pub fn unload(&mut self) {
        if let Some(generation) = self.generation.take() {
            self.resource.unload(generation);
        }
    }

    /// Releases the shared asset immediately, deactivating every handle.
    pub fn force_unload(&mut self) {
        self.generation = None;
        self.resource.force_unload();
    }

    //--- Queries ----------------------------------------------------------

    /// `true` between `load()` and `unload()`, unless force-unloaded since.
    pub fn is_active(&self) -> bool {
        self.generation == Some(self.resource.generation())
    }

    /// Typed payload, available only while active.
    pub fn get(&self) -> Option<Arc<T>> {
        if !self.is_active() {
            return None;
        }
        self.resource.payload()?.downcast::<T>().ok()
    }

    pub fn path(&self) -> &AssetPath {
        self.resource.path()
    }

    pub fn resource(&self) -> &Arc<Resource> {
        &self.resource
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T: Asset> Drop for ResourceHandle<T> {
    fn drop(&mut self) {
        if self.is_active() {
            self.unload();
        }
    }
}

impl<T: Asset> std::fmt::Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("path", self.resource.path())
            .field("active", &self.is_active())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
