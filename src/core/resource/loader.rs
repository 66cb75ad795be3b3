//=========================================================================
// Asset Loader
//=========================================================================
//
// Boundary to the physical asset decoder.
//
// The cache treats decoding as opaque: a loader turns a path and an asset
// kind into a type-erased payload, and is told when that payload is
// released. Calls are serialized by the cache's I/O lock, so a loader
// must not call back into the cache.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::trace;
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::AssetPath;
use crate::core::error::ResourceError;

//=== Asset Marker ========================================================

/// Marker trait for types a resource can hold.
///
/// Automatically implemented for all types that are Any + Send + Sync.
pub trait Asset: Any + Send + Sync {}

// Blanket implementation
impl<T: Any + Send + Sync> Asset for T {}

/// Type-erased asset payload shared by every handle of a resource.
pub type Payload = Arc<dyn Any + Send + Sync>;

//=== AssetKind ===========================================================

/// Runtime description of the asset type a handle expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetKind {
    name: &'static str,
    type_id: TypeId,
}

impl AssetKind {
    pub fn of<T: Asset>() -> Self {
        Self {
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

//=== AssetLoader Trait ===================================================

/// Physical loader injected into the resource cache.
pub trait AssetLoader: Send + Sync {
    /// Decodes the asset at `path` as `kind`.
    fn load(&self, path: &AssetPath, kind: AssetKind) -> Result<Payload, ResourceError>;

    /// Releases whatever `load` acquired for `path`.
    fn unload(&self, path: &AssetPath);
}

//=== NullLoader ==========================================================

/// Loader with no assets. Every load reports the asset missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLoader;

impl AssetLoader for NullLoader {
    fn load(&self, path: &AssetPath, _kind: AssetKind) -> Result<Payload, ResourceError> {
        Err(ResourceError::Missing(path.clone()))
    }

    fn unload(&self, _path: &AssetPath) {}
}

//=== MemoryLoader ========================================================

/// In-memory asset store.
///
/// Registered values are handed out as payloads; the loader counts
/// physical loads and unloads so callers can observe cache behaviour.
#[derive(Default)]
pub struct MemoryLoader {
    assets: Mutex<HashMap<AssetPath, Payload>>,
    loads: AtomicUsize,
    unloads: AtomicUsize,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` under `path` (builder form).
    pub fn with<T: Asset>(self, path: impl Into<AssetPath>, value: T) -> Self {
        self.insert(path, value);
        self
    }

    /// Registers `value` under `path`, replacing any previous value.
    pub fn insert<T: Asset>(&self, path: impl Into<AssetPath>, value: T) {
        self.assets.lock().insert(path.into(), Arc::new(value));
    }

    /// Number of physical loads served so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of physical unloads received so far.
    pub fn unload_count(&self) -> usize {
        self.unloads.load(Ordering::SeqCst)
    }
}

impl AssetLoader for MemoryLoader {
    fn load(&self, path: &AssetPath, kind: AssetKind) -> Result<Payload, ResourceError> {
        let payload = self
            .assets
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::Missing(path.clone()))?;

        if (*payload).type_id() != kind.type_id() {
            return Err(ResourceError::TypeMismatch {
                path: path.clone(),
                expected: kind.name(),
            });
        }

        self.loads.fetch_add(1, Ordering::SeqCst);
        trace!(target: "resource", "MemoryLoader served {}", path);
        Ok(payload)
    }

    fn unload(&self, path: &AssetPath) {
        self.unloads.fetch_add(1, Ordering::SeqCst);
        trace!(target: "resource", "MemoryLoader released {}", path);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_loader_reports_missing() {
        let path = AssetPath::parse("textures/cell");
        let result = NullLoader.load(&path, AssetKind::of::<String>());
        assert!(matches!(result, Err(ResourceError::Missing(p)) if p == path));
    }

    #[test]
    fn memory_loader_serves_registered_value() {
        let loader = MemoryLoader::new().with("fonts/title", String::from("Arial"));
        let payload = loader
            .load(&AssetPath::parse("fonts/title"), AssetKind::of::<String>())
            .unwrap();

        assert_eq!(payload.downcast_ref::<String>().unwrap(), "Arial");
        assert_eq!(loader.load_count(), 1);
    }

    #[test]
    fn memory_loader_detects_type_mismatch() {
        let loader = MemoryLoader::new().with("sounds/pop", 7u32);
        let result = loader.load(&AssetPath::parse("sounds/pop"), AssetKind::of::<String>());

        assert!(matches!(result, Err(ResourceError::TypeMismatch { .. })));
        assert_eq!(loader.load_count(), 0);
    }

    #[test]
    fn asset_kind_carries_type_name() {
        let kind = AssetKind::of::<u64>();
        assert_eq!(kind.name(), "u64");
        assert_eq!(kind.type_id(), TypeId::of::<u64>());
    }
}
