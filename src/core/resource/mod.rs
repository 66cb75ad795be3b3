//=========================================================================
// Resource System
//=========================================================================
//
// Path-keyed, reference-counted shared assets.
//
// Architecture:
//   ResourceCache
//     └─ entries: HashMap<AssetPath, Arc<Resource>>
//          └─ Resource (payload + active count + generation)
//               ▲
//   ResourceHandle<T> (one per consumer, local active flag)
//
// Physical I/O goes through the injected AssetLoader under a single lock
// shared by every path.
//
//=========================================================================

//=== Module Declarations =================================================

mod cache;
mod handle;
mod loader;
mod path;

//=== Public API ==========================================================

pub use cache::{Resource, ResourceCache};
pub use handle::ResourceHandle;
pub use loader::{Asset, AssetKind, AssetLoader, MemoryLoader, NullLoader, Payload};
pub use path::AssetPath;
