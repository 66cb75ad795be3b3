//=========================================================================
// Core Systems
//
// Scene/resource lifecycle and per-frame scheduling.
//
// Layers, leaves first:
// - resource: path-keyed, ref-counted shared assets and their handles
// - object:   game objects and the parallel update dispatch
// - scene:    scenes, scene trees, stages and the stage manager
//
// Supporting pieces:
// - worker / time / input / render / diagnostics / error / ids
// - runtime: the pool, cache and diagnostic sink shared by all stages
//
// Notes:
// Nothing in this module owns a thread of its own besides the worker
// pool. The embedding loop (see `Engine`) calls update and draw once per
// frame on a single scheduling thread.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod input;
pub mod lifecycle;
pub mod object;
pub mod render;
pub mod resource;
pub mod runtime;
pub mod scene;
pub mod time;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use error::{ResourceError, SceneError};
pub use ids::{ObjectId, SceneId, StageId};
pub use lifecycle::Lifecycle;
pub use runtime::Runtime;
pub use time::{FrameClock, FrameTime};
