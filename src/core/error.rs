//=========================================================================
// Error Types
//=========================================================================
//
// Typed errors for asset loading and scene-graph registration.
//
// Per-frame lifecycle operations report soft failures as `bool`; these
// types cover the boundaries where a reason is worth carrying.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::ids::{ObjectId, SceneId, StageId};
use crate::core::resource::AssetPath;

//=== ResourceError =======================================================

/// Failure reported by an [`AssetLoader`](crate::core::resource::AssetLoader).
///
/// The resource cache never retries: any of these is escalated to a fatal
/// assert at the resource boundary.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("asset not found: {0}")]
    Missing(AssetPath),

    #[error("asset {path} is malformed: {reason}")]
    Malformed { path: AssetPath, reason: String },

    #[error("asset {path} is not a {expected}")]
    TypeMismatch {
        path: AssetPath,
        expected: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//=== SceneError ==========================================================

/// Registration errors for stages, scenes and objects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene {0} is already registered")]
    DuplicateScene(SceneId),

    #[error("scene {scene} names unknown parent {parent}")]
    UnknownParent { scene: SceneId, parent: SceneId },

    #[error("scene {0} cannot be its own parent")]
    SelfParent(SceneId),

    #[error("scene {0} is not registered")]
    UnknownScene(SceneId),

    #[error("object {0} already exists in this container")]
    DuplicateObject(ObjectId),

    #[error("stage {0} is already registered")]
    DuplicateStage(StageId),

    #[error("stage {0} is not registered")]
    UnknownStage(StageId),
}

//=========================================================================
// Unit Tests
//=========================================================================
