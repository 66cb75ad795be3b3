//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagecraft::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, TickControl};
pub use crate::core::{FrameTime, ObjectId, Runtime, SceneId, StageId};

// Objects
pub use crate::core::object::{GameObject, ObjectNode};

// Scenes and stages
pub use crate::core::scene::{
    DialogResponse, SceneContext, SceneLogic, Stage, StageManager, Transition, Widget,
};

// Rendering boundary
pub use crate::core::render::{Camera, Color, DrawContext};

// Input
pub use crate::core::input::{InputProvider, InputState, KeyCode, MouseButton, PadButton};

// Resources
pub use crate::core::resource::{AssetLoader, AssetPath, ResourceHandle};
