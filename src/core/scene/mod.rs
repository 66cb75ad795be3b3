//=========================================================================
// Scene System
//=========================================================================
//
// Scene trees, stages and the manager that switches between them.
//
// Architecture:
//   StageManager
//     └─ stages: HashMap<StageId, Stage>
//          └─ scenes: HashMap<SceneId, Scene>   (tree via parent links)
//               ├─ logic: Box<dyn SceneLogic>
//               └─ context: SceneContext        (objects, camera, menu,
//                                               overlays, input, requests)
//
// Flow per frame:
//   manager.update() → stage.update() → scene.frame()
//     → input routing → update → object dispatch (barrier) → post_update
//   manager.draw() → stage.draw() → scene.draw() (+ overlays)
//
//=========================================================================

//=== Module Declarations =================================================

mod branch;
mod container;
mod context;
mod manager;
mod overlay;
mod stage;
mod transition_queue;

//=== Public API ==========================================================

pub use branch::{branch_path, BranchDiff};
pub use container::Scene;
pub use context::SceneContext;
pub use manager::StageManager;
pub use overlay::{
    BlankSkin, Dialog, DialogKind, DialogResponse, DimLayer, OverlaySkin, SharedWidget, Widget,
};
pub use stage::Stage;
pub use transition_queue::{Transition, TransitionQueue};

//=== Internal Dependencies ===============================================

use crate::core::render::DrawContext;
use crate::core::time::FrameTime;

//=== SceneLogic Trait ====================================================

/// Game code behind a scene.
///
/// Every hook receives the scene's [`SceneContext`], through which logic
/// adds objects, reads input, shows overlays and requests transitions.
/// Lifecycle hooks run before the context's members on the way up and
/// after them on the way down.
///
/// # Minimal Implementation
///
/// ```rust
/// # use stagecraft::prelude::*;
/// struct Title;
///
/// impl SceneLogic for Title {
///     fn input(&mut self, scene: &mut SceneContext) {
///         if scene.input().is_key_pressed(KeyCode::Enter) {
///             scene.request(Transition::scene(SceneId(2)));
///         }
///     }
///
///     fn update(&mut self, _scene: &mut SceneContext, _time: &FrameTime) {}
///
///     fn post_update(&mut self, _scene: &mut SceneContext, _time: &FrameTime) {}
/// }
/// ```
pub trait SceneLogic: Send {
    fn init(&mut self, _scene: &mut SceneContext) -> bool {
        true
    }

    fn load(&mut self, _scene: &mut SceneContext) -> bool {
        true
    }

    fn unload(&mut self, _scene: &mut SceneContext) -> bool {
        true
    }

    fn deinit(&mut self, _scene: &mut SceneContext) -> bool {
        true
    }

    /// Called when no prompt, message or menu claimed this frame's input.
    fn input(&mut self, scene: &mut SceneContext);

    /// Scene-level step, before object updates. Skipped while paused.
    fn update(&mut self, scene: &mut SceneContext, time: &FrameTime);

    /// After every object update of the frame has joined. The safe point
    /// for cross-object work. Skipped while paused.
    fn post_update(&mut self, scene: &mut SceneContext, time: &FrameTime);

    /// Drawn after the scene's objects, with the scene camera.
    fn draw(&mut self, _scene: &SceneContext, _ctx: &mut DrawContext<'_>) {}
}
