//=========================================================================
// Scene
//=========================================================================
//
// Scene logic plus its context, and the per-frame sequence around them.
//
// Frame:
//   input    → prompt > message > menu > logic.input   (exactly one)
//   unpaused → logic.update → camera.update
//              → object dispatch (barrier) → logic.post_update
//   always   → overlay and menu ticks
//
// Draw:
//   scene camera    → objects by draw order → logic.draw
//   overlay camera  → dim → menu → message → prompt
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::sync::Arc;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{SceneContext, SceneLogic, Transition};
use crate::core::ids::SceneId;
use crate::core::input::InputSnapshot;
use crate::core::lifecycle::Lifecycle;
use crate::core::render::{Camera, DrawContext};
use crate::core::runtime::Runtime;
use crate::core::time::FrameTime;

//=== Scene ===============================================================

/// A node of a stage's scene tree.
pub struct Scene {
    logic: Box<dyn SceneLogic>,
    context: SceneContext,
}

impl Scene {
    pub(crate) fn new(
        id: SceneId,
        parent: Option<SceneId>,
        runtime: Arc<Runtime>,
        logic: Box<dyn SceneLogic>,
    ) -> Self {
        Self {
            logic,
            context: SceneContext::new(id, parent, runtime),
        }
    }

    pub fn id(&self) -> SceneId {
        self.context.id()
    }

    pub fn parent(&self) -> Option<SceneId> {
        self.context.parent()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.context.lifecycle
    }

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn init(&mut self) -> bool {
        let Self { logic, context } = self;
        let mut lifecycle = context.lifecycle;
        let ok = lifecycle.init_with(|| logic.init(context) & context.init_members());
        self.finish("initialize", lifecycle, ok)
    }

    pub fn load(&mut self) -> bool {
        let Self { logic, context } = self;
        let mut lifecycle = context.lifecycle;
        let ok = lifecycle.load_with(|| logic.load(context) & context.load_members());
        self.finish("load", lifecycle, ok)
    }

    pub fn unload(&mut self) -> bool {
        let Self { logic, context } = self;
        let mut lifecycle = context.lifecycle;
        let ok = lifecycle.unload_with(|| context.unload_members() & logic.unload(context));
        self.finish("unload", lifecycle, ok)
    }

    pub fn deinit(&mut self) -> bool {
        let Self { logic, context } = self;
        let mut lifecycle = context.lifecycle;
        let ok = lifecycle.deinit_with(|| context.deinit_members() & logic.deinit(context));
        self.finish("deinitialize", lifecycle, ok)
    }

    fn finish(&mut self, step: &str, lifecycle: Lifecycle, ok: bool) -> bool {
        self.context.lifecycle = lifecycle;
        if ok {
            debug!(target: "scene", "Scene {}: {} ok", self.id(), step);
        } else {
            self.context
                .runtime()
                .log(&format!("scene {} failed to {}", self.id(), step));
        }
        ok
    }

    //--- Frame ------------------------------------------------------------

    /// One frame of input, simulation and overlay ticks.
    pub(crate) fn frame(&mut self, snapshot: &InputSnapshot, time: &FrameTime) {
        let Self { logic, context } = self;

        context.input.advance(snapshot);
        if !context.route_input() {
            logic.input(context);
        }

        if !context.is_paused() {
            logic.update(context, time);
            context.camera.update(time);
            let dispatched = context.dispatch_objects(time);
            trace!(target: "scene", "Scene {} joined {} updates", context.id(), dispatched);
            logic.post_update(context, time);
        }

        context.tick_overlays(time);
    }

    /// Draws the scene with its own camera, then overlays with
    /// `overlay_camera`.
    pub(crate) fn draw(
        &mut self,
        target: &mut dyn Any,
        overlay_camera: &dyn Camera,
        time: &FrameTime,
    ) {
        let Self { logic, context } = self;
        if !context.is_visible() {
            return;
        }

        {
            let mut ctx = DrawContext::new(&mut *target, &*context.camera, *time);
            context.draw_objects(&mut ctx);
            logic.draw(context, &mut ctx);
        }

        let mut ctx = DrawContext::new(target, overlay_camera, *time);
        context.draw_overlays(&mut ctx);
    }

    /// Makes current and previous input equal so the next frame sees no
    /// edges.
    pub(crate) fn sync_input(&mut self, snapshot: &InputSnapshot) {
        self.context.input.sync(snapshot);
    }

    pub(crate) fn take_requests(&mut self) -> Vec<Transition> {
        self.context.take_requests()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
