//=========================================================================
// Scene Context
//=========================================================================
//
// Everything a scene owns apart from its logic: objects, camera, menu,
// overlays, input view and pending transition requests.
//
// Scene logic receives `&mut SceneContext` in every hook, so game code
// manipulates its scene through this type.
//
// Lifecycle cascade order:
//   init / load     → objects, camera, owned menu, overlays
//   unload / deinit → overlays, owned menu, camera, objects
// Every member is attempted; results aggregate with AND.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::overlay::{Dialog, DimLayer, MenuBinding, OverlaySkin, Overlays, SharedWidget, Widget};
use super::{Transition, TransitionQueue};
use crate::core::error::SceneError;
use crate::core::ids::{ObjectId, SceneId};
use crate::core::input::InputState;
use crate::core::lifecycle::Lifecycle;
use crate::core::object::{dispatch_updates, ObjectNode, SharedObject};
use crate::core::render::{Camera, Color, DrawContext, FixedCamera};
use crate::core::resource::ResourceCache;
use crate::core::runtime::Runtime;
use crate::core::time::FrameTime;

//=== SceneContext ========================================================

/// State and members of one scene.
pub struct SceneContext {
    id: SceneId,
    parent: Option<SceneId>,
    runtime: Arc<Runtime>,
    pub(crate) lifecycle: Lifecycle,
    paused: bool,
    visible: bool,
    clear_color: Color,
    objects: BTreeMap<ObjectId, SharedObject>,
    next_object: u32,
    pub(crate) camera: Box<dyn Camera>,
    menu: Option<MenuBinding>,
    overlays: Overlays,
    pub(crate) input: InputState,
    requests: TransitionQueue,
}

impl SceneContext {
    pub(crate) fn new(id: SceneId, parent: Option<SceneId>, runtime: Arc<Runtime>) -> Self {
        Self {
            id,
            parent,
            runtime,
            lifecycle: Lifecycle::new(),
            paused: false,
            visible: true,
            clear_color: Color::BLACK,
            objects: BTreeMap::new(),
            next_object: 0,
            camera: Box::new(FixedCamera::default()),
            menu: None,
            overlays: Overlays::default(),
            input: InputState::new(),
            requests: TransitionQueue::new(),
        }
    }

    //--- Identity ---------------------------------------------------------

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn parent(&self) -> Option<SceneId> {
        self.parent
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    pub fn resources(&self) -> &ResourceCache {
        self.runtime.resources()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    //--- Flags ------------------------------------------------------------

    /// A paused scene skips update, object dispatch and post-update.
    /// Overlays and the menu keep running.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    //--- Objects ----------------------------------------------------------

    /// Adds `node` under the next free id.
    ///
    /// The node is brought up to the scene's current lifecycle state.
    pub fn add_object(&mut self, node: ObjectNode) -> ObjectId {
        while self.objects.contains_key(&ObjectId(self.next_object)) {
            self.next_object += 1;
        }
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.attach(id, node);
        id
    }

    /// Adds `node` under an explicit id.
    pub fn insert_object(&mut self, id: ObjectId, node: ObjectNode) -> Result<(), SceneError> {
        if self.objects.contains_key(&id) {
            return Err(SceneError::DuplicateObject(id));
        }
        self.attach(id, node);
        Ok(())
    }

    /// Unloads, deinitializes and detaches an object.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SharedObject> {
        let object = self.objects.remove(&id)?;
        {
            let mut node = object.lock();
            let ok = node.unload() & node.deinit();
            if !ok {
                self.runtime
                    .log(&format!("scene {}: teardown of object {} failed", self.id, id));
            }
        }
        trace!(target: "scene", "Scene {} removed object {}", self.id, id);
        Some(object)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SharedObject> {
        self.objects.get(&id)
    }

    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn attach(&mut self, id: ObjectId, mut node: ObjectNode) {
        if !bring_up(self.lifecycle, |init| if init { node.init() } else { node.load() }) {
            self.runtime
                .log(&format!("scene {}: object {} failed to come up", self.id, id));
        }
        self.objects.insert(id, node.into_shared());
    }

    //--- Camera -----------------------------------------------------------

    /// Replaces the scene camera, bringing the new one up to the scene's
    /// lifecycle state and tearing the old one down.
    pub fn set_camera(&mut self, camera: impl Camera + 'static) {
        let mut camera: Box<dyn Camera> = Box::new(camera);
        bring_up(self.lifecycle, |init| if init { camera.init() } else { camera.load() });

        let mut old = std::mem::replace(&mut self.camera, camera);
        if self.lifecycle.is_loaded() {
            old.unload();
        }
        if self.lifecycle.is_initialized() {
            old.deinit();
        }
    }

    pub fn camera(&self) -> &dyn Camera {
        &*self.camera
    }

    //--- Menu -------------------------------------------------------------

    /// Binds a menu owned by this scene. Returns a handle child scenes
    /// can inherit.
    pub fn set_menu(&mut self, widget: impl Widget + 'static) -> SharedWidget {
        let widget: SharedWidget = Arc::new(Mutex::new(widget));
        {
            let mut menu = widget.lock();
            bring_up(self.lifecycle, |init| if init { menu.init() } else { menu.load() });
        }
        self.release_menu();
        self.menu = Some(MenuBinding {
            widget: Arc::clone(&widget),
            owned: true,
        });
        widget
    }

    /// Binds a menu owned by another scene. Its lifecycle is not driven
    /// from here.
    pub fn inherit_menu(&mut self, widget: SharedWidget) {
        self.release_menu();
        self.menu = Some(MenuBinding {
            widget,
            owned: false,
        });
    }

    pub fn clear_menu(&mut self) {
        self.release_menu();
        self.menu = None;
    }

    pub fn menu(&self) -> Option<&SharedWidget> {
        self.menu.as_ref().map(|binding| &binding.widget)
    }

    pub fn owns_menu(&self) -> bool {
        self.menu.as_ref().is_some_and(|binding| binding.owned)
    }

    fn release_menu(&mut self) {
        if let Some(binding) = self.menu.as_ref().filter(|binding| binding.owned) {
            let mut menu = binding.widget.lock();
            if self.lifecycle.is_loaded() {
                menu.unload();
            }
            if self.lifecycle.is_initialized() {
                menu.deinit();
            }
        }
    }

    //--- Overlays ---------------------------------------------------------

    /// Clears the message box's buttons, binds a dismiss button, sets the
    /// label and shows it.
    pub fn show_message(&mut self, text: impl Into<String>) -> &mut Dialog {
        debug!(target: "scene", "Scene {} shows message", self.id);
        self.overlays.message.show(text, "OK")
    }

    /// Like [`show_message`](Self::show_message) for the prompt. Add the
    /// prompt's choices to the returned dialog; they precede "Cancel".
    pub fn show_prompt(&mut self, text: impl Into<String>) -> &mut Dialog {
        debug!(target: "scene", "Scene {} shows prompt", self.id);
        self.overlays.prompt.show(text, "Cancel")
    }

    pub fn message(&self) -> &Dialog {
        &self.overlays.message
    }

    pub fn message_mut(&mut self) -> &mut Dialog {
        &mut self.overlays.message
    }

    pub fn prompt(&self) -> &Dialog {
        &self.overlays.prompt
    }

    pub fn prompt_mut(&mut self) -> &mut Dialog {
        &mut self.overlays.prompt
    }

    pub fn dim(&self) -> &DimLayer {
        &self.overlays.dim
    }

    pub fn dim_mut(&mut self) -> &mut DimLayer {
        &mut self.overlays.dim
    }

    /// Replaces the overlay skin. Call before the scene initializes.
    pub fn set_overlay_skin(&mut self, skin: impl OverlaySkin + 'static) {
        self.overlays.skin = Box::new(skin);
    }

    //--- Input & Requests -------------------------------------------------

    /// Device state as seen by this scene this frame.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Queues a switch for the end of the frame.
    pub fn request(&mut self, transition: Transition) {
        self.requests.push(transition);
    }

    pub(crate) fn take_requests(&mut self) -> Vec<Transition> {
        self.requests.take()
    }

    //--- Lifecycle Cascade ------------------------------------------------

    pub(crate) fn init_members(&mut self) -> bool {
        let mut ok = true;
        for object in self.objects.values() {
            ok &= object.lock().init();
        }
        ok &= self.camera.init();
        if let Some(menu) = self.owned_menu() {
            ok &= menu.lock().init();
        }
        ok & self.overlays.init()
    }

    pub(crate) fn load_members(&mut self) -> bool {
        let mut ok = true;
        for object in self.objects.values() {
            let mut node = object.lock();
            ok &= node.init() & node.load();
        }
        ok &= self.camera.load();
        if let Some(menu) = self.owned_menu() {
            ok &= menu.lock().load();
        }
        ok & self.overlays.load()
    }

    pub(crate) fn unload_members(&mut self) -> bool {
        let mut ok = self.overlays.unload();
        if let Some(menu) = self.owned_menu() {
            ok &= menu.lock().unload();
        }
        ok &= self.camera.unload();
        for object in self.objects.values() {
            ok &= object.lock().unload();
        }
        ok
    }

    pub(crate) fn deinit_members(&mut self) -> bool {
        let mut ok = self.overlays.deinit();
        if let Some(menu) = self.owned_menu() {
            ok &= menu.lock().deinit();
        }
        ok &= self.camera.deinit();
        for object in self.objects.values() {
            ok &= object.lock().deinit();
        }
        ok
    }

    fn owned_menu(&self) -> Option<SharedWidget> {
        self.menu
            .as_ref()
            .filter(|binding| binding.owned)
            .map(|binding| Arc::clone(&binding.widget))
    }

    //--- Frame ------------------------------------------------------------

    /// Drives prompt, message or menu with this frame's input. Returns
    /// `false` when none of them is active and the scene logic should
    /// receive input instead.
    pub(crate) fn route_input(&mut self) -> bool {
        if self.overlays.input(&self.input, &mut self.requests) {
            return true;
        }

        match &self.menu {
            Some(binding) => {
                let mut menu = binding.widget.lock();
                if !menu.is_active() {
                    return false;
                }
                menu.input(&self.input, &mut self.requests);
                true
            }
            None => false,
        }
    }

    /// Object fan-out; blocks until every active object has updated.
    pub(crate) fn dispatch_objects(&self, time: &FrameTime) -> usize {
        dispatch_updates(self.runtime.pool(), self.objects.values(), time)
    }

    /// Overlay and menu ticks, run even while paused.
    pub(crate) fn tick_overlays(&mut self, time: &FrameTime) {
        self.overlays.update(self.paused, time);

        if let Some(binding) = &self.menu {
            let mut menu = binding.widget.lock();
            if menu.is_active() {
                menu.update(time);
                menu.animate(time);
            }
        }
    }

    /// Visible objects by draw order, ties by id.
    pub(crate) fn draw_objects(&self, ctx: &mut DrawContext<'_>) {
        let mut ordered: Vec<(i32, ObjectId, &SharedObject)> = self
            .objects
            .iter()
            .map(|(id, object)| (object.lock().draw_order(), *id, object))
            .collect();
        ordered.sort_by_key(|(order, id, _)| (*order, *id));

        for (_, _, object) in ordered {
            object.lock().draw(ctx);
        }
    }

    /// Dim layer, menu, then dialogs.
    pub(crate) fn draw_overlays(&mut self, ctx: &mut DrawContext<'_>) {
        self.overlays.draw_dim(ctx);

        if let Some(binding) = &self.menu {
            let mut menu = binding.widget.lock();
            if menu.is_active() {
                menu.draw(ctx);
            }
        }

        self.overlays.draw_dialogs(ctx);
    }
}

//=== Helpers =============================================================

/// Runs `step(true)` (init) and/or `step(false)` (load) to match
/// `lifecycle`. Returns the aggregate result.
fn bring_up(lifecycle: Lifecycle, mut step: impl FnMut(bool) -> bool) -> bool {
    let mut ok = true;
    if lifecycle.is_initialized() {
        ok &= step(true);
    }
    if lifecycle.is_loaded() {
        ok &= step(false);
    }
    ok
}
