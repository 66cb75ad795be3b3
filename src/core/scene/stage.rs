//=========================================================================
// Stage
//=========================================================================
//
// Root of one scene tree: one top-level application context such as a
// front end or an in-session world.
//
// Architecture:
//   Stage
//     ├─ scenes: HashMap<SceneId, Scene>   (parent links form the tree)
//     ├─ current: Option<SceneId>
//     ├─ fallback_camera                   (overlay drawing only)
//     └─ requests: TransitionQueue         (stage switches / exit → manager)
//
// Scene switches load the target's branch and optionally unload the
// previous branch, restricted to the parts that diverge (see branch.rs).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::branch::{branch_path, BranchDiff};
use super::{Scene, SceneContext, SceneLogic, Transition, TransitionQueue};
use crate::core::error::SceneError;
use crate::core::ids::{SceneId, StageId};
use crate::core::input::{InputProvider, InputSnapshot};
use crate::core::lifecycle::Lifecycle;
use crate::core::render::{Camera, FixedCamera};
use crate::core::runtime::Runtime;
use crate::core::time::FrameTime;

//=== Stage ===============================================================

/// A scene tree with a single current scene.
pub struct Stage {
    id: StageId,
    runtime: Arc<Runtime>,
    lifecycle: Lifecycle,
    scenes: HashMap<SceneId, Scene>,
    current: Option<SceneId>,
    fallback_camera: Box<dyn Camera>,
    snapshot: InputSnapshot,
    requests: TransitionQueue,
}

impl Stage {
    pub fn new(id: StageId, runtime: Arc<Runtime>) -> Self {
        Self {
            id,
            runtime,
            lifecycle: Lifecycle::new(),
            scenes: HashMap::new(),
            current: None,
            fallback_camera: Box::new(FixedCamera::default()),
            snapshot: InputSnapshot::default(),
            requests: TransitionQueue::new(),
        }
    }

    //--- Scene Tree -------------------------------------------------------

    /// Registers a scene under `parent` (or at the stage root) and returns
    /// its context for setup.
    ///
    /// The parent must already be registered, so the tree stays acyclic.
    pub fn add_scene(
        &mut self,
        id: SceneId,
        parent: Option<SceneId>,
        logic: impl SceneLogic + 'static,
    ) -> Result<&mut SceneContext, SceneError> {
        if self.scenes.contains_key(&id) {
            return Err(SceneError::DuplicateScene(id));
        }
        if let Some(parent) = parent {
            if parent == id {
                return Err(SceneError::SelfParent(id));
            }
            if !self.scenes.contains_key(&parent) {
                return Err(SceneError::UnknownParent { scene: id, parent });
            }
        }

        debug!(target: "stage", "Stage {} registered scene {} (parent {:?})", self.id, id, parent);

        let scene = Scene::new(id, parent, Arc::clone(&self.runtime), Box::new(logic));
        Ok(self.scenes.entry(id).or_insert(scene).context_mut())
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(&id)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Direct children of `id`, ascending.
    pub fn children(&self, id: SceneId) -> Vec<SceneId> {
        let mut children: Vec<SceneId> = self
            .scenes
            .values()
            .filter(|scene| scene.parent() == Some(id))
            .map(Scene::id)
            .collect();
        children.sort();
        children
    }

    /// Path from `id` to the stage root, leaf first.
    pub fn branch(&self, id: SceneId) -> Vec<SceneId> {
        branch_path(id, |scene| self.parent_of(scene))
    }

    /// Load/unload sets for switching from `previous` to `target`.
    pub fn diff(&self, target: Option<SceneId>, previous: Option<SceneId>) -> BranchDiff {
        BranchDiff::between(target, previous, |scene| self.parent_of(scene))
    }

    fn parent_of(&self, id: SceneId) -> Option<SceneId> {
        self.scenes.get(&id).and_then(Scene::parent)
    }

    //--- Current Scene ----------------------------------------------------

    pub fn id(&self) -> StageId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn current_scene(&self) -> Option<SceneId> {
        self.current
    }

    /// Picks the scene the stage starts in, without touching lifecycles.
    pub fn set_entry_scene(&mut self, id: SceneId) -> bool {
        if !self.scenes.contains_key(&id) {
            self.soft_miss(id);
            return false;
        }
        self.current = Some(id);
        true
    }

    /// Switches the current scene.
    ///
    /// Loads the target's branch (initializing each scene on it first),
    /// then unloads and/or deinitializes the divergent part of the
    /// previous branch. An unknown id is logged and leaves the current
    /// scene unchanged.
    pub fn set_current_scene(
        &mut self,
        id: SceneId,
        unload_previous: bool,
        deinit_previous: bool,
    ) -> bool {
        if !self.scenes.contains_key(&id) {
            self.soft_miss(id);
            return false;
        }

        let previous = self.current;
        let diff = self.diff(Some(id), previous);
        let mut ok = true;

        for &scene_id in &diff.load {
            ok &= self.with_scene(scene_id, |scene| scene.init() & scene.load());
        }
        ok &= self.with_scene(id, |scene| scene.init() & scene.load());

        if unload_previous {
            for &scene_id in &diff.unload {
                ok &= self.with_scene(scene_id, Scene::unload);
            }
        }
        if deinit_previous {
            for &scene_id in &diff.unload {
                ok &= self.with_scene(scene_id, Scene::deinit);
            }
        }

        self.current = Some(id);
        let snapshot = self.snapshot.clone();
        self.with_scene(id, |scene| {
            scene.sync_input(&snapshot);
            true
        });

        info!(
            target: "stage",
            "Stage {} switched scene {:?} -> {} (load {:?}, unload {:?})",
            self.id, previous, id, diff.load, diff.unload
        );

        if !ok {
            self.runtime
                .log(&format!("stage {}: switch to scene {} partially failed", self.id, id));
        }
        ok
    }

    fn soft_miss(&self, id: SceneId) {
        warn!(target: "stage", "Stage {} has no scene {}", self.id, id);
        self.runtime
            .log(&format!("stage {}: scene {} not found", self.id, id));
    }

    fn with_scene(&mut self, id: SceneId, step: impl FnOnce(&mut Scene) -> bool) -> bool {
        match self.scenes.get_mut(&id) {
            Some(scene) => step(scene),
            None => false,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Initializes the fallback camera and the current branch.
    ///
    /// A stage without a current scene is a wiring error and fatal.
    pub fn init(&mut self) -> bool {
        let branch = self.current_branch();
        let mut lifecycle = self.lifecycle;
        let ok = lifecycle.init_with(|| {
            let mut ok = self.fallback_camera.init();
            for &id in &branch {
                ok &= self.with_scene(id, Scene::init);
            }
            ok
        });
        self.lifecycle = lifecycle;
        ok
    }

    /// Loads the fallback camera and the current branch, ancestor to leaf.
    pub fn load(&mut self) -> bool {
        let branch = self.current_branch();
        let mut lifecycle = self.lifecycle;
        let ok = lifecycle.load_with(|| {
            let mut ok = self.fallback_camera.load();
            for &id in &branch {
                ok &= self.with_scene(id, |scene| scene.init() & scene.load());
            }
            ok
        });
        self.lifecycle = lifecycle;
        ok
    }

    /// Unloads every scene of the stage, leaves first.
    pub fn unload(&mut self) -> bool {
        let order = self.teardown_order();
        let mut lifecycle = self.lifecycle;
        let ok = lifecycle.unload_with(|| {
            let mut ok = true;
            for &id in &order {
                ok &= self.with_scene(id, Scene::unload);
            }
            ok & self.fallback_camera.unload()
        });
        self.lifecycle = lifecycle;
        ok
    }

    /// Deinitializes every scene of the stage, leaves first.
    pub fn deinit(&mut self) -> bool {
        let order = self.teardown_order();
        let mut lifecycle = self.lifecycle;
        let ok = lifecycle.deinit_with(|| {
            let mut ok = true;
            for &id in &order {
                ok &= self.with_scene(id, Scene::deinit);
            }
            ok & self.fallback_camera.deinit()
        });
        self.lifecycle = lifecycle;
        ok
    }

    /// Current branch, ancestor to leaf.
    fn current_branch(&self) -> Vec<SceneId> {
        let Some(current) = self.current else {
            self.runtime
                .fatal(&format!("stage {} has no current scene", self.id));
        };
        let mut branch = self.branch(current);
        branch.reverse();
        branch
    }

    fn teardown_order(&self) -> Vec<SceneId> {
        let mut order: Vec<(usize, SceneId)> = self
            .scenes
            .keys()
            .map(|&id| (self.branch(id).len(), id))
            .collect();
        order.sort_by_key(|&(depth, id)| (Reverse(depth), id));
        order.into_iter().map(|(_, id)| id).collect()
    }

    //--- Overlay Camera ---------------------------------------------------

    /// Replaces the camera used for overlay drawing.
    pub fn set_fallback_camera(&mut self, camera: impl Camera + 'static) {
        self.fallback_camera = Box::new(camera);
    }

    pub fn fallback_camera(&self) -> &dyn Camera {
        &*self.fallback_camera
    }

    //--- Frame ------------------------------------------------------------

    /// Polls input once, runs the current scene's frame, then applies
    /// the scene's transition requests.
    pub fn update(&mut self, input: &mut dyn InputProvider, time: &FrameTime) {
        let Some(current) = self.current else {
            self.runtime
                .fatal(&format!("stage {} updated without a current scene", self.id));
        };

        self.snapshot = input.poll();

        let snapshot = &self.snapshot;
        let requests = match self.scenes.get_mut(&current) {
            Some(scene) => {
                scene.frame(snapshot, time);
                scene.take_requests()
            }
            None => self
                .runtime
                .fatal(&format!("stage {}: current scene {} vanished", self.id, current)),
        };

        for request in requests {
            match request {
                Transition::Scene {
                    id,
                    unload_previous,
                    deinit_previous,
                } => {
                    self.set_current_scene(id, unload_previous, deinit_previous);
                }
                other => self.requests.push(other),
            }
        }
    }

    /// Draws the current scene; overlays use the fallback camera.
    pub fn draw(&mut self, target: &mut dyn Any, time: &FrameTime) {
        let Some(current) = self.current else {
            return;
        };
        if let Some(scene) = self.scenes.get_mut(&current) {
            scene.draw(target, &*self.fallback_camera, time);
        }
    }

    /// Stage switches and exit requests for the manager.
    pub(crate) fn take_requests(&mut self) -> Vec<Transition> {
        self.requests.take()
    }

    //--- Input Sync -------------------------------------------------------

    /// Snapshot polled by the last `update`.
    pub(crate) fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    /// Adopts `snapshot` as the last polled input and syncs the current
    /// scene to it, so a key held across a stage switch is not a press.
    pub(crate) fn sync_input(&mut self, snapshot: &InputSnapshot) {
        self.snapshot = snapshot.clone();
        if let Some(scene) = self.current.and_then(|id| self.scenes.get_mut(&id)) {
            scene.sync_input(snapshot);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
