//=========================================================================
// Stage Manager
//=========================================================================
//
// Holds every stage, switches the current one and owns the
// continue-running flag the embedding loop polls.
//
// Architecture:
//   StageManager
//     ├─ stages: HashMap<StageId, Stage>
//     ├─ current: Option<StageId>
//     ├─ snapshot: InputSnapshot   (last input polled by any stage)
//     └─ running: bool   (starts true, never set back once cleared)
//
// Flow:
//   update() → current stage update → drain stage requests
//            → set_current_stage() / request_exit()
//
// Stage switches are coarse: the target is initialized and loaded in
// full, with no branch diffing across stages.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::{Stage, Transition};
use crate::core::error::SceneError;
use crate::core::ids::StageId;
use crate::core::input::{InputProvider, InputSnapshot};
use crate::core::runtime::Runtime;
use crate::core::time::FrameTime;

//=== StageManager ========================================================

/// All stages of an application and the master run flag.
pub struct StageManager {
    runtime: Arc<Runtime>,
    stages: HashMap<StageId, Stage>,
    current: Option<StageId>,
    snapshot: InputSnapshot,
    running: bool,
}

impl StageManager {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            runtime,
            stages: HashMap::new(),
            current: None,
            snapshot: InputSnapshot::default(),
            running: true,
        }
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    //--- Registration -----------------------------------------------------

    /// Creates an empty stage and returns it for setup.
    pub fn add_stage(&mut self, id: StageId) -> Result<&mut Stage, SceneError> {
        if self.stages.contains_key(&id) {
            return Err(SceneError::DuplicateStage(id));
        }
        let stage = Stage::new(id, Arc::clone(&self.runtime));
        Ok(self.stages.entry(id).or_insert(stage))
    }

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.get(&id)
    }

    pub fn stage_mut(&mut self, id: StageId) -> Option<&mut Stage> {
        self.stages.get_mut(&id)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    //--- Current Stage ----------------------------------------------------

    pub fn current_stage(&self) -> Option<StageId> {
        self.current
    }

    pub fn current(&self) -> Option<&Stage> {
        self.current.and_then(|id| self.stages.get(&id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Stage> {
        self.current.and_then(|id| self.stages.get_mut(&id))
    }

    /// Picks the stage the application starts in, without touching
    /// lifecycles.
    pub fn set_entry_stage(&mut self, id: StageId) -> Result<(), SceneError> {
        if !self.stages.contains_key(&id) {
            return Err(SceneError::UnknownStage(id));
        }
        self.current = Some(id);
        Ok(())
    }

    /// Switches the current stage.
    ///
    /// Initializes and loads the target in full, then unloads and/or
    /// deinitializes the previous stage. The target's current scene is
    /// synced to the last polled input. An unknown id is logged and
    /// leaves the current stage unchanged.
    pub fn set_current_stage(
        &mut self,
        id: StageId,
        unload_previous: bool,
        deinit_previous: bool,
    ) -> bool {
        let Some(target) = self.stages.get_mut(&id) else {
            warn!(target: "stage", "No stage {}", id);
            self.runtime.log(&format!("stage {} not found", id));
            return false;
        };

        let mut ok = target.init() & target.load();

        let previous = self.current.filter(|&previous| previous != id);
        if let Some(stage) = previous.and_then(|previous| self.stages.get_mut(&previous)) {
            if unload_previous {
                ok &= stage.unload();
            }
            if deinit_previous {
                ok &= stage.deinit();
            }
        }

        if let Some(target) = self.stages.get_mut(&id) {
            target.sync_input(&self.snapshot);
        }

        info!(target: "stage", "Switched stage {:?} -> {}", self.current, id);
        self.current = Some(id);

        if !ok {
            self.runtime
                .log(&format!("switch to stage {} partially failed", id));
        }
        ok
    }

    //--- Run Flag ---------------------------------------------------------

    /// Performs the startup checks and brings the current stage up.
    ///
    /// A missing current stage or scene, or a failed first load, is fatal.
    pub fn start(&mut self) {
        let Some(id) = self.current else {
            self.runtime.fatal("no current stage at startup");
        };
        let Some(stage) = self.stages.get_mut(&id) else {
            self.runtime
                .fatal(&format!("current stage {} is not registered", id));
        };
        if stage.current_scene().is_none() {
            self.runtime
                .fatal(&format!("stage {} has no current scene at startup", id));
        }

        if !(stage.init() & stage.load()) {
            self.runtime
                .fatal(&format!("stage {} failed its first load", id));
        }

        info!(target: "stage", "Started in stage {}", id);
    }

    /// `false` once exit has been requested; the embedding loop must stop.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Clears the run flag for good.
    pub fn request_exit(&mut self) {
        if self.running {
            info!(target: "stage", "Exit requested");
        }
        self.running = false;
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one frame of the current stage and applies its requests.
    pub fn update(&mut self, input: &mut dyn InputProvider, time: &FrameTime) {
        if !self.running {
            return;
        }

        let current = self.current;
        let requests = match current.and_then(|id| self.stages.get_mut(&id)) {
            Some(stage) => {
                stage.update(input, time);
                self.snapshot = stage.snapshot().clone();
                stage.take_requests()
            }
            None => self.runtime.fatal("update without a current stage"),
        };

        for request in requests {
            match request {
                Transition::Stage {
                    id,
                    unload_previous,
                    deinit_previous,
                } => {
                    self.set_current_stage(id, unload_previous, deinit_previous);
                }
                Transition::Exit => self.request_exit(),
                Transition::Scene { id, .. } => {
                    warn!(target: "stage", "Scene request {} reached the manager", id);
                }
            }
        }
    }

    pub fn draw(&mut self, target: &mut dyn Any, time: &FrameTime) {
        if let Some(stage) = self.current_mut() {
            stage.draw(target, time);
        }
    }

    /// Unloads and deinitializes every stage. Does not touch the run flag.
    pub fn shutdown(&mut self) {
        let mut ids: Vec<StageId> = self.stages.keys().copied().collect();
        ids.sort();
        for id in ids {
            if let Some(stage) = self.stages.get_mut(&id) {
                stage.unload();
                stage.deinit();
            }
        }
        info!(target: "stage", "All stages shut down");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
