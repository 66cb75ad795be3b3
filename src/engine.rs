//=========================================================================
// Stagecraft Engine
//
// Builder and frame loop around the stage manager.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  tick() until Exit
//         │                          │
//         ├─ with_tps()              ├─ start()  (startup checks)
//         ├─ with_workers()          └─ tick()   (update + draw)
//         ├─ with_loader()
//         ├─ with_diagnostics()
//         └─ with_input()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::diagnostics::{Diagnostics, LogDiagnostics};
use crate::core::input::{IdleInput, InputProvider};
use crate::core::resource::{AssetLoader, NullLoader};
use crate::core::scene::StageManager;
use crate::core::time::{FrameClock, FrameTime};
use crate::core::Runtime;

//=== TickControl =========================================================

/// Frame loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (frames per second for [`Engine::run`])
/// - **Workers**: available parallelism
/// - **Loader**: [`NullLoader`] (every asset missing)
/// - **Diagnostics**: [`LogDiagnostics`]
/// - **Input**: [`IdleInput`]
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use stagecraft::EngineBuilder;
/// use stagecraft::core::resource::MemoryLoader;
///
/// let engine = EngineBuilder::new()
///     .with_tps(120.0)                              // Fast pacing
///     .with_workers(4)                              // Fixed pool
///     .with_loader(Arc::new(MemoryLoader::new()))   // In-memory assets
///     .build();
/// ```
pub struct EngineBuilder {
    tps: f64,
    workers: usize,
    loader: Arc<dyn AssetLoader>,
    diagnostics: Arc<dyn Diagnostics>,
    input: Box<dyn InputProvider>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
            loader: Arc::new(NullLoader),
            diagnostics: Arc::new(LogDiagnostics),
            input: Box::new(IdleInput),
        }
    }

    /// Sets the target frames per second for [`Engine::run`].
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the fixed worker-pool size for object updates.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn with_workers(mut self, workers: usize) -> Self {
        assert!(workers > 0, "Worker count must be positive");
        self.workers = workers;
        self
    }

    /// Sets the physical asset loader behind the resource cache.
    pub fn with_loader(mut self, loader: Arc<dyn AssetLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Sets the diagnostic sink shared by every stage, scene and resource.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Sets the device input source polled once per frame.
    pub fn with_input(mut self, input: impl InputProvider + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Builds the runtime and an empty stage manager.
    pub fn build(self) -> Engine {
        info!("Building engine (TPS: {}, workers: {})", self.tps, self.workers);

        let runtime = Arc::new(Runtime::new(self.workers, self.loader, self.diagnostics));

        Engine {
            stages: StageManager::new(Arc::clone(&runtime)),
            runtime,
            input: self.input,
            tps: self.tps,
            clock: FrameClock::new(),
            started: false,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Stagecraft runtime.
///
/// Owns the stage manager and drives it one frame at a time. Create via
/// [`EngineBuilder`].
///
/// # Frame
///
/// ```text
/// tick()
///   ├─► StageManager::update()   (input → update → dispatch → post_update)
///   └─► StageManager::draw()     (scene → overlays)
/// ```
pub struct Engine {
    runtime: Arc<Runtime>,
    stages: StageManager,
    input: Box<dyn InputProvider>,
    tps: f64,
    clock: FrameClock,
    started: bool,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Registers stages and scenes before execution.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut StageManager),
    {
        info!("Initializing stages");
        init_fn(&mut self.stages);
        self
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    pub fn stages(&self) -> &StageManager {
        &self.stages
    }

    pub fn stages_mut(&mut self) -> &mut StageManager {
        &mut self.stages
    }

    pub fn tps(&self) -> f64 {
        self.tps
    }

    /// Runs the startup checks and brings up the entry stage. Called by
    /// the first tick if not called explicitly.
    ///
    /// # Panics
    ///
    /// Through the diagnostic sink, when no stage or scene is current or
    /// the first load fails.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.stages.start();
        self.started = true;
    }

    //--- Execution --------------------------------------------------------

    /// One frame using the wall clock.
    pub fn tick(&mut self, target: &mut dyn Any) -> TickControl {
        let time = self.clock.tick();
        self.tick_with(target, time)
    }

    /// One frame with an explicit clock value.
    pub fn tick_with(&mut self, target: &mut dyn Any, time: FrameTime) -> TickControl {
        if !self.stages.is_running() {
            return TickControl::Exit;
        }
        self.start();

        self.stages.update(self.input.as_mut(), &time);
        if !self.stages.is_running() {
            return TickControl::Exit;
        }

        self.stages.draw(target, &time);
        TickControl::Continue
    }

    /// Ticks at the configured rate until exit is requested, then tears
    /// every stage down.
    pub fn run(mut self, target: &mut dyn Any) {
        info!("Starting frame loop (TPS: {})", self.tps);

        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);

        loop {
            let frame_start = Instant::now();

            if self.tick(target) == TickControl::Exit {
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        self.stages.shutdown();
        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{SceneId, StageId};
    use crate::core::input::{ChannelInput, InputEvent, KeyCode};
    use crate::core::scene::{SceneContext, SceneLogic, Transition};
    use crate::core::testing::{Journal, TracedLogic};

    fn engine_with(journal: &Journal) -> Engine {
        let journal = journal.clone();
        EngineBuilder::new().with_workers(2).build().init(move |stages| {
            let stage = stages.add_stage(StageId(0)).unwrap();
            stage
                .add_scene(SceneId(0), None, TracedLogic::new("main", &journal))
                .unwrap();
            stage.set_entry_scene(SceneId(0));
            stages.set_entry_stage(StageId(0)).unwrap();
        })
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert!(builder.workers >= 1);
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Worker count must be positive")]
    fn builder_with_workers_panics_on_zero() {
        EngineBuilder::new().with_workers(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new().with_tps(30.0).with_workers(3).build();

        assert_eq!(engine.tps(), 30.0);
        assert_eq!(engine.runtime().pool().size(), 3);
        assert_eq!(engine.stages().stage_count(), 0);
    }

    //=====================================================================
    // Frame Loop Tests
    //=====================================================================

    #[test]
    fn first_tick_starts_then_updates_and_draws() {
        let journal = Journal::new();
        let mut engine = engine_with(&journal);

        assert_eq!(engine.tick(&mut ()), TickControl::Continue);

        assert_eq!(
            journal.entries(),
            vec![
                "main.init",
                "main.load",
                "main.input",
                "main.update",
                "main.post_update",
                "main.draw"
            ]
        );
    }

    #[test]
    #[should_panic(expected = "no current stage at startup")]
    fn tick_without_stages_is_fatal() {
        EngineBuilder::new().with_workers(1).build().tick(&mut ());
    }

    struct QuitOnEscape;

    impl SceneLogic for QuitOnEscape {
        fn input(&mut self, scene: &mut SceneContext) {
            if scene.input().is_key_pressed(KeyCode::Escape) {
                scene.request(Transition::Exit);
            }
        }

        fn update(&mut self, _scene: &mut SceneContext, _time: &FrameTime) {}

        fn post_update(&mut self, _scene: &mut SceneContext, _time: &FrameTime) {}
    }

    #[test]
    fn exit_request_stops_loop_and_shuts_down() {
        let (tx, input) = ChannelInput::channel(4);
        let engine = EngineBuilder::new()
            .with_workers(1)
            .with_tps(1000.0)
            .with_input(input)
            .build()
            .init(|stages| {
                let stage = stages.add_stage(StageId(0)).unwrap();
                stage.add_scene(SceneId(0), None, QuitOnEscape).unwrap();
                stage.set_entry_scene(SceneId(0));
                stages.set_entry_stage(StageId(0)).unwrap();
            });

        tx.send(vec![InputEvent::KeyDown(KeyCode::Escape)]).unwrap();

        // Returns only once the exit request is seen
        engine.run(&mut ());
    }

    #[test]
    fn tick_after_exit_does_nothing() {
        let journal = Journal::new();
        let mut engine = engine_with(&journal);
        engine.tick(&mut ());
        engine.stages_mut().request_exit();
        journal.clear();

        assert_eq!(engine.tick(&mut ()), TickControl::Exit);
        assert!(journal.entries().is_empty());
    }
}
