//=========================================================================
// Test Doubles
//=========================================================================
//
// Recording collaborators shared by the unit tests of every subsystem.
//
// Journal entries are "<name>.<hook>" strings, so assertions read as the
// call sequence they expect.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use crate::core::diagnostics::{Diagnostics, LogDiagnostics};
use crate::core::input::{InputProvider, InputSnapshot, InputState};
use crate::core::object::GameObject;
use crate::core::render::DrawContext;
use crate::core::resource::NullLoader;
use crate::core::runtime::Runtime;
use crate::core::scene::{SceneContext, SceneLogic, TransitionQueue, Widget};
use crate::core::time::FrameTime;

//=== Runtime =============================================================

/// Two workers, no assets, `log` diagnostics.
pub(crate) fn runtime() -> Arc<Runtime> {
    Arc::new(Runtime::new(2, Arc::new(NullLoader), Arc::new(LogDiagnostics)))
}

//=== Journal =============================================================

/// Thread-safe, shared call log.
#[derive(Clone, Default)]
pub(crate) struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Entries ending in `suffix`, in order.
    pub(crate) fn matching(&self, suffix: &str) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.ends_with(suffix))
            .cloned()
            .collect()
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.entries.lock().iter().filter(|e| *e == entry).count()
    }

    pub(crate) fn clear(&self) {
        self.entries.lock().clear();
    }
}

//=== RecordingDiagnostics ================================================

/// Keeps every message; `fatal` panics like the default sink.
#[derive(Default)]
pub(crate) struct RecordingDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, fragment: &str) -> bool {
        self.messages.lock().iter().any(|m| m.contains(fragment))
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn log(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }

    fn fatal(&self, message: &str) -> ! {
        self.messages.lock().push(format!("FATAL {}", message));
        panic!("fatal: {}", message);
    }
}

//=== Objects =============================================================

/// Object that journals every hook.
pub(crate) struct TracedObject {
    name: String,
    journal: Journal,
    fail_load: bool,
    panic_update: bool,
}

impl TracedObject {
    pub(crate) fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_owned(),
            journal: journal.clone(),
            fail_load: false,
            panic_update: false,
        }
    }

    pub(crate) fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub(crate) fn panicking_update(mut self) -> Self {
        self.panic_update = true;
        self
    }

    fn note(&self, hook: &str) {
        self.journal.record(format!("{}.{}", self.name, hook));
    }
}

impl GameObject for TracedObject {
    fn init(&mut self) -> bool {
        self.note("init");
        true
    }

    fn load(&mut self) -> bool {
        self.note("load");
        !self.fail_load
    }

    fn unload(&mut self) -> bool {
        self.note("unload");
        true
    }

    fn deinit(&mut self) -> bool {
        self.note("deinit");
        true
    }

    fn update(&mut self, _time: &FrameTime) {
        self.note("update");
        if self.panic_update {
            panic!("{} exploded", self.name);
        }
    }

    fn animate(&mut self, _time: &FrameTime) {
        self.note("animate");
    }

    fn draw(&mut self, _ctx: &mut DrawContext<'_>) {
        self.note("draw");
    }
}

/// Sleeps in `update`, then bumps a shared counter.
pub(crate) struct SleepyObject {
    delay: Duration,
    finished: Arc<AtomicUsize>,
}

impl SleepyObject {
    pub(crate) fn new(delay: Duration, finished: Arc<AtomicUsize>) -> Self {
        Self { delay, finished }
    }
}

impl GameObject for SleepyObject {
    fn update(&mut self, _time: &FrameTime) {
        thread::sleep(self.delay);
        self.finished.fetch_add(1, Ordering::SeqCst);
    }

    fn draw(&mut self, _ctx: &mut DrawContext<'_>) {}
}

/// Counts concurrent holders across `update` and `draw`.
pub(crate) struct ContendedObject {
    holders: Arc<AtomicUsize>,
    violations: Arc<AtomicUsize>,
}

impl ContendedObject {
    pub(crate) fn new(holders: Arc<AtomicUsize>, violations: Arc<AtomicUsize>) -> Self {
        Self {
            holders,
            violations,
        }
    }

    fn hold(&self) {
        if self.holders.fetch_add(1, Ordering::SeqCst) != 0 {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
        thread::sleep(Duration::from_micros(200));
        self.holders.fetch_sub(1, Ordering::SeqCst);
    }
}

impl GameObject for ContendedObject {
    fn update(&mut self, _time: &FrameTime) {
        self.hold();
    }

    fn draw(&mut self, _ctx: &mut DrawContext<'_>) {
        self.hold();
    }
}

//=== Scene Logic =========================================================

type UpdateHook = Box<dyn FnMut(&mut SceneContext) + Send>;

/// Scene logic that journals every hook.
pub(crate) struct TracedLogic {
    name: String,
    journal: Journal,
    fail_load: bool,
    on_update: Option<UpdateHook>,
}

impl TracedLogic {
    pub(crate) fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_owned(),
            journal: journal.clone(),
            fail_load: false,
            on_update: None,
        }
    }

    pub(crate) fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Runs `hook` at the end of every `update`.
    pub(crate) fn on_update<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut SceneContext) + Send + 'static,
    {
        self.on_update = Some(Box::new(hook));
        self
    }

    fn note(&self, hook: &str) {
        self.journal.record(format!("{}.{}", self.name, hook));
    }
}

impl SceneLogic for TracedLogic {
    fn init(&mut self, _scene: &mut SceneContext) -> bool {
        self.note("init");
        true
    }

    fn load(&mut self, _scene: &mut SceneContext) -> bool {
        self.note("load");
        !self.fail_load
    }

    fn unload(&mut self, _scene: &mut SceneContext) -> bool {
        self.note("unload");
        true
    }

    fn deinit(&mut self, _scene: &mut SceneContext) -> bool {
        self.note("deinit");
        true
    }

    fn input(&mut self, _scene: &mut SceneContext) {
        self.note("input");
    }

    fn update(&mut self, scene: &mut SceneContext, _time: &FrameTime) {
        self.note("update");
        if let Some(hook) = self.on_update.as_mut() {
            hook(scene);
        }
    }

    fn post_update(&mut self, _scene: &mut SceneContext, _time: &FrameTime) {
        self.note("post_update");
    }

    fn draw(&mut self, _scene: &SceneContext, _ctx: &mut DrawContext<'_>) {
        self.note("draw");
    }
}

//=== Widgets =============================================================

/// Always-active menu that journals every hook.
pub(crate) struct TracedWidget {
    name: String,
    journal: Journal,
}

impl TracedWidget {
    pub(crate) fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_owned(),
            journal: journal.clone(),
        }
    }

    fn note(&self, hook: &str) {
        self.journal.record(format!("{}.{}", self.name, hook));
    }
}

impl Widget for TracedWidget {
    fn init(&mut self) -> bool {
        self.note("init");
        true
    }

    fn load(&mut self) -> bool {
        self.note("load");
        true
    }

    fn unload(&mut self) -> bool {
        self.note("unload");
        true
    }

    fn deinit(&mut self) -> bool {
        self.note("deinit");
        true
    }

    fn is_active(&self) -> bool {
        true
    }

    fn input(&mut self, _input: &InputState, _requests: &mut TransitionQueue) {
        self.note("input");
    }

    fn update(&mut self, _time: &FrameTime) {
        self.note("update");
    }

    fn animate(&mut self, _time: &FrameTime) {
        self.note("animate");
    }

    fn draw(&mut self, _ctx: &mut DrawContext<'_>) {
        self.note("draw");
    }
}

//=== Input ===============================================================

/// Replays snapshots in order, then idles.
pub(crate) struct ScriptedInput {
    frames: std::vec::IntoIter<InputSnapshot>,
}

impl ScriptedInput {
    pub(crate) fn new(frames: Vec<InputSnapshot>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self) -> InputSnapshot {
        self.frames.next().unwrap_or_default()
    }
}
