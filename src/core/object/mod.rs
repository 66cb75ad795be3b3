//=========================================================================
// Game Objects
//=========================================================================
//
// The unit of per-frame simulation.
//
// Architecture:
//   Scene
//     └─ objects: BTreeMap<ObjectId, SharedObject>
//          └─ Arc<Mutex<ObjectNode>>
//               ├─ behavior: Box<dyn GameObject>
//               ├─ lifecycle / active / visible / draw order
//               └─ children: BTreeMap<ObjectId, ObjectNode>
//
// Per-frame: dispatch_updates() fans one task per active object out to
// the worker pool and joins on a countdown latch before returning.
//
//=========================================================================

//=== Module Declarations =================================================

mod dispatch;
mod node;

//=== Public API ==========================================================

pub use dispatch::dispatch_updates;
pub use node::{ObjectNode, SharedObject};

//=== Internal Dependencies ===============================================

use crate::core::render::DrawContext;
use crate::core::time::FrameTime;

//=== GameObject Trait ====================================================

/// Behaviour of a single simulated/drawn object.
///
/// `update` and `animate` run on a worker thread, under the object's own
/// lock, in that order. `draw` runs later on the scheduling thread under
/// the same lock. No ordering holds between different objects' updates
/// within a frame.
///
/// # Minimal Implementation
///
/// ```rust
/// # use stagecraft::prelude::*;
/// struct Spinner { angle: f32 }
///
/// impl GameObject for Spinner {
///     fn update(&mut self, time: &FrameTime) {
///         self.angle += time.delta_seconds();
///     }
///
///     fn draw(&mut self, _ctx: &mut DrawContext<'_>) {}
/// }
/// ```
pub trait GameObject: Send {
    fn init(&mut self) -> bool {
        true
    }

    fn load(&mut self) -> bool {
        true
    }

    fn unload(&mut self) -> bool {
        true
    }

    fn deinit(&mut self) -> bool {
        true
    }

    /// Simulation step.
    fn update(&mut self, time: &FrameTime);

    /// Animation step, after `update`.
    fn animate(&mut self, _time: &FrameTime) {}

    fn draw(&mut self, ctx: &mut DrawContext<'_>);
}
