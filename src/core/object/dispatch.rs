//=========================================================================
// Update Dispatch
//=========================================================================
//
// Per-frame fan-out of object updates onto the worker pool.
//
// Flow:
//   scheduling thread ─┬─ execute(task 0) ─▶ lock(obj 0) → run_frame
//                      ├─ execute(task 1) ─▶ lock(obj 1) → run_frame
//                      └─ latch.wait()  ◀── guard drops count down
//
// One task per active object. Inactive objects are not submitted, so a
// frame with none active never blocks. Completion is signalled from a
// drop guard so a panicking update still releases the barrier. The
// first panic payload is kept and re-raised on the scheduling thread
// once every task has finished, so a fatal assert inside an update
// halts the frame.
//
// There is no timeout: a stalled update stalls the frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{error, trace};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::SharedObject;
use crate::core::time::FrameTime;
use crate::core::worker::{CountdownLatch, WorkerPool};

//=== Types ===============================================================

type PanicPayload = Box<dyn Any + Send + 'static>;

//=== Dispatch ============================================================

/// Runs `update` + `animate` for every active object on `pool` and
/// blocks until all of them have finished.
///
/// Returns the number of tasks submitted.
///
/// # Panics
///
/// Resumes the first panic raised by an update, after the barrier has
/// been released.
pub fn dispatch_updates<'a, I>(pool: &WorkerPool, objects: I, time: &FrameTime) -> usize
where
    I: IntoIterator<Item = &'a SharedObject>,
{
    let active: Vec<SharedObject> = objects
        .into_iter()
        .filter(|object| object.lock().is_active())
        .cloned()
        .collect();

    if active.is_empty() {
        return 0;
    }

    let submitted = active.len();
    let latch = Arc::new(CountdownLatch::new(submitted));
    let failure: Arc<Mutex<Option<PanicPayload>>> = Arc::new(Mutex::new(None));
    trace!(target: "scene", "Dispatching {} object updates", submitted);

    for object in active {
        let guard = latch.guard();
        let failure = Arc::clone(&failure);
        let time = *time;
        pool.execute(move || {
            let _guard = guard;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| object.lock().run_frame(&time)));
            if let Err(payload) = outcome {
                error!(target: "scene", "Object update panicked");
                let mut slot = failure.lock();
                if slot.is_none() {
                    *slot = Some(payload);
                }
            }
        });
    }

    latch.wait();

    let payload = failure.lock().take();
    if let Some(payload) = payload {
        panic::resume_unwind(payload);
    }
    submitted
}

//=========================================================================
// Unit Tests
//=========================================================================
