//=========================================================================
// Worker System
//=========================================================================
//
// Fixed-size worker pool plus a countdown latch for fan-out/join.
//
// Flow (one frame):
//   scheduler ── execute(task) × N ──▶ WorkerPool (crossbeam channel)
//   scheduler ── latch.wait() ◀── N × CompletionGuard dropped
//
// No cancellation, no timeout: a stalled task stalls the join.
//
//=========================================================================

//=== Module Declarations =================================================

mod latch;
mod pool;

//=== Public API ==========================================================

pub use latch::{CompletionGuard, CountdownLatch};
pub use pool::WorkerPool;
