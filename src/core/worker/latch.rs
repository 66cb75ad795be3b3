//=========================================================================
// Countdown Latch
//=========================================================================
//
// Join primitive for per-frame fan-out.
//
// The count starts at the number of submitted tasks. Each completion
// decrements it atomically; the completion that reaches zero releases
// every waiter. A latch created with zero never blocks.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

//=== CountdownLatch ======================================================

/// Blocks waiters until `count_down` has been called `count` times.
pub struct CountdownLatch {
    remaining: AtomicUsize,
    released: Mutex<bool>,
    condvar: Condvar,
}

impl CountdownLatch {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(count),
            released: Mutex::new(count == 0),
            condvar: Condvar::new(),
        }
    }

    /// Records one completion.
    ///
    /// Extra calls after release are ignored.
    pub fn count_down(&self) {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        if previous == Ok(1) {
            let mut released = self.released.lock();
            *released = true;
            self.condvar.notify_all();
        }
    }

    /// Blocks until every completion has been recorded.
    pub fn wait(&self) {
        let mut released = self.released.lock();
        while !*released {
            self.condvar.wait(&mut released);
        }
    }

    /// Completions still outstanding.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_released(&self) -> bool {
        *self.released.lock()
    }

    /// Guard that counts down when dropped, including during unwinding.
    pub fn guard(self: &Arc<Self>) -> CompletionGuard {
        CompletionGuard {
            latch: Arc::clone(self),
        }
    }
}

//=== CompletionGuard =====================================================

/// Signals one completion on drop.
pub struct CompletionGuard {
    latch: Arc<CountdownLatch>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.latch.count_down();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn zero_count_never_blocks() {
        let latch = CountdownLatch::new(0);
        assert!(latch.is_released());
        latch.wait();
    }

    #[test]
    fn releases_after_exact_count() {
        let latch = CountdownLatch::new(3);

        latch.count_down();
        latch.count_down();
        assert!(!latch.is_released());
        assert_eq!(latch.remaining(), 1);

        latch.count_down();
        assert!(latch.is_released());
        latch.wait();
    }

    #[test]
    fn extra_count_down_ignored() {
        let latch = CountdownLatch::new(1);
        latch.count_down();
        latch.count_down();
        assert_eq!(latch.remaining(), 0);
        assert!(latch.is_released());
    }

    #[test]
    fn waiter_unblocks_only_after_all_completions() {
        const N: usize = 16;
        let latch = Arc::new(CountdownLatch::new(N));
        let completed = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..N)
            .map(|i| {
                let guard = latch.guard();
                let completed = Arc::clone(&completed);
                thread::spawn(move || {
                    // Reverse-staggered so completion order differs from spawn order
                    thread::sleep(Duration::from_millis(((N - i) % 5) as u64));
                    completed.fetch_add(1, Ordering::SeqCst);
                    drop(guard);
                })
            })
            .collect();

        latch.wait();
        assert_eq!(completed.load(Ordering::SeqCst), N);

        for w in workers {
            w.join().unwrap();
        }
    }

    #[test]
    fn guard_counts_down_on_panic() {
        let latch = Arc::new(CountdownLatch::new(1));
        let guard = latch.guard();

        let result = thread::spawn(move || {
            let _guard = guard;
            panic!("task failed");
        })
        .join();

        assert!(result.is_err());
        assert!(latch.is_released());
    }

    #[test]
    fn wait_blocks_until_released() {
        let latch = Arc::new(CountdownLatch::new(1));
        let finished = Arc::new(AtomicBool::new(false));

        let waiter = {
            let latch = Arc::clone(&latch);
            let finished = Arc::clone(&finished);
            thread::spawn(move || {
                latch.wait();
                finished.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(20));
        assert!(!finished.load(Ordering::SeqCst));

        latch.count_down();
        waiter.join().unwrap();
        assert!(finished.load(Ordering::SeqCst));
    }
}
