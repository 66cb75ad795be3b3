//=========================================================================
// Worker Pool
//=========================================================================
//
// Fixed set of long-lived worker threads fed through a crossbeam channel.
//
// Architecture:
//   execute(job) → Sender<Job> ─┬─▶ worker 0 ─┐
//                               ├─▶ worker 1 ─┼─ catch_unwind(job)
//                               └─▶ worker N ─┘
//
// Workers never exit on a panicking job; they log it and keep serving.
// Dropping the pool closes the channel and joins every worker.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, warn};

//=== Types ===============================================================

type Job = Box<dyn FnOnce() + Send + 'static>;

//=== WorkerPool ==========================================================

/// Shared pool used for per-frame object updates.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    //--- Construction -----------------------------------------------------

    /// Spawns `size` worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `size == 0`.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Worker count must be positive");

        let (sender, receiver) = unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);

        for index in 0..size {
            let receiver = receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("stagecraft-worker-{}", index))
                .spawn(move || Self::worker_loop(index, receiver));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => error!(target: "worker", "Failed to spawn worker {}: {}", index, e),
            }
        }

        debug!(target: "worker", "Worker pool started with {} threads", workers.len());

        Self {
            sender: Some(sender),
            workers,
        }
    }

    //--- Submission -------------------------------------------------------

    /// Queues `job` for execution on some worker.
    ///
    /// Runs the job inline on the caller's thread when no worker is
    /// available (pool shut down or no thread could be spawned).
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let job: Job = Box::new(job);

        let rejected = match &self.sender {
            Some(sender) if !self.workers.is_empty() => match sender.send(job) {
                Ok(()) => return,
                Err(err) => err.into_inner(),
            },
            _ => job,
        };

        warn!(target: "worker", "No worker available, running job inline");
        rejected();
    }

    /// Number of live worker threads.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Closes the queue and joins every worker. Queued jobs still run.
    pub fn shutdown(&mut self) {
        if self.sender.take().is_none() {
            return;
        }

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!(target: "worker", "Worker thread terminated abnormally");
            }
        }

        debug!(target: "worker", "Worker pool shut down");
    }

    //--- Internal Helpers -------------------------------------------------

    fn worker_loop(index: usize, receiver: Receiver<Job>) {
        for job in receiver.iter() {
            if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                error!(target: "worker", "Job panicked on worker {}", index);
            }
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::worker::CountdownLatch;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn runs_every_job() {
        let pool = WorkerPool::new(4);
        let latch = Arc::new(CountdownLatch::new(100));
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..100 {
            let guard = latch.guard();
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(guard);
            });
        }

        latch.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn jobs_run_off_the_calling_thread() {
        let pool = WorkerPool::new(2);
        let latch = Arc::new(CountdownLatch::new(8));
        let names = Arc::new(Mutex::new(HashSet::new()));

        for _ in 0..8 {
            let guard = latch.guard();
            let names = Arc::clone(&names);
            pool.execute(move || {
                let name = thread::current().name().map(str::to_string);
                names.lock().unwrap().insert(name);
                drop(guard);
            });
        }

        latch.wait();
        let names = names.lock().unwrap();
        assert!(names
            .iter()
            .all(|n| n.as_deref().is_some_and(|n| n.starts_with("stagecraft-worker-"))));
    }

    #[test]
    fn panicking_job_does_not_kill_worker() {
        let pool = WorkerPool::new(1);
        let latch = Arc::new(CountdownLatch::new(2));

        let guard = latch.guard();
        pool.execute(move || {
            let _guard = guard;
            panic!("object update failed");
        });

        let guard = latch.guard();
        pool.execute(move || drop(guard));

        latch.wait();
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn execute_after_shutdown_runs_inline() {
        let mut pool = WorkerPool::new(1);
        pool.shutdown();

        let ran_on = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&ran_on);
        pool.execute(move || {
            *slot.lock().unwrap() = Some(thread::current().id());
        });

        assert_eq!(*ran_on.lock().unwrap(), Some(thread::current().id()));
    }

    #[test]
    #[should_panic(expected = "Worker count must be positive")]
    fn zero_workers_panics() {
        WorkerPool::new(0);
    }
}
