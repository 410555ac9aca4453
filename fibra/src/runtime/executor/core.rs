use crate::error::{BuildError, SubmitError};
use crate::runtime::executor::worker::Worker;
use crate::runtime::fiber::{Fiber, FiberId};
use crate::runtime::queue::{ReadyQueue, Rejected};

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{debug, error};

/// Number of worker threads spawned by every executor in the process.
static WORKERS_SPAWNED: AtomicUsize = AtomicUsize::new(0);

/// Returns how many worker threads have been spawned in this process.
pub(crate) fn workers_spawned() -> usize {
    WORKERS_SPAWNED.load(Ordering::Acquire)
}

/// Single-threaded fiber executor.
///
/// The `Executor` is responsible for:
/// - spawning the worker thread,
/// - admitting new fibers into the ready queue,
/// - signalling shutdown, either draining or abandoning queued fibers,
/// - joining the worker thread.
pub(crate) struct Executor {
    /// Ready queue shared with the worker.
    queue: Arc<ReadyQueue>,

    /// Abandon flag shared with the worker.
    abandon: Arc<AtomicBool>,

    /// Join handle of the worker, taken by the first join.
    handle: Mutex<Option<JoinHandle<()>>>,

    /// Identity of the worker thread.
    thread: ThreadId,
}

impl Executor {
    /// Creates the ready queue and starts the worker thread on it.
    ///
    /// The worker begins its dispatch loop immediately.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of outstanding fibers
    /// * `thread_name` - Name given to the worker thread
    /// * `park_timeout` - Upper bound on a single idle wait of the worker
    pub(crate) fn start(
        capacity: usize,
        thread_name: String,
        park_timeout: Duration,
    ) -> Result<Self, BuildError> {
        let queue = Arc::new(ReadyQueue::new(capacity));
        let abandon = Arc::new(AtomicBool::new(false));

        let worker = Worker::new(queue.clone(), abandon.clone(), park_timeout);

        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || worker.run())
            .map_err(BuildError::Spawn)?;

        WORKERS_SPAWNED.fetch_add(1, Ordering::AcqRel);

        Ok(Self {
            queue,
            abandon,
            thread: handle.thread().id(),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Wraps a computation into a fiber and admits it into the ready queue.
    ///
    /// The fiber gets its first turn after every fiber already queued.
    pub(crate) fn spawn<F>(&self, future: F) -> Result<FiberId, SubmitError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let fiber = Fiber::new(future);
        let id = fiber.id();

        match self.queue.try_push(fiber) {
            Ok(()) => {
                debug!(fiber = %id, "fiber submitted");
                Ok(id)
            }
            Err(Rejected::Full) => {
                debug!(fiber = %id, capacity = self.queue.capacity(), "ready queue full");
                Err(SubmitError::CapacityExceeded {
                    capacity: self.queue.capacity(),
                })
            }
            Err(Rejected::Closed) => Err(SubmitError::ShutDown),
        }
    }

    /// Stops admission and lets the worker run every admitted fiber to
    /// completion before it exits.
    pub(crate) fn shutdown(&self) {
        debug!("draining scheduler");
        self.queue.close();
    }

    /// Stops admission and makes the worker discard the queued fibers after
    /// its current turn.
    pub(crate) fn abandon(&self) {
        debug!("abandoning scheduler");
        self.abandon.store(true, Ordering::Release);
        self.queue.close();
    }

    /// Waits for the worker thread to terminate.
    ///
    /// Returns immediately when called from the worker thread itself or
    /// when the worker was already joined. Concurrent callers all wait for
    /// the same termination.
    pub(crate) fn join(&self) {
        if self.on_worker_thread() {
            return;
        }

        let mut slot = self.handle.lock();

        if let Some(handle) = slot.take() {
            if handle.join().is_err() {
                error!("scheduler worker thread panicked");
            }
        }
    }

    /// Returns `true` if the caller runs on this executor's worker thread.
    pub(crate) fn on_worker_thread(&self) -> bool {
        thread::current().id() == self.thread
    }

    pub(crate) fn queue(&self) -> &ReadyQueue {
        &self.queue
    }
}
