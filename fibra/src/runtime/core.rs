use super::builder::SchedulerBuilder;
use super::executor::core::{self as executor, Executor};
use crate::error::{BuildError, SubmitError};
use crate::runtime::fiber::FiberId;

use once_cell::sync::OnceCell;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The process-wide scheduler handed out by [`Scheduler::access`].
static GLOBAL: OnceCell<Scheduler> = OnceCell::new();

/// A cooperative fiber scheduler.
///
/// `Scheduler` is responsible for:
/// - owning the bounded ready queue,
/// - owning the single worker thread that resumes fibers,
/// - admitting new fibers in first-come-first-served order,
/// - shutting the worker down in an orderly fashion.
///
/// A scheduler is never cloned. Share it through [`Handle`]s, which all
/// refer to the same queue and worker.
///
/// Dropping the scheduler discards every fiber that has not finished and
/// joins the worker. Use [`shutdown`](Self::shutdown) to let them finish
/// instead.
pub struct Scheduler {
    handle: Handle,
}

impl Scheduler {
    /// Creates a scheduler with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Spawn`] if the worker thread cannot be started.
    pub fn new() -> Result<Self, BuildError> {
        SchedulerBuilder::new().build()
    }

    /// Returns a builder for a custom configuration.
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    pub(crate) fn start(
        capacity: usize,
        thread_name: String,
        park_timeout: Duration,
    ) -> Result<Self, BuildError> {
        let executor = Executor::start(capacity, thread_name, park_timeout)?;

        Ok(Self {
            handle: Handle {
                executor: Arc::new(executor),
            },
        })
    }

    /// Returns a handle to the process-wide scheduler.
    ///
    /// The first call builds the scheduler with the default configuration
    /// and starts its worker thread. Every call, from any thread and even
    /// when racing with the first one, returns a handle to that same
    /// instance; no caller ever sees it half-built.
    ///
    /// The process-wide scheduler is never torn down implicitly. Calling
    /// [`Handle::shutdown`] on it drains it for the rest of the process.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread cannot be started.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let scheduler = Scheduler::access();
    /// scheduler.submit(async { println!("hello from a fiber") })?;
    /// ```
    pub fn access() -> Handle {
        GLOBAL
            .get_or_init(|| match SchedulerBuilder::new().build() {
                Ok(scheduler) => scheduler,
                Err(err) => panic!("failed to start the process-wide scheduler: {err}"),
            })
            .handle()
    }

    /// Returns how many worker threads schedulers have spawned in this
    /// process so far.
    pub fn workers_spawned() -> usize {
        executor::workers_spawned()
    }

    /// Returns a shareable handle to this scheduler.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Submits a computation to run as a new fiber.
    ///
    /// See [`Handle::submit`].
    pub fn submit<F>(&self, future: F) -> Result<FiberId, SubmitError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.submit(future)
    }

    /// Shuts the scheduler down after every admitted fiber has finished.
    ///
    /// See [`Handle::shutdown`].
    pub fn shutdown(self) {
        self.handle.shutdown();
    }
}

impl Drop for Scheduler {
    /// Tears the scheduler down without waiting for pending fibers.
    ///
    /// This performs the following steps:
    /// 1. Closes the ready queue to new submissions
    /// 2. Asks the worker to discard every queued fiber after its current turn
    /// 3. Joins the worker thread
    fn drop(&mut self) {
        self.handle.executor.abandon();
        self.handle.executor.join();
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("handle", &self.handle)
            .finish()
    }
}

/// A shared reference to a [`Scheduler`].
///
/// Handles are cheap to clone and may be sent to any thread, including into
/// the fibers the scheduler runs.
#[derive(Clone)]
pub struct Handle {
    executor: Arc<Executor>,
}

impl Handle {
    /// Submits a computation to run as a new fiber.
    ///
    /// The fiber gets its first turn after every fiber already waiting in
    /// the ready queue. Each time it suspends, with
    /// [`yield_now`](crate::yield_now) or any other pending `.await`, it goes
    /// to the back of the queue.
    ///
    /// Results are the computation's own business; send them through a
    /// channel if the submitter needs them.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::CapacityExceeded`] if the scheduler already holds as
    ///   many outstanding fibers as its capacity allows
    /// - [`SubmitError::ShutDown`] if the scheduler is shutting down
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let (tx, rx) = std::sync::mpsc::channel();
    ///
    /// handle.submit(async move {
    ///     let mut value = 0;
    ///     for _ in 0..10 {
    ///         value += 1;
    ///         fibra::yield_now().await;
    ///     }
    ///     let _ = tx.send(value);
    /// })?;
    ///
    /// assert_eq!(rx.recv().unwrap(), 10);
    /// ```
    pub fn submit<F>(&self, future: F) -> Result<FiberId, SubmitError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.executor.spawn(future)
    }

    /// Closes the scheduler and waits until every admitted fiber finished.
    ///
    /// Further submissions fail with [`SubmitError::ShutDown`]. Fibers
    /// already admitted keep their turns until they complete; a fiber that
    /// never finishes keeps this call waiting.
    ///
    /// Called from inside one of the scheduler's own fibers, this only
    /// closes the scheduler and returns: the worker cannot wait for itself.
    pub fn shutdown(&self) {
        self.executor.shutdown();
        self.executor.join();
    }

    /// Returns `true` once the scheduler stopped accepting fibers.
    pub fn is_shut_down(&self) -> bool {
        self.executor.queue().is_closed()
    }

    /// Maximum number of outstanding fibers.
    pub fn capacity(&self) -> usize {
        self.executor.queue().capacity()
    }

    /// Number of submitted fibers that have not finished yet.
    pub fn outstanding(&self) -> usize {
        self.executor.queue().outstanding()
    }

    /// Number of fibers waiting in the ready queue for their next turn.
    pub fn queued(&self) -> usize {
        self.executor.queue().len()
    }

    /// Returns `true` if the calling thread is this scheduler's worker.
    pub fn is_worker_thread(&self) -> bool {
        self.executor.on_worker_thread()
    }

    /// Returns `true` if both handles refer to the same scheduler.
    pub fn same_scheduler(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.executor, &other.executor)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("capacity", &self.capacity())
            .field("outstanding", &self.outstanding())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
