use super::Scheduler;
use crate::error::BuildError;

use std::time::Duration;

/// Number of outstanding fibers a scheduler accepts by default.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Name given to the worker thread by default.
const DEFAULT_THREAD_NAME: &str = "fibra-worker";

/// Longest single idle wait of the worker by default.
const DEFAULT_PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Builder for configuring and creating a scheduler.
///
/// `SchedulerBuilder` allows customizing scheduler parameters before the
/// worker thread is started. Every setting is fixed once
/// [`build`](Self::build) returns.
///
/// # Examples
///
/// ```rust,ignore
/// let scheduler = SchedulerBuilder::new()
///     .capacity(64)
///     .thread_name("io-fibers")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SchedulerBuilder {
    /// Maximum number of outstanding fibers.
    capacity: usize,

    /// Name of the worker thread.
    thread_name: String,

    /// Longest single idle wait of the worker.
    park_timeout: Duration,
}

impl SchedulerBuilder {
    /// Creates a new `SchedulerBuilder` with default configuration.
    ///
    /// The capacity defaults to [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            park_timeout: DEFAULT_PARK_TIMEOUT,
        }
    }

    /// Sets how many fibers may be outstanding at once.
    ///
    /// A fiber is outstanding from the moment it is submitted until it
    /// finishes. Submissions beyond this bound fail with
    /// [`SubmitError::CapacityExceeded`](crate::SubmitError::CapacityExceeded).
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn capacity(mut self, n: usize) -> Self {
        assert!(n > 0, "capacity must be > 0");

        self.capacity = n;
        self
    }

    /// Sets the name of the worker thread.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Sets the longest time the idle worker sleeps before checking the
    /// queue again.
    ///
    /// The worker is woken as soon as a fiber is submitted, so this only
    /// bounds how stale an idle worker can get.
    pub fn park_timeout(mut self, timeout: Duration) -> Self {
        self.park_timeout = timeout;
        self
    }

    /// Builds the scheduler and starts its worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Spawn`] if the worker thread cannot be started.
    pub fn build(self) -> Result<Scheduler, BuildError> {
        Scheduler::start(self.capacity, self.thread_name, self.park_timeout)
    }
}

impl Default for SchedulerBuilder {
    /// Creates a default `SchedulerBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
