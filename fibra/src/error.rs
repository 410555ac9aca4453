//! Error types returned by the scheduler.

use std::io;

use thiserror::Error;

/// Reasons a computation could not be handed to the scheduler.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The ready queue already holds as many outstanding fibers as it was
    /// configured for.
    ///
    /// A fiber stays outstanding from the moment it is accepted until it
    /// finishes, including the turns it spends suspended at the back of the
    /// queue.
    #[error("task queue limit reached ({capacity} outstanding fibers)")]
    CapacityExceeded {
        /// Configured capacity of the ready queue.
        capacity: usize,
    },

    /// The scheduler no longer accepts work.
    #[error("scheduler is shut down")]
    ShutDown,
}

/// Failure to bring up a scheduler.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The operating system refused to start the worker thread.
    #[error("failed to spawn the scheduler worker thread")]
    Spawn(#[source] io::Error),
}
