use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed computation driven by a fiber.
pub(crate) type FiberFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Execution state of a fiber.
///
/// The suspended variant owns the saved execution context: the pinned state
/// machine of the fiber's computation, including its locals and the point at
/// which it will continue on the next resume.
pub(crate) enum FiberState {
    /// Waiting for its next turn. A freshly created fiber starts here.
    Suspended(FiberFuture),

    /// Currently being resumed by the worker.
    ///
    /// Only observable from inside [`Fiber::resume`](super::Fiber::resume).
    Running,

    /// The computation returned or panicked. The context has been released.
    Finished,
}

impl fmt::Debug for FiberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiberState::Suspended(_) => f.write_str("Suspended"),
            FiberState::Running => f.write_str("Running"),
            FiberState::Finished => f.write_str("Finished"),
        }
    }
}

/// Outcome of a single resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resume {
    /// The fiber suspended itself and wants another turn.
    Yielded,

    /// The computation ran to completion, or the fiber was not runnable.
    Finished,

    /// The computation panicked. Carries the panic message when it was a
    /// string.
    Panicked(String),
}
