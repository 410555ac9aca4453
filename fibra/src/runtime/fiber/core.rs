use super::state::{FiberState, Resume};
use crate::runtime::context::enter_fiber;

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll, Waker};

/// Source of fiber identifiers. Zero is never handed out.
static NEXT_FIBER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a submitted fiber.
///
/// Identifiers are assigned in submission order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FiberId(u64);

impl FiberId {
    fn next() -> Self {
        FiberId(NEXT_FIBER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value of the identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fiber#{}", self.0)
    }
}

/// A cooperative unit of work.
///
/// A `Fiber` owns one computation and the state it needs to continue after a
/// suspension. It is moved, never shared: the ready queue hands it to the
/// worker by value and the worker hands it back the same way, so at most one
/// thread can touch its context at any time.
pub(crate) struct Fiber {
    /// Identifier reported to callers and used in log events.
    id: FiberId,

    /// Saved execution context and liveness.
    state: FiberState,
}

impl Fiber {
    /// Wraps a computation into a fiber that has not run yet.
    pub(crate) fn new<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            id: FiberId::next(),
            state: FiberState::Suspended(Box::pin(future)),
        }
    }

    pub(crate) fn id(&self) -> FiberId {
        self.id
    }

    /// Returns `true` while the fiber can still be resumed.
    pub(crate) fn is_runnable(&self) -> bool {
        matches!(self.state, FiberState::Suspended(_))
    }

    /// Transfers control into the fiber until it suspends or finishes.
    ///
    /// The computation is polled exactly once with the fiber installed as the
    /// current fiber of the calling thread. Every `Poll::Pending` counts as a
    /// voluntary suspension: the scheduler does not track wakeups, it simply
    /// gives the fiber another turn once everyone ahead of it had theirs.
    ///
    /// A panic raised by the computation, while polling it or while dropping
    /// it once it is done, is contained here. The fiber is marked finished and
    /// the panic message is returned to the caller.
    pub(crate) fn resume(&mut self) -> Resume {
        let mut future = match mem::replace(&mut self.state, FiberState::Running) {
            FiberState::Suspended(future) => future,
            // Only suspended fibers are ever queued; a finished one has no
            // context left to resume.
            other => {
                self.state = other;
                return Resume::Finished;
            }
        };

        let mut cx = Context::from_waker(Waker::noop());

        let poll = enter_fiber(self.id, || {
            panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)))
        });

        match poll {
            Ok(Poll::Pending) => {
                self.state = FiberState::Suspended(future);
                Resume::Yielded
            }
            Ok(Poll::Ready(())) => {
                self.state = FiberState::Finished;

                match drop_contained(future) {
                    Ok(()) => Resume::Finished,
                    Err(message) => Resume::Panicked(message),
                }
            }
            Err(payload) => {
                self.state = FiberState::Finished;

                // The state machine may be left half-updated.
                let _ = drop_contained(future);

                Resume::Panicked(panic_message(payload.as_ref()))
            }
        }
    }
}

impl fmt::Debug for Fiber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fiber")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish()
    }
}

/// Drops `value`, turning a panic raised by its destructor into an error.
pub(crate) fn drop_contained<T>(value: T) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(move || drop(value)))
        .map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("non-string panic payload")
    }
}
