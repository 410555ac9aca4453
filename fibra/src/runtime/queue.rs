use crate::runtime::fiber::{Fiber, drop_contained};

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::mem;
use std::time::Duration;
use tracing::error;

/// Why the ready queue refused to admit a new fiber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejected {
    /// Every slot is held by an outstanding fiber.
    Full,

    /// The queue was closed by a shutdown.
    Closed,
}

/// State protected by the queue lock.
struct Inner {
    /// Fibers waiting for their next turn, oldest first.
    ready: VecDeque<Fiber>,

    /// Admitted fibers that have not finished yet.
    ///
    /// Counts the queued fibers plus the one the worker is resuming, so it
    /// is always `>= ready.len()`.
    outstanding: usize,

    /// Set once no new fibers may be admitted.
    closed: bool,
}

/// Bounded first-in first-out queue of fibers awaiting a turn.
///
/// Any number of threads may admit fibers concurrently; exactly one worker
/// consumes them. The bound applies to outstanding fibers rather than queued
/// ones: a fiber keeps its slot from admission until it finishes, so the
/// worker can always put a suspended fiber back without running out of room.
///
/// The worker sleeps on a condition variable while the queue is empty and is
/// woken by every admission and by [`close`](Self::close).
pub(crate) struct ReadyQueue {
    inner: Mutex<Inner>,

    /// Wakes the parked worker.
    condvar: Condvar,

    /// Maximum number of outstanding fibers.
    capacity: usize,
}

impl ReadyQueue {
    /// Creates an empty, open queue with room for `capacity` fibers.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                ready: VecDeque::with_capacity(capacity),
                outstanding: 0,
                closed: false,
            }),
            condvar: Condvar::new(),
            capacity,
        }
    }

    /// Admits a new fiber at the back of the queue.
    ///
    /// Fails immediately, without blocking or growing, when the queue is
    /// closed or already holds `capacity` outstanding fibers.
    pub(crate) fn try_push(&self, fiber: Fiber) -> Result<(), Rejected> {
        let mut inner = self.inner.lock();

        if inner.closed {
            return Err(Rejected::Closed);
        }

        if inner.outstanding >= self.capacity {
            return Err(Rejected::Full);
        }

        inner.outstanding += 1;
        inner.ready.push_back(fiber);
        drop(inner);

        self.condvar.notify_one();
        Ok(())
    }

    /// Puts an already admitted fiber back at the tail for another turn.
    ///
    /// The fiber still holds the slot it was admitted with, so this never
    /// fails, even on a closed queue.
    pub(crate) fn requeue(&self, fiber: Fiber) {
        self.inner.lock().ready.push_back(fiber);
    }

    /// Takes the oldest fiber, or `None` if nothing is waiting.
    pub(crate) fn try_pop(&self) -> Option<Fiber> {
        self.inner.lock().ready.pop_front()
    }

    /// Frees the slot of an admitted fiber that has finished.
    ///
    /// The finished fiber is no longer queued, so at least one slot must be
    /// held beyond the queued fibers. A release without one is reported and
    /// ignored.
    pub(crate) fn release(&self) {
        let mut inner = self.inner.lock();

        if inner.outstanding <= inner.ready.len() {
            error!(
                outstanding = inner.outstanding,
                queued = inner.ready.len(),
                "released a slot no finished fiber held"
            );
            return;
        }

        inner.outstanding -= 1;
    }

    /// Stops admitting new fibers and wakes the worker.
    ///
    /// Fibers already admitted stay queued.
    pub(crate) fn close(&self) {
        self.inner.lock().closed = true;
        self.condvar.notify_all();
    }

    /// Discards every queued fiber and frees their slots.
    ///
    /// The fibers are dropped one by one after the lock is released, so
    /// destructors of their computations may safely call back into the queue.
    /// A destructor that panics is logged and does not keep the remaining
    /// fibers from being dropped.
    ///
    /// Returns the number of fibers discarded.
    pub(crate) fn clear(&self) -> usize {
        let discarded = {
            let mut inner = self.inner.lock();
            let discarded = mem::take(&mut inner.ready);
            inner.outstanding -= discarded.len();
            discarded
        };

        let count = discarded.len();

        for fiber in discarded {
            let id = fiber.id();
            if let Err(message) = drop_contained(fiber) {
                error!(fiber = %id, %message, "discarded fiber panicked while dropping");
            }
        }

        count
    }

    /// Blocks the calling worker until a fiber is admitted, the queue is
    /// closed, or `timeout` elapses.
    ///
    /// Returns immediately if work is already queued or the queue is closed.
    pub(crate) fn park(&self, timeout: Duration) {
        let mut inner = self.inner.lock();

        if inner.closed || !inner.ready.is_empty() {
            return;
        }

        let _ = self.condvar.wait_for(&mut inner, timeout);
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of admitted fibers that have not finished.
    pub(crate) fn outstanding(&self) -> usize {
        self.inner.lock().outstanding
    }

    /// Number of fibers currently waiting in the queue.
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().ready.len()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Returns `true` once the queue is closed and nothing is left waiting.
    ///
    /// Only the consumer may rely on this: with no fiber in its hands, a
    /// drained queue can never become non-empty again.
    pub(crate) fn is_drained(&self) -> bool {
        let inner = self.inner.lock();
        inner.closed && inner.ready.is_empty()
    }
}
