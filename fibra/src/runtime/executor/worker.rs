use crate::runtime::fiber::Resume;
use crate::runtime::queue::ReadyQueue;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, info_span, trace};

/// The dispatch loop of a scheduler's worker thread.
///
/// The worker is the only consumer of the ready queue and the only thread
/// that ever resumes a fiber. Each turn it takes the oldest fiber, resumes
/// it, and puts it back at the tail if it suspended, which yields strict
/// round-robin among all fibers that are still running.
pub(crate) struct Worker {
    /// Queue shared with every submitter.
    queue: Arc<ReadyQueue>,

    /// Set when queued fibers should be discarded instead of drained.
    abandon: Arc<AtomicBool>,

    /// Upper bound on a single idle wait.
    park_timeout: Duration,
}

impl Worker {
    pub(crate) fn new(
        queue: Arc<ReadyQueue>,
        abandon: Arc<AtomicBool>,
        park_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            abandon,
            park_timeout,
        }
    }

    /// Runs the dispatch loop until the scheduler shuts down.
    ///
    /// # Execution loop
    ///
    /// - Discard everything and stop if an abandon was requested
    /// - Take the oldest fiber; if none, stop when the queue is closed and
    ///   drained, otherwise park until work arrives
    /// - Skip fibers that can no longer run
    /// - Resume the fiber, then requeue it if it suspended or free its slot
    ///   if it finished
    pub(crate) fn run(self) {
        let span = info_span!("worker", capacity = self.queue.capacity());
        let _enter = span.enter();
        let _closer = CloseOnExit(&self.queue);

        info!("worker started");

        let mut turns: u64 = 0;

        loop {
            if self.abandon.load(Ordering::Acquire) {
                let discarded = self.queue.clear();
                debug!(discarded, "discarded queued fibers");
                break;
            }

            let Some(mut fiber) = self.queue.try_pop() else {
                if self.queue.is_drained() {
                    break;
                }

                self.queue.park(self.park_timeout);
                continue;
            };

            // Only suspended fibers are queued today; anything else is
            // discarded without a turn rather than resumed.
            if !fiber.is_runnable() {
                self.queue.release();
                continue;
            }

            let id = fiber.id();
            turns += 1;
            trace!(fiber = %id, "resuming");

            match fiber.resume() {
                Resume::Yielded => self.queue.requeue(fiber),
                Resume::Finished => {
                    trace!(fiber = %id, "finished");
                    self.queue.release();
                }
                Resume::Panicked(message) => {
                    error!(fiber = %id, %message, "fiber panicked");
                    self.queue.release();
                }
            }
        }

        info!(turns, "worker stopped");
    }
}

/// Closes the ready queue when the dispatch loop ends, however it ends.
///
/// Once the worker is gone nothing would ever resume an admitted fiber, so
/// submitters must see [`SubmitError::ShutDown`](crate::SubmitError::ShutDown)
/// instead of an accepted fiber that never runs.
struct CloseOnExit<'a>(&'a ReadyQueue);

impl Drop for CloseOnExit<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("worker died; closing the ready queue");
        }

        self.0.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::fiber::Fiber;

    fn worker(queue: &Arc<ReadyQueue>) -> Worker {
        Worker::new(
            queue.clone(),
            Arc::new(AtomicBool::new(false)),
            Duration::from_millis(1),
        )
    }

    #[test]
    fn test_finished_fiber_is_discarded_without_a_turn() {
        let queue = Arc::new(ReadyQueue::new(2));

        queue.try_push(Fiber::new(async {})).unwrap();
        let mut finished = queue.try_pop().unwrap();
        assert_eq!(finished.resume(), Resume::Finished);
        assert!(!finished.is_runnable());
        assert_eq!(finished.resume(), Resume::Finished);

        queue.requeue(finished);
        queue.close();

        worker(&queue).run();

        assert_eq!(queue.outstanding(), 0);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_queue_is_closed_when_the_loop_exits() {
        let queue = Arc::new(ReadyQueue::new(1));
        let abandon = Arc::new(AtomicBool::new(true));

        Worker::new(queue.clone(), abandon, Duration::from_millis(1)).run();

        assert!(queue.is_closed());
    }
}
