use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Suspension point that hands control back to the scheduler once.
struct Yield {
    /// Whether the suspension has already happened.
    suspended: bool,
}

impl Future for Yield {
    type Output = ();

    /// The first poll suspends the fiber. The fiber goes to the back of the
    /// ready queue and the next poll, on its following turn, completes.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.suspended {
            return Poll::Ready(());
        }

        self.suspended = true;

        // Keeps the future well-behaved under executors that only repoll
        // woken tasks.
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Suspends the current fiber and lets every other ready fiber take a turn.
///
/// All locals of the fiber survive the suspension. Execution continues right
/// after the `.await` once the fiber reaches the front of the ready queue
/// again.
///
/// # Examples
///
/// ```rust,ignore
/// scheduler.submit(async {
///     for step in 0..3 {
///         println!("step {step}");
///         fibra::yield_now().await;
///     }
/// })?;
/// ```
pub async fn yield_now() {
    Yield { suspended: false }.await
}
