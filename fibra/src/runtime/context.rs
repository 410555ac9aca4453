use crate::runtime::fiber::FiberId;

use std::cell::Cell;

thread_local! {
    /// Identifier of the fiber currently being resumed on this thread.
    ///
    /// Set by the worker for the duration of a single resume and cleared
    /// again when the fiber suspends or finishes.
    static CURRENT_FIBER: Cell<Option<FiberId>> = const { Cell::new(None) };
}

/// Runs `f` with `id` installed as the current fiber of this thread.
///
/// The previous value is restored afterwards, so nested resumes (a scheduler
/// driven from inside another scheduler's fiber) report the innermost fiber.
pub(crate) fn enter_fiber<R>(id: FiberId, f: impl FnOnce() -> R) -> R {
    let prev = CURRENT_FIBER.with(|current| current.replace(Some(id)));

    let out = f();

    CURRENT_FIBER.with(|current| current.set(prev));

    out
}

/// Returns the identifier of the fiber running on the calling thread.
///
/// Returns `None` when called from outside any fiber, for example from the
/// thread that submitted the work.
///
/// # Examples
///
/// ```rust,ignore
/// scheduler.submit(async {
///     let me = fibra::current_fiber().unwrap();
///     println!("running as {me}");
/// })?;
/// ```
pub fn current_fiber() -> Option<FiberId> {
    CURRENT_FIBER.with(Cell::get)
}
