//! Cooperative units of work.
//!
//! A [`Fiber`] wraps one resumable computation together with its saved
//! execution state. Fibers are owned by exactly one place at a time: either
//! the ready queue or the worker currently resuming them.

mod core;
mod state;

pub use self::core::FiberId;

pub(crate) use self::core::{Fiber, drop_contained};
pub(crate) use self::state::Resume;
