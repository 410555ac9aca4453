//! Core scheduler components.
//!
//! This module contains the building blocks of the scheduler: the fibers
//! it runs, the ready queue that orders them, the worker that resumes them,
//! and the cooperative suspension point they use to take turns.
//!
//! It is responsible for:
//! - wrapping computations into resumable fibers,
//! - keeping fibers in first-come-first-served order under a fixed bound,
//! - resuming fibers round-robin on a single worker thread,
//! - starting, sharing, and shutting down that worker.

mod core;
mod executor;
mod fiber;
mod queue;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub use self::core::{Handle, Scheduler};
pub use self::fiber::FiberId;
