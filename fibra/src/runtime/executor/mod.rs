//! Fiber executor.
//!
//! This module owns the single worker thread of a scheduler.
//!
//! It is composed of:
//! - [`core`]: starts the worker, admits fibers, shuts it down and joins it,
//! - [`worker`]: the dispatch loop that resumes fibers in queue order.

pub(crate) mod core;
pub(crate) mod worker;
