//! # Fibra
//!
//! **Fibra** is a minimal cooperative fiber scheduler for Rust, built as the
//! smallest task orchestration layer of the **Nebula** ecosystem.
//!
//! A scheduler accepts lightweight, resumable units of work (fibers) and runs
//! them one at a time on a single dedicated worker thread, first come, first
//! served. A fiber runs until it suspends itself; it then goes to the back of
//! the ready queue and continues exactly where it left off on its next turn.
//! Fibers are never preempted: one that never suspends keeps every other
//! fiber waiting.
//!
//! Fibra offers:
//!
//! - A **single worker thread** per scheduler, started when the scheduler is
//!   built and joined when it is shut down
//! - A **bounded ready queue** with strict FIFO turns and an explicit
//!   [`SubmitError::CapacityExceeded`] instead of blocking or growing
//! - **Round-robin suspension** through [`yield_now`]
//! - A **process-wide instance** through [`Scheduler::access`], created
//!   exactly once on first use
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fibra::{Scheduler, yield_now};
//! use std::sync::mpsc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = Scheduler::new()?;
//!     let (tx, rx) = mpsc::channel();
//!
//!     scheduler.submit(async move {
//!         let mut value = 0;
//!         for _ in 0..10 {
//!             value += 1;
//!             yield_now().await;
//!         }
//!         let _ = tx.send(value);
//!     })?;
//!
//!     println!("Value:{}", rx.recv()?);
//!     scheduler.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The scheduler reports its lifecycle and every turn through [`tracing`].
//! Install any subscriber to see them; without one they cost next to nothing.
//!
//! ## Getting Started
//!
//! Add Fibra to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! fibra = { path = "fibra" }
//! ```

mod error;
mod runtime;

pub use error::{BuildError, SubmitError};
pub use runtime::builder::{DEFAULT_CAPACITY, SchedulerBuilder};
pub use runtime::context::current_fiber;
pub use runtime::yield_now::yield_now;
pub use runtime::{FiberId, Handle, Scheduler};
