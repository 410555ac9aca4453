//! Three fibers taking turns on one worker thread.
//!
//! Prints `Fiber[1:0]`, `Fiber[2:0]`, `Fiber[3:0]`, `Fiber[1:1]`, ... up to
//! `Fiber[3:9]`.

use fibra::{Scheduler, yield_now};
use std::sync::mpsc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let scheduler = Scheduler::new()?;
    let handle = scheduler.handle();
    let (ready_tx, ready_rx) = mpsc::channel();

    // Submitting from inside a fiber queues all three before any of them runs.
    scheduler.submit(async move {
        for i in 1..=3 {
            let submitted = handle.submit(async move {
                for j in 0..10 {
                    println!("Fiber[{i}:{j}]");
                    yield_now().await;
                }
            });

            if let Err(err) = submitted {
                eprintln!("fiber {i} rejected: {err}");
            }
        }
        let _ = ready_tx.send(());
    })?;

    ready_rx.recv()?;
    scheduler.shutdown();

    Ok(())
}
