//! One fiber on the process-wide scheduler counts across ten suspensions and
//! reports the result through a channel.

use fibra::{Scheduler, yield_now};
use std::sync::mpsc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let (tx, rx) = mpsc::channel();

    let scheduler = Scheduler::access();
    scheduler.submit(async move {
        let mut value = 0;
        for _ in 0..10 {
            value += 1;
            yield_now().await;
        }
        let _ = tx.send(value);
    })?;

    println!("Value:{}", rx.recv()?);

    Ok(())
}
