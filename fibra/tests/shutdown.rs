use fibra::{Scheduler, SubmitError, yield_now};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

/// Sets a flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn test_shutdown_drains_admitted_fibers() {
    let scheduler = Scheduler::new().unwrap();
    let finished = Arc::new(AtomicUsize::new(0));

    for _ in 0..5 {
        let finished = finished.clone();
        scheduler
            .submit(async move {
                for _ in 0..100 {
                    yield_now().await;
                }
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }

    scheduler.shutdown();

    assert_eq!(finished.load(Ordering::SeqCst), 5);
}

#[test]
fn test_submit_after_shutdown_fails() {
    let scheduler = Scheduler::new().unwrap();
    let handle = scheduler.handle();

    assert!(!handle.is_shut_down());
    scheduler.shutdown();

    assert!(handle.is_shut_down());
    assert_eq!(handle.submit(async {}), Err(SubmitError::ShutDown));
    assert_eq!(handle.outstanding(), 0);
}

#[test]
fn test_drop_discards_pending_fibers() {
    let scheduler = Scheduler::new().unwrap();
    let running_dropped = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicBool::new(false));
    let (started_tx, started_rx) = mpsc::channel();

    let guard = DropFlag(running_dropped.clone());
    let done = finished.clone();
    scheduler
        .submit(async move {
            let _guard = guard;
            let _ = started_tx.send(());
            for _ in 0..1_000_000_000u64 {
                yield_now().await;
            }
            done.store(true, Ordering::SeqCst);
        })
        .unwrap();

    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let handle = scheduler.handle();
    drop(scheduler);

    assert!(running_dropped.load(Ordering::SeqCst));
    assert!(!finished.load(Ordering::SeqCst));
    assert!(handle.is_shut_down());
    assert_eq!(handle.outstanding(), 0);
    assert_eq!(handle.submit(async {}), Err(SubmitError::ShutDown));
}

/// Panics when dropped.
struct PanicOnDrop;

impl Drop for PanicOnDrop {
    fn drop(&mut self) {
        panic!("destructor failure");
    }
}

#[test]
fn test_drop_survives_panicking_destructors_of_discarded_fibers() {
    let scheduler = Scheduler::new().unwrap();
    let later_dropped = Arc::new(AtomicBool::new(false));
    let (started_tx, started_rx) = mpsc::channel();

    let guard = PanicOnDrop;
    scheduler
        .submit(async move {
            let _guard = guard;
            let _ = started_tx.send(());
            loop {
                yield_now().await;
            }
        })
        .unwrap();

    let flag = DropFlag(later_dropped.clone());
    scheduler
        .submit(async move {
            let _flag = flag;
            loop {
                yield_now().await;
            }
        })
        .unwrap();

    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let handle = scheduler.handle();
    drop(scheduler);

    assert!(later_dropped.load(Ordering::SeqCst));
    assert_eq!(handle.outstanding(), 0);
    assert_eq!(handle.submit(async {}), Err(SubmitError::ShutDown));
}

#[test]
fn test_shutdown_from_inside_a_fiber() {
    let scheduler = Scheduler::new().unwrap();
    let handle = scheduler.handle();
    let (tx, rx) = mpsc::channel();

    let inner = handle.clone();
    scheduler
        .submit(async move {
            inner.shutdown();
            let rejected = inner.submit(async {});
            yield_now().await;
            let _ = tx.send(rejected);
        })
        .unwrap();

    let rejected = rx.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(rejected, Err(SubmitError::ShutDown));
    assert!(handle.is_shut_down());

    scheduler.shutdown();
    assert_eq!(handle.outstanding(), 0);
}

#[test]
fn test_shutdown_from_several_handles() {
    let scheduler = Scheduler::new().unwrap();
    let handle = scheduler.handle();
    let finished = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let finished = finished.clone();
        handle
            .submit(async move {
                yield_now().await;
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let handle = handle.clone();
            std::thread::spawn(move || handle.shutdown())
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(finished.load(Ordering::SeqCst), 3);
    drop(scheduler);
}
