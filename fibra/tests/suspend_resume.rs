use fibra::{Scheduler, current_fiber, yield_now};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::task::{Context, Poll};
use std::time::Duration;

#[test]
fn test_counter_survives_yields() {
    let scheduler = Scheduler::new().unwrap();
    let (tx, rx) = mpsc::channel();

    scheduler
        .submit(async move {
            let mut value = 0;
            for _ in 0..10 {
                value += 1;
                yield_now().await;
            }
            let _ = tx.send(value);
        })
        .unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 10);
}

#[test]
fn test_result_is_only_sent_after_the_last_resume() {
    const YIELDS: usize = 25;

    let scheduler = Scheduler::new().unwrap();
    let resumes = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();

    let counter = resumes.clone();
    scheduler
        .submit(async move {
            let mut value = 0;
            for _ in 0..YIELDS {
                value += 1;
                yield_now().await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
            let _ = tx.send(value);
        })
        .unwrap();

    let value = rx.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(value, YIELDS);
    assert_eq!(resumes.load(Ordering::SeqCst), YIELDS);
}

#[test]
fn test_locals_are_preserved_across_suspensions() {
    let scheduler = Scheduler::new().unwrap();
    let (tx, rx) = mpsc::channel();

    scheduler
        .submit(async move {
            let mut words = Vec::new();
            let text = String::from("first come first served");
            for word in text.split(' ') {
                words.push(word.to_uppercase());
                yield_now().await;
            }
            let _ = tx.send(words.join("-"));
        })
        .unwrap();

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        "FIRST-COME-FIRST-SERVED"
    );
}

/// A future that stays pending for a fixed number of polls.
struct PendingFor(usize);

impl Future for PendingFor {
    type Output = usize;

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<usize> {
        if self.0 == 0 {
            return Poll::Ready(7);
        }
        self.0 -= 1;
        Poll::Pending
    }
}

#[test]
fn test_any_pending_await_is_a_suspension() {
    let scheduler = Scheduler::new().unwrap();
    let (tx, rx) = mpsc::channel();

    scheduler
        .submit(async move {
            let value = PendingFor(3).await;
            let _ = tx.send(value);
        })
        .unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
}

#[test]
fn test_current_fiber_is_set_only_inside_fibers() {
    let scheduler = Scheduler::new().unwrap();
    let handle = scheduler.handle();
    let (tx, rx) = mpsc::channel();

    assert_eq!(current_fiber(), None);
    assert!(!handle.is_worker_thread());

    let inner = handle.clone();
    let id = handle
        .submit(async move {
            let before = current_fiber();
            yield_now().await;
            let after = current_fiber();
            let _ = tx.send((before, after, inner.is_worker_thread()));
        })
        .unwrap();

    let (before, after, on_worker) = rx.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(before, Some(id));
    assert_eq!(after, Some(id));
    assert!(on_worker);
    assert_eq!(current_fiber(), None);
}

#[test]
fn test_fiber_ids_increase_in_submission_order() {
    let scheduler = Scheduler::new().unwrap();

    let first = scheduler.submit(async {}).unwrap();
    let second = scheduler.submit(async {}).unwrap();

    assert!(first < second);
    assert_eq!(first.to_string(), format!("fiber#{}", first.as_u64()));
}

#[test]
fn test_panicking_fiber_does_not_stop_the_worker() {
    let scheduler = Scheduler::new().unwrap();
    let (tx, rx) = mpsc::channel();

    scheduler
        .submit(async {
            yield_now().await;
            panic!("fiber failure");
        })
        .unwrap();

    scheduler
        .submit(async move {
            for _ in 0..3 {
                yield_now().await;
            }
            let _ = tx.send("still running");
        })
        .unwrap();

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        "still running"
    );

    scheduler.shutdown();
}

/// Panics when dropped.
struct PanicOnDrop;

impl Drop for PanicOnDrop {
    fn drop(&mut self) {
        panic!("destructor failure");
    }
}

#[test]
fn test_panicking_destructor_of_finished_fiber_does_not_stop_the_worker() {
    let scheduler = Scheduler::new().unwrap();
    let (tx, rx) = mpsc::channel();

    let guard = PanicOnDrop;
    scheduler
        .submit(async move {
            let _guard = guard;
        })
        .unwrap();

    scheduler
        .submit(async move {
            yield_now().await;
            let _ = tx.send(1);
        })
        .unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);

    let handle = scheduler.handle();
    assert!(!handle.is_shut_down());
    scheduler.shutdown();
    assert_eq!(handle.outstanding(), 0);
}
