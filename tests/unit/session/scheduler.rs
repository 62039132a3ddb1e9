use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use super::*;

#[test]
fn runs_repeatedly_until_stopped() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    let mut sched = FixedRateScheduler::start("test-tick", Duration::from_millis(5), move || {
        c.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    thread::sleep(Duration::from_millis(100));
    assert!(sched.is_running());
    assert!(sched.stop(Duration::from_secs(1)));
    let after_stop = count.load(Ordering::SeqCst);
    assert!(after_stop >= 3, "only {after_stop} ticks");
    thread::sleep(Duration::from_millis(30));
    assert_eq!(count.load(Ordering::SeqCst), after_stop);
    assert!(!sched.is_running());
}

#[test]
fn first_tick_is_immediate() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    let mut sched = FixedRateScheduler::start("test-first", Duration::from_secs(60), move || {
        c.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while count.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);
    // Stop interrupts the long sleep instead of waiting out the period.
    assert!(sched.stop(Duration::from_secs(1)));
}

#[test]
fn slow_tick_is_detached_after_grace() {
    let mut sched = FixedRateScheduler::start("test-slow", Duration::from_millis(1), || {
        thread::sleep(Duration::from_millis(300));
    })
    .unwrap();
    thread::sleep(Duration::from_millis(20));
    assert!(!sched.stop(Duration::from_millis(10)));
}

#[test]
fn stopping_twice_is_harmless() {
    let mut sched = FixedRateScheduler::start("test-twice", Duration::from_millis(5), || {}).unwrap();
    assert!(sched.stop(Duration::from_secs(1)));
    assert!(sched.stop(Duration::from_secs(1)));
}
