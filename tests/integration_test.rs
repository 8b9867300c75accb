use kernex::prelude::*;
use std::sync::Arc;

fn wrapped_pool(threads: usize) -> Arc<WrappedPool> {
    let config = Config::builder().num_threads(threads).build().unwrap();
    let executor = CpuPool::new(&config).unwrap();
    Arc::new(WrappedPool::new(Arc::new(executor)))
}

#[test]
fn test_null_pool_counts() {
    assert_eq!(NullPool.thread_count(), 1);
    assert_eq!(NullPool.negotiate(0), 1);
    assert_eq!(NullPool.negotiate(7), 1);
}

#[test]
fn test_null_pool_runs_before_submit_returns() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let done = Arc::new(AtomicBool::new(false));
    let inner = done.clone();
    NullPool.execute(move || {
        inner.store(true, Ordering::SeqCst);
    });

    assert!(done.load(Ordering::SeqCst));
}

#[test]
fn test_negotiate_caps_at_worker_count() {
    let pool = wrapped_pool(4);

    assert_eq!(pool.thread_count(), 4);
    for requested in 1..=4 {
        assert_eq!(pool.negotiate(requested), requested);
    }
    assert_eq!(pool.negotiate(5), 4);
    assert_eq!(pool.negotiate(1000), 4);
}

#[test]
fn test_negotiate_zero_means_all() {
    let pool = wrapped_pool(3);
    assert_eq!(pool.negotiate(0), 3);
}

#[test]
fn test_negotiate_inside_worker_returns_one() {
    let pool = wrapped_pool(2);
    let (tx, rx) = crossbeam_channel::bounded(3);

    let inner = pool.clone();
    pool.execute(move || {
        tx.send((inner.negotiate(0), inner.negotiate(1), inner.negotiate(8)))
            .unwrap();
    });

    // Any request from a task running on the pool's own worker caps at 1.
    assert_eq!(rx.recv().unwrap(), (1, 1, 1));
}

#[test]
fn test_negotiate_on_foreign_pool_unaffected() {
    let busy = wrapped_pool(2);
    let other = wrapped_pool(3);
    let (tx, rx) = crossbeam_channel::bounded(1);

    // A worker of `busy` is a foreign thread to `other`, so the guard
    // must not trip there.
    let other_handle = other.clone();
    busy.execute(move || {
        tx.send(other_handle.negotiate(0)).unwrap();
    });

    assert_eq!(rx.recv().unwrap(), 3);
}

#[test]
fn test_active_pool_defaults_to_global() {
    let first = get_active_pool();
    let second = get_active_pool();
    assert!(Arc::ptr_eq(&first, &second));

    let global = global_pool();
    assert!(Arc::ptr_eq(&first, &global));
}

#[test]
fn test_set_active_pool_exchanges() {
    let restricted: Arc<dyn ThreadPool> = wrapped_pool(1);

    let previous = set_active_pool(Some(restricted.clone()));

    let bound = get_active_pool();
    assert!(Arc::ptr_eq(&bound, &restricted));

    let back = set_active_pool(previous).unwrap();
    assert!(Arc::ptr_eq(&back, &restricted));
}

#[test]
fn test_with_pool_scopes_the_binding() {
    let outer = get_active_pool();
    let scoped: Arc<dyn ThreadPool> = Arc::new(NullPool);

    let negotiated = with_pool(scoped, || get_active_pool().negotiate(64));
    assert_eq!(negotiated, 1);

    let after = get_active_pool();
    assert!(Arc::ptr_eq(&after, &outer));
}

#[test]
fn test_global_pool_identity_across_threads() {
    let here = global_pool();

    let there = std::thread::spawn(get_active_pool).join().unwrap();
    assert!(Arc::ptr_eq(&here, &there));
}

#[test]
fn test_submit_through_active_pool() {
    let (tx, rx) = crossbeam_channel::bounded(8);

    let pool = get_active_pool();
    for i in 0..8 {
        let tx = tx.clone();
        pool.execute(move || {
            tx.send(i).unwrap();
        });
    }

    let mut seen: Vec<i32> = (0..8).map(|_| rx.recv().unwrap()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..8).collect::<Vec<_>>());
}
