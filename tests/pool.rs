//! Worker pool quiescence and re-entrancy (spec.md §4.D, §9 open question
//! on `execute` ordering).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tfindex::WorkerPool;

#[test]
fn finish_is_a_true_barrier_across_many_jobs() {
    let pool = WorkerPool::new(6);
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..500 {
        let counter = Arc::clone(&counter);
        pool.execute(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }
    pool.finish();
    assert_eq!(counter.load(Ordering::SeqCst), 500);
}

#[test]
fn nested_execute_chains_are_all_observed_before_finish_returns() {
    let pool = Arc::new(WorkerPool::new(4));
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..20 {
        let pool2 = Arc::clone(&pool);
        let counter2 = Arc::clone(&counter);
        pool.execute(move || {
            counter2.fetch_add(1, Ordering::SeqCst);
            let pool3 = Arc::clone(&pool2);
            let counter3 = Arc::clone(&counter2);
            pool2.execute(move || {
                counter3.fetch_add(1, Ordering::SeqCst);
                let counter4 = Arc::clone(&counter3);
                pool3.execute(move || {
                    counter4.fetch_add(1, Ordering::SeqCst);
                });
            });
        });
    }

    pool.finish();
    assert_eq!(counter.load(Ordering::SeqCst), 60);
}

#[test]
fn a_panicking_task_does_not_deadlock_finish() {
    let pool = WorkerPool::new(2);
    for i in 0..10 {
        pool.execute(move || {
            if i % 3 == 0 {
                panic!("boom {i}");
            }
        });
    }
    pool.finish();
}
