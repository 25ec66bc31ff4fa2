//! Unit tests for the environment guards.

use std::sync::{Arc, Barrier};
use std::thread;

use super::{EnvVarGuard, lock, remove_var, set_var, with_lock};

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn clear(key: &str) {
    with_lock(|| {
        // SAFETY: ENV_MUTEX is held via with_lock.
        unsafe { super::env_remove_var(key) };
    });
}

#[test]
fn set_var_restores_the_prior_value() {
    let key = "STRATA_HELPERS_SET";
    clear(key);
    let outer = set_var(key, "original");
    {
        let _inner = set_var(key, "temporary");
        assert_eq!(env_value(key).as_deref(), Some("temporary"));
    }
    assert_eq!(env_value(key).as_deref(), Some("original"));
    drop(outer);
    assert_eq!(env_value(key), None);
}

#[test]
fn remove_var_restores_the_prior_value() {
    let key = "STRATA_HELPERS_REMOVE";
    clear(key);
    let seeded = set_var(key, "kept");
    {
        let _removed = remove_var(key);
        assert_eq!(env_value(key), None);
    }
    assert_eq!(env_value(key).as_deref(), Some("kept"));
    drop(seeded);
}

#[test]
fn stacked_guards_restore_in_lifo_order() {
    let key = "STRATA_HELPERS_STACK";
    clear(key);
    let first = set_var(key, "v1");
    let second = set_var(key, "v2");
    assert_eq!(env_value(key).as_deref(), Some("v2"));
    drop(second);
    assert_eq!(env_value(key).as_deref(), Some("v1"));
    drop(first);
    assert_eq!(env_value(key), None);
}

#[test]
fn locked_mutations_share_the_reentrant_mutex() {
    let key = "STRATA_HELPERS_LOCKED";
    clear(key);
    let held = lock();
    let guard: EnvVarGuard = held.set_var(key, "held");
    assert_eq!(env_value(key).as_deref(), Some("held"));
    drop(guard);
    drop(held);
    assert_eq!(env_value(key), None);
}

#[test]
fn concurrent_guards_on_distinct_keys_restore_cleanly() {
    const THREADS: usize = 4;
    const ITERATIONS: usize = 8;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|index| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let key = format!("STRATA_HELPERS_WORKER_{index}");
                barrier.wait();
                for iteration in 0..ITERATIONS {
                    let value = format!("value-{iteration}");
                    let guard = set_var(&key, &value);
                    assert_eq!(env_value(&key).as_deref(), Some(value.as_str()));
                    drop(guard);
                    assert_eq!(env_value(&key), None);
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok());
    }
}
