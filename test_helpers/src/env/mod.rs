//! Helpers for safely mutating environment variables in tests.
//!
//! Each mutation acquires a global re-entrant mutex for the duration of the
//! set or remove operation and returns an RAII guard that restores the prior
//! state on drop, re-acquiring the mutex during restoration. Stacked guards
//! for the same key restore in LIFO order; operations on different keys may
//! interleave between guard creation and drop. Use [`lock`] when a test
//! needs exclusive access across several operations on shared keys.
//!
//! # Examples
//!
//! ```
//! use strata_config_test_helpers::env;
//!
//! let _guard = env::set_var("KEY", "VALUE");
//! // `KEY` is set to `VALUE` until the guard drops.
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Wrapper around `std::env::set_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX` so no other thread touches the environment.
unsafe fn env_set_var(key: &str, value: &OsStr) {
    unsafe { env::set_var(key, value) };
}

/// Wrapper around `std::env::remove_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX` so no other thread touches the environment.
unsafe fn env_remove_var(key: &str) {
    unsafe { env::remove_var(key) };
}

fn mutate<K, F>(key: K, mutator: F) -> EnvVarGuard
where
    K: Into<String>,
    F: FnOnce(&str),
{
    let guard = ENV_MUTEX.lock();
    mutate_locked(key.into(), mutator, &guard)
}

fn mutate_locked<F>(key: String, mutator: F, _guard: &ReentrantMutexGuard<'_, ()>) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        if let Some(value) = self.original.take() {
            // SAFETY: ENV_MUTEX is held for the restoration.
            unsafe { env_set_var(&self.key, &value) };
        } else {
            // SAFETY: ENV_MUTEX is held for the restoration.
            unsafe { env_remove_var(&self.key) };
        }
    }
}

/// RAII guard serialising environment access for its lifetime.
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::env;
///
/// let held = env::lock();
/// let _guard = held.set_var("KEY", "VALUE");
/// // Mutations stay serialised while `held` is alive.
/// ```
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Sets an environment variable while the lock is already held.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        mutate_locked(
            key.into(),
            // SAFETY: `self.guard` holds ENV_MUTEX for the mutation.
            |name| unsafe { env_set_var(name, value.as_ref()) },
            &self.guard,
        )
    }

    /// Removes an environment variable while the lock is already held.
    pub fn remove_var<K>(&self, key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        mutate_locked(
            key.into(),
            // SAFETY: `self.guard` holds ENV_MUTEX for the mutation.
            |name| unsafe { env_remove_var(name) },
            &self.guard,
        )
    }
}

/// Sets an environment variable and returns a guard restoring its prior
/// value.
///
/// The mutation and the later restoration each hold the global mutex;
/// operations on other keys may interleave in between.
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::env;
///
/// let _guard = env::set_var("FOO", "bar");
/// assert!(matches!(std::env::var("FOO"), Ok(ref value) if value == "bar"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` acquires ENV_MUTEX before running the closure.
    mutate(key, |name| unsafe { env_set_var(name, value.as_ref()) })
}

/// Removes an environment variable and returns a guard restoring its prior
/// value.
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::env;
///
/// let _guard = env::remove_var("FOO");
/// assert!(std::env::var("FOO").is_err());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    // SAFETY: `mutate` acquires ENV_MUTEX before running the closure.
    mutate(key, |name| unsafe { env_remove_var(name) })
}

/// Acquires the global environment lock for the lifetime of the guard.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        guard: ENV_MUTEX.lock(),
    }
}

/// Runs a closure while holding the global environment lock.
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::env;
///
/// env::with_lock(|| {
///     let _guard = env::set_var("KEY", "VALUE");
/// });
/// ```
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    f()
}

#[cfg(test)]
mod tests;
