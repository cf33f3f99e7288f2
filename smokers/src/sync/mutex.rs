// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Mutex and Condvar for the table monitor.
//!
//! These follow the shape of [`std::sync::Mutex`] and [`std::sync::Condvar`], and are implemented
//! on top of them.  The difference is in the error: poisoning is not something the table can
//! recover from, so instead of handing back the poisoned guard, every operation that can observe
//! poisoning returns [`Error::Poisoned`].

use std::fmt;
use std::sync as imp;

use crate::error::{Error, Result};

/// Lock results carry the crate error instead of a `PoisonError`.
pub type LockResult<Guard> = Result<Guard>;

/// An RAII guard of a locked [`Mutex`].  The lock is released when this is dropped.
pub type MutexGuard<'a, T> = imp::MutexGuard<'a, T>;

/// A mutual exclusion primitive protecting shared data.
///
/// All of the condition variables of a session are used with a single one of these.
pub struct Mutex<T: ?Sized> {
    inner: imp::Mutex<T>,
}

impl<T> Mutex<T> {
    /// Construct a new Mutex holding `t`.
    pub const fn new(t: T) -> Mutex<T> {
        Mutex { inner: imp::Mutex::new(t) }
    }
}

impl<T: ?Sized> Mutex<T> {
    /// Acquires the mutex, blocking the current thread until it is able to do so.
    ///
    /// Returns [`Error::Poisoned`] if another thread panicked while holding the lock.
    pub fn lock(&self) -> LockResult<MutexGuard<'_, T>> {
        self.inner.lock().map_err(|_| Error::Poisoned)
    }
}

impl<T: ?Sized> fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mutex {{ poisoned: {} }}", self.inner.is_poisoned())
    }
}

/// A condition variable, always used together with the one [`Mutex`] of a session.
///
/// Notifications are not buffered.  A `notify_one` with no thread waiting is lost, so every wait
/// must be paired with a predicate in the protected data that the waiter re-checks.  The
/// [`wait_while`] method does exactly that.
///
/// [`wait_while`]: Condvar::wait_while
pub struct Condvar {
    inner: imp::Condvar,
}

impl Condvar {
    /// Construct a new Condvar.
    pub const fn new() -> Condvar {
        Condvar { inner: imp::Condvar::new() }
    }

    /// Blocks the current thread until this condition variable receives a notification.
    ///
    /// The mutex behind `guard` is released while blocked and re-acquired before returning.  This
    /// may wake spuriously.
    pub fn wait<'a, T>(&self, guard: MutexGuard<'a, T>) -> LockResult<MutexGuard<'a, T>> {
        self.inner.wait(guard).map_err(|_| Error::Poisoned)
    }

    /// Blocks the current thread as long as `condition` returns true.
    ///
    /// The condition is checked before the first wait, and again after every wakeup, with the
    /// lock held each time.
    pub fn wait_while<'a, T, F>(
        &self,
        guard: MutexGuard<'a, T>,
        condition: F,
    ) -> LockResult<MutexGuard<'a, T>>
    where
        F: FnMut(&mut T) -> bool,
    {
        self.inner
            .wait_while(guard, condition)
            .map_err(|_| Error::Poisoned)
    }

    /// Wakes up one blocked thread on this condvar.
    pub fn notify_one(&self) {
        self.inner.notify_one();
    }

    /// Wakes up all blocked threads on this condvar.
    pub fn notify_all(&self) {
        self.inner.notify_all();
    }
}

impl Default for Condvar {
    fn default() -> Self {
        Condvar::new()
    }
}

impl fmt::Debug for Condvar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condvar")
    }
}
