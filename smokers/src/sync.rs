// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Synchronization primitives.
//!
//! These are modeled after the synchronization primitives in
//! [`std::sync`](https://doc.rust-lang.org/stable/std/sync/index.html), and are thin wrappers
//! around them.  The table is a single monitor: one [`Mutex`] around all of the shared state, and
//! several [`Condvar`]s that are only ever used with that one mutex.

pub use std::sync::Arc;

mod mutex;

pub use mutex::{Condvar, LockResult, Mutex, MutexGuard};
