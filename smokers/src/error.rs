// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! # Smokers errors
//!
//! This module contains an `Error` and `Result` type for the table.  The protocol itself has no
//! recoverable failures: a deadlock is found by a watchdog, and a wrong match is a logic defect.
//! What remains are the failures of the primitives underneath (a poisoned monitor, a thread that
//! could not be spawned or that panicked), and the results of checking a finished run.

use std::fmt;
use std::io;

/// An error from the smokers table.
pub enum Error {
    /// A thread panicked while holding the monitor lock.  The shared state can no longer be
    /// trusted.
    Poisoned,
    /// The operating system refused to start a worker thread.
    Spawn(io::Error),
    /// A worker thread panicked.  Holds the name of the worker.
    WorkerPanicked(String),
    /// The counters at the end of a run do not balance.
    Mismatch(String),
    /// A smoker observed a pair that it should never have been woken for.
    Invariant(String),
    /// The table was shut down while the agent was still waiting for a smoker.
    Closed,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Spawn(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Poisoned => write!(f, "monitor lock poisoned"),
            Error::Spawn(err) => write!(f, "unable to spawn worker: {}", err),
            Error::WorkerPanicked(name) => write!(f, "worker {} panicked", name),
            Error::Mismatch(msg) => write!(f, "counter mismatch: {}", msg),
            Error::Invariant(msg) => write!(f, "invariant violated: {}", msg),
            Error::Closed => write!(f, "table closed"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "smokers error: {}", self)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Spawn(err)
    }
}

/// Wraps a value with a possible table error.
pub type Result<T> = core::result::Result<T, Error>;
