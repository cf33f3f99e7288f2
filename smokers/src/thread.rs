// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Worker threads.
//!
//! The updaters and smokers each run on their own named OS thread.  A [`Worker`] is the handle to
//! one of these: it keeps the name around for diagnostics, and turns a panic in the thread into
//! an [`Error`] when joined.

use std::thread::{self, JoinHandle};

use crate::error::{Error, Result};

/// A running worker thread.
#[derive(Debug)]
pub struct Worker {
    name: String,
    handle: JoinHandle<Result<()>>,
}

/// Start `body` on a new thread called `name`.
pub fn spawn<F>(name: String, body: F) -> Result<Worker>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let handle = thread::Builder::new().name(name.clone()).spawn(body)?;
    Ok(Worker { name, handle })
}

impl Worker {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the thread to exit, and return what it returned.
    pub fn join(self) -> Result<()> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(Error::WorkerPanicked(self.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_returns_the_body_result() {
        let worker = spawn("ok".into(), || Ok(())).unwrap();
        assert_eq!(worker.name(), "ok");
        worker.join().unwrap();

        let worker = spawn("closed".into(), || Err(Error::Closed)).unwrap();
        assert!(matches!(worker.join(), Err(Error::Closed)));
    }

    #[test]
    fn panics_become_errors() {
        let worker = spawn("doomed".into(), || panic!("boom")).unwrap();
        match worker.join() {
            Err(Error::WorkerPanicked(name)) => assert_eq!(name, "doomed"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn thread_carries_the_name() {
        let worker = spawn("named".into(), || {
            assert_eq!(thread::current().name(), Some("named"));
            Ok(())
        })
        .unwrap();
        worker.join().unwrap();
    }
}
