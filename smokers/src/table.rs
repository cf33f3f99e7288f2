// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! # The table
//!
//! A [`Table`] ties the pieces together: one session, three updaters and three smokers, and the
//! agent run on the caller's thread.  The workers loop until the table is shut down, at which
//! point they are all joined.

use log::{debug, error};

use crate::agent::run_agent;
use crate::error::Result;
use crate::pairs::PairSource;
use crate::report::Report;
use crate::resource::ResourceKind;
use crate::session::AgentSession;
use crate::smoker::spawn_smoker;
use crate::sync::Arc;
use crate::thread::Worker;
use crate::updater::spawn_updater;

/// A session with all of its workers running.
pub struct Table {
    session: Arc<AgentSession>,
    workers: Vec<Worker>,
    iterations: usize,
}

impl Table {
    /// Start the smokers and updaters for `session`.
    ///
    /// If a thread cannot be started, the workers already running are shut down and joined
    /// before the error is returned.
    pub fn start(session: Arc<AgentSession>) -> Result<Table> {
        let mut table = Table {
            session,
            workers: Vec::with_capacity(2 * ResourceKind::ALL.len()),
            iterations: 0,
        };
        for kind in ResourceKind::ALL {
            table.workers.push(spawn_smoker(&table.session, kind)?);
        }
        for kind in ResourceKind::ALL {
            table.workers.push(spawn_updater(&table.session, kind)?);
        }
        debug!("table: {} workers started", table.workers.len());
        Ok(table)
    }

    pub fn session(&self) -> &Arc<AgentSession> {
        &self.session
    }

    /// Run the agent on this thread for `iterations` rounds.  May be called more than once; the
    /// rounds add up.
    pub fn run<S>(&mut self, iterations: usize, source: &mut S) -> Result<()>
    where
        S: PairSource + ?Sized,
    {
        run_agent(&self.session, iterations, source)?;
        self.iterations += iterations;
        Ok(())
    }

    /// Stop and join every worker, and report on the rounds run so far.
    pub fn shutdown(mut self) -> Result<Report> {
        self.close()?;
        Report::from_session(&self.session, self.iterations)
    }

    /// Shut down the session and join the workers, returning the first failure.  Every worker is
    /// joined even if an earlier one failed.
    fn close(&mut self) -> Result<()> {
        let mut result = self.session.shutdown();
        for worker in self.workers.drain(..) {
            let name = worker.name().to_owned();
            match worker.join() {
                Ok(()) => debug!("table: {} joined", name),
                Err(err) => {
                    error!("table: {} failed: {}", name, err);
                    if result.is_ok() {
                        result = Err(err);
                    }
                }
            }
        }
        result
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        if let Err(err) = self.close() {
            error!("table: shutdown on drop failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::ScriptedPairs;
    use crate::resource::Pair;

    #[test]
    fn start_and_shutdown_without_running() {
        let table = Table::start(Arc::new(AgentSession::new())).unwrap();
        let report = table.shutdown().unwrap();
        assert_eq!(report.iterations, 0);
        report.check().unwrap();
    }

    #[test]
    fn runs_add_up() {
        let mut table = Table::start(Arc::new(AgentSession::new())).unwrap();
        let mut source = ScriptedPairs::new(vec![Pair::MatchesPaper]);
        table.run(2, &mut source).unwrap();
        table.run(3, &mut source).unwrap();
        let report = table.shutdown().unwrap();
        assert_eq!(report.iterations, 5);
        assert_eq!(report.counters.smoke_count(ResourceKind::Tobacco), 5);
        report.check().unwrap();
    }

    #[test]
    fn drop_joins_the_workers() {
        let session = Arc::new(AgentSession::new());
        {
            let _table = Table::start(session.clone()).unwrap();
        }
        // The workers held the other references.
        assert_eq!(Arc::strong_count(&session), 1);
        assert!(session.lock().unwrap().is_closing());
    }
}
