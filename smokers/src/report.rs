// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Checking a finished run.
//!
//! Once the agent has returned, the counters have to balance: every pair the agent meant for a
//! smoker was smoked by that smoker, and there was one smoke per round.

use core::fmt;

use log::info;

use crate::error::{Error, Result};
use crate::resource::{Counters, ResourceKind};
use crate::session::{AgentSession, Event};

/// The outcome of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    /// How many rounds the agent completed.
    pub iterations: usize,
    pub counters: Counters,
    /// Smokers that found something other than their pair, or tables with all three resources.
    pub violations: u64,
}

impl Report {
    /// Read the final counters from `session`.  Only meaningful once the agent has returned.
    pub fn from_session(session: &AgentSession, iterations: usize) -> Result<Report> {
        let state = session.lock()?;
        Ok(Report {
            iterations,
            counters: state.counters(),
            violations: state.violations(),
        })
    }

    /// Check every invariant, returning the first one that fails.
    pub fn check(&self) -> Result<()> {
        if self.violations != 0 {
            return Err(Error::Invariant(format!(
                "{} bad matches during the run",
                self.violations
            )));
        }
        for kind in ResourceKind::ALL {
            let signaled = self.counters.signal_count(kind);
            let smoked = self.counters.smoke_count(kind);
            if signaled != smoked {
                return Err(Error::Mismatch(format!(
                    "{}: signaled {}, smoked {}",
                    kind, signaled, smoked
                )));
            }
        }
        let total = self.counters.total_smokes();
        if total != self.iterations as u64 {
            return Err(Error::Mismatch(format!(
                "{} smokes in {} iterations",
                total, self.iterations
            )));
        }
        info!("{}", self);
        Ok(())
    }
}

/// Check a traced run: every offer is followed by exactly one smoke, by the smoker that needs the
/// offered pair, before the next offer.
pub fn check_events(events: &[Event]) -> Result<()> {
    let mut pending = None;
    for (pos, event) in events.iter().enumerate() {
        match (*event, pending) {
            (Event::Offered(pair), None) => pending = Some(pair),
            (Event::Smoked(kind), Some(pair)) if kind == pair.smoker() => pending = None,
            (event, _) => {
                return Err(Error::Invariant(format!(
                    "event {}: {:?} while waiting on {:?}",
                    pos, event, pending
                )));
            }
        }
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ResourceKind::*;
        write!(
            f,
            "Smoke counts: {} matches, {} paper, {} tobacco",
            self.counters.smoke_count(Matches),
            self.counters.smoke_count(Paper),
            self.counters.smoke_count(Tobacco)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ResourceKind::*;

    fn report(signals: &[ResourceKind], smokes: &[ResourceKind], iterations: usize) -> Report {
        let mut counters = Counters::default();
        signals.iter().for_each(|&k| counters.record_signal(k));
        smokes.iter().for_each(|&k| counters.record_smoke(k));
        Report { iterations, counters, violations: 0 }
    }

    #[test]
    fn balanced_run_passes() {
        let r = report(&[Matches, Paper, Paper], &[Paper, Matches, Paper], 3);
        r.check().unwrap();
        assert_eq!(r.to_string(), "Smoke counts: 1 matches, 2 paper, 0 tobacco");
    }

    #[test]
    fn empty_run_passes() {
        report(&[], &[], 0).check().unwrap();
    }

    #[test]
    fn wrong_smoker_is_a_mismatch() {
        let r = report(&[Matches], &[Tobacco], 1);
        assert!(matches!(r.check(), Err(Error::Mismatch(_))));
    }

    #[test]
    fn missing_smokes_are_a_mismatch() {
        let r = report(&[Paper], &[Paper], 2);
        assert!(matches!(r.check(), Err(Error::Mismatch(_))));
    }

    #[test]
    fn events_must_alternate() {
        use crate::resource::Pair;

        let good = [
            Event::Offered(Pair::MatchesPaper),
            Event::Smoked(Tobacco),
            Event::Offered(Pair::PaperTobacco),
        ];
        // A trailing offer is a round still in progress.
        check_events(&good).unwrap();

        let twice = [
            Event::Offered(Pair::MatchesPaper),
            Event::Smoked(Tobacco),
            Event::Smoked(Tobacco),
        ];
        assert!(matches!(check_events(&twice), Err(Error::Invariant(_))));

        let wrong = [Event::Offered(Pair::MatchesPaper), Event::Smoked(Paper)];
        assert!(matches!(check_events(&wrong), Err(Error::Invariant(_))));
    }

    #[test]
    fn violations_fail_first() {
        let mut r = report(&[Paper], &[Paper], 1);
        r.violations = 1;
        assert!(matches!(r.check(), Err(Error::Invariant(_))));
    }
}
