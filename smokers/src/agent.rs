// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! The agent.
//!
//! The agent is the only producer.  It takes the session lock once, and keeps it for the whole
//! run except while waiting for a smoker.  Each iteration it draws a pair, announces both halves
//! of it, counts the signal for the smoker that should take it, and waits for the smoke.

use log::{debug, info, trace};

use crate::error::{Error, Result};
use crate::pairs::PairSource;
use crate::session::AgentSession;

/// Run the agent for `iterations` rounds, drawing pairs from `source`.
///
/// Returns once every round has been smoked.  With zero iterations, this returns without ever
/// waiting.  If the session is shut down while waiting for a smoker, returns [`Error::Closed`].
pub fn run_agent<S>(session: &AgentSession, iterations: usize, source: &mut S) -> Result<()>
where
    S: PairSource + ?Sized,
{
    info!("agent: {} iterations from {:?}", iterations, source);

    let mut state = session.lock()?;
    for round in 0..iterations {
        let pair = source.next_pair();
        trace!("round {}: offering {}", round, pair);

        state.offer(pair);
        for kind in pair.kinds() {
            session.available(kind).notify_one();
        }

        state = session
            .smoke()
            .wait_while(state, |s| !s.has_smoked() && !s.is_closing())?;
        if !state.take_smoke() {
            debug!("agent: closed during round {}", round);
            return Err(Error::Closed);
        }
    }

    info!("agent: done, {}", state.counters().total_smokes());
    Ok(())
}
