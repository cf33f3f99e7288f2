// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! The cigarette smokers problem, solved with a monitor.
//!
//! An agent repeatedly puts two of three resources (matches, paper, tobacco) on a table.  Three
//! smokers each hold an endless supply of one resource and need the other two.  The agent
//! doesn't know who to wake; it only announces what it put out.  One updater thread per resource
//! records the announcement, and the updater that completes a pair wakes the one smoker that
//! needs it.  The smoker clears the table and wakes the agent for the next round.
//!
//! Everything is coordinated by a single mutex in an [`AgentSession`], with one condition
//! variable per announcement, one per smoker, and one for the agent.
//!
//! ```no_run
//! use smokers::{AgentSession, RandomPairs, Table};
//! use std::sync::Arc;
//!
//! # fn main() -> smokers::Result<()> {
//! let mut table = Table::start(Arc::new(AgentSession::new()))?;
//! table.run(500, &mut RandomPairs::from_entropy())?;
//! let report = table.shutdown()?;
//! report.check()?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod logging;
pub mod pairs;
pub mod report;
pub mod resource;
pub mod session;
pub mod smoker;
pub mod sync;
pub mod table;
pub mod thread;
pub mod updater;

pub use agent::run_agent;
pub use error::{Error, Result};
pub use logging::set_logger;
pub use pairs::{PairSource, RandomPairs, ScriptedPairs};
pub use report::{check_events, Report};
pub use resource::{Availability, Counters, Pair, ResourceKind};
pub use session::{AgentSession, Event, SharedState};
pub use smoker::spawn_smoker;
pub use table::Table;
pub use updater::spawn_updater;
