// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Resource availability updaters.
//!
//! There is one updater per kind of resource.  The agent only announces what it puts on the
//! table; the updater for each kind is what records it, and then decides, from the whole table,
//! which smoker (if any) can go.  The two updaters of a pair run one after the other under the
//! lock, so the first never sees a complete pair and the second always does.

use log::debug;

use crate::error::Result;
use crate::resource::ResourceKind;
use crate::session::AgentSession;
use crate::sync::Arc;
use crate::thread::{self, Worker};

/// Start the updater for `kind` on its own thread.
pub fn spawn_updater(session: &Arc<AgentSession>, kind: ResourceKind) -> Result<Worker> {
    let session = session.clone();
    thread::spawn(format!("updater-{}", kind), move || update(&session, kind))
}

/// The updater loop for `kind`.  Returns when the session is shut down.
pub fn update(session: &AgentSession, kind: ResourceKind) -> Result<()> {
    debug!("updater {}: started", kind);

    let mut state = session.lock()?;
    loop {
        state = session
            .available(kind)
            .wait_while(state, |s| !s.is_offered(kind) && !s.is_closing())?;
        if state.is_closing() {
            break;
        }

        if let Some(smoker) = state.record_available(kind) {
            session.ready(smoker).notify_one();
        }
    }

    debug!("updater {}: stopped", kind);
    Ok(())
}
