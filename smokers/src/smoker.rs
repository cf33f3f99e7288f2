// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Smokers.
//!
//! A smoker holds one kind of resource and waits for the other two.  It only ever waits on its
//! own `ready` condition, so it can only be woken for its own pair.

use log::{debug, trace};

use crate::error::Result;
use crate::resource::ResourceKind;
use crate::session::AgentSession;
use crate::sync::Arc;
use crate::thread::{self, Worker};

/// Start the smoker holding `kind` on its own thread.
pub fn spawn_smoker(session: &Arc<AgentSession>, kind: ResourceKind) -> Result<Worker> {
    let session = session.clone();
    thread::spawn(format!("smoker-{}", kind), move || smoke(&session, kind))
}

/// The smoker loop for `kind`.  Returns when the session is shut down.
pub fn smoke(session: &AgentSession, kind: ResourceKind) -> Result<()> {
    debug!("smoker {}: started", kind);

    let mut state = session.lock()?;
    loop {
        state = session
            .ready(kind)
            .wait_while(state, |s| !s.is_ready(kind) && !s.is_closing())?;
        if state.is_closing() {
            break;
        }

        state.consume(kind);
        session.smoke().notify_one();
        trace!("smoker {}: smoked {}", kind, kind.needs());
    }

    debug!("smoker {}: stopped", kind);
    Ok(())
}
