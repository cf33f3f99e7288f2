// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! # The agent session: one monitor for the whole table
//!
//! The session holds a single [`Mutex`] around [`SharedState`], and seven condition variables that
//! are only ever used with that mutex:
//!
//! - `available[k]`: the agent put kind `k` on the table.  Waited on by the updater for `k`.
//! - `ready[k]`: the pair needed by smoker `k` is complete.  Waited on by smoker `k`.
//! - `smoke`: a smoker finished.  Waited on by the agent.
//!
//! Condition variable notifications are not remembered, and any of the waiters may still be on
//! its way to the wait when it is notified.  So each condition has a matching token in the shared
//! state (`offered`, `ready`, `smoked`), set under the lock together with the notify, and cleared
//! by the waiter that consumes it.  Waiters only ever block while their token is clear.
//!
//! The transitions on the shared state are plain methods on [`SharedState`], so the protocol can
//! be checked without any threads.  The agent, updaters and smokers only add the waiting and the
//! notifications around them.

use log::{error, trace};

use crate::error::Result;
use crate::resource::{Availability, Counters, Pair, ResourceKind};
use crate::sync::{Condvar, Mutex, MutexGuard};

/// Something that happened on the table, as recorded by a traced session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The agent put a pair on the table.
    Offered(Pair),
    /// A smoker took its pair off the table.
    Smoked(ResourceKind),
}

/// Everything protected by the session lock.
#[derive(Debug, Default)]
pub struct SharedState {
    /// What is on the table.  Only updaters set these, only smokers clear them.
    avail: Availability,
    /// Announced by the agent, not yet recorded by the updater.
    offered: [bool; 3],
    /// Woken by an updater, not yet consumed by the smoker.
    ready: [bool; 3],
    /// A smoker finished, and the agent has not noticed yet.
    smoked: bool,
    /// The table is being torn down.
    closing: bool,
    counters: Counters,
    /// How often a smoker found something other than its pair on the table.
    violations: u64,
    trace: Option<Vec<Event>>,
}

impl SharedState {
    pub fn availability(&self) -> Availability {
        self.avail
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn violations(&self) -> u64 {
        self.violations
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn is_offered(&self, kind: ResourceKind) -> bool {
        self.offered[kind.index()]
    }

    pub fn is_ready(&self, kind: ResourceKind) -> bool {
        self.ready[kind.index()]
    }

    pub fn has_smoked(&self) -> bool {
        self.smoked
    }

    /// The agent announces `pair`.
    ///
    /// Counts the signal for the smoker expected to take the pair, and leaves a token for the
    /// updater of each kind in the pair.  The availability flags are left alone; recording them
    /// is the updaters' job.
    pub fn offer(&mut self, pair: Pair) {
        debug_assert!(!self.smoked, "offer made before the last smoke was taken");
        self.counters.record_signal(pair.smoker());
        for kind in pair.kinds() {
            self.offered[kind.index()] = true;
        }
        self.record(Event::Offered(pair));
    }

    /// The updater for `kind` records that its resource is on the table.
    ///
    /// Returns the smoker to wake, if this completed a pair.  That smoker's token is already set.
    pub fn record_available(&mut self, kind: ResourceKind) -> Option<ResourceKind> {
        self.offered[kind.index()] = false;
        self.avail.set(kind);

        let smoker = self.avail.matching_smoker();
        match smoker {
            Some(smoker) => {
                trace!("{} completes {} for {}", kind, smoker.needs(), smoker);
                self.ready[smoker.index()] = true;
            }
            None if self.avail.count() > 2 => {
                error!("every resource is on the table: {}", self.avail);
                self.violations += 1;
            }
            None => trace!("{} waits for a partner: {}", kind, self.avail),
        }
        smoker
    }

    /// Smoker `kind` takes its pair off the table.
    ///
    /// Both flags of the pair are cleared, the agent's token is set, and the smoke is counted.
    /// If the table did not hold exactly that pair, the smoke still happens, but it is counted
    /// as a violation.
    pub fn consume(&mut self, kind: ResourceKind) {
        self.ready[kind.index()] = false;

        let pair = kind.needs();
        if !self.avail.holds(pair) {
            error!("{} woken for {}, table has {}", kind, pair, self.avail);
            self.violations += 1;
        }
        for other in pair.kinds() {
            self.avail.clear(other);
        }

        self.smoked = true;
        self.counters.record_smoke(kind);
        self.record(Event::Smoked(kind));
    }

    /// The agent takes the token left by the last smoker.
    pub fn take_smoke(&mut self) -> bool {
        core::mem::replace(&mut self.smoked, false)
    }

    fn record(&mut self, event: Event) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(event);
        }
    }
}

/// The monitor shared by the agent, the updaters and the smokers.
#[derive(Debug)]
pub struct AgentSession {
    lock: Mutex<SharedState>,
    available: [Condvar; 3],
    ready: [Condvar; 3],
    smoke: Condvar,
}

impl AgentSession {
    /// Create the lock and the conditions, with an empty table.
    pub fn new() -> AgentSession {
        Self::from_state(SharedState::default())
    }

    /// Like `new`, but every offer and smoke is kept in an event log, see [`events`].
    ///
    /// [`events`]: AgentSession::events
    pub fn with_trace() -> AgentSession {
        Self::from_state(SharedState {
            trace: Some(Vec::new()),
            ..SharedState::default()
        })
    }

    fn from_state(state: SharedState) -> AgentSession {
        AgentSession {
            lock: Mutex::new(state),
            available: Default::default(),
            ready: Default::default(),
            smoke: Condvar::new(),
        }
    }

    /// Take the session lock.
    pub fn lock(&self) -> Result<MutexGuard<'_, SharedState>> {
        self.lock.lock()
    }

    /// The condition the updater for `kind` waits on.
    pub fn available(&self, kind: ResourceKind) -> &Condvar {
        &self.available[kind.index()]
    }

    /// The condition smoker `kind` waits on.
    pub fn ready(&self, kind: ResourceKind) -> &Condvar {
        &self.ready[kind.index()]
    }

    /// The condition the agent waits on.
    pub fn smoke(&self) -> &Condvar {
        &self.smoke
    }

    /// How often the agent put out a pair meant for smoker `kind`.
    pub fn signal_count(&self, kind: ResourceKind) -> Result<u64> {
        Ok(self.lock()?.counters.signal_count(kind))
    }

    /// How often smoker `kind` smoked.
    pub fn smoke_count(&self, kind: ResourceKind) -> Result<u64> {
        Ok(self.lock()?.counters.smoke_count(kind))
    }

    /// A snapshot of all of the counters, taken under the lock.
    pub fn counters(&self) -> Result<Counters> {
        Ok(self.lock()?.counters)
    }

    pub fn violations(&self) -> Result<u64> {
        Ok(self.lock()?.violations)
    }

    /// The event log.  Empty for sessions created without [`with_trace`].
    ///
    /// [`with_trace`]: AgentSession::with_trace
    pub fn events(&self) -> Result<Vec<Event>> {
        Ok(self.lock()?.trace.clone().unwrap_or_default())
    }

    /// Tell every worker to stop.
    ///
    /// Sets the closing flag and wakes every condition.  Workers exit the next time they hold the
    /// lock.  Even if the lock is poisoned, the conditions are still woken, so that blocked workers
    /// return with the error instead of sleeping forever.
    pub fn shutdown(&self) -> Result<()> {
        match self.lock() {
            Ok(mut state) => {
                state.closing = true;
                self.wake_all();
                Ok(())
            }
            Err(err) => {
                self.wake_all();
                Err(err)
            }
        }
    }

    fn wake_all(&self) {
        self.available.iter().for_each(Condvar::notify_all);
        self.ready.iter().for_each(Condvar::notify_all);
        self.smoke.notify_all();
    }
}

impl Default for AgentSession {
    fn default() -> Self {
        AgentSession::new()
    }
}
