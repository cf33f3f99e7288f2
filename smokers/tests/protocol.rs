// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

// Whole-table tests.  Each run is done under a watchdog, so that a deadlock shows up as a failed
// test instead of a hung test binary.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use rand::Rng;
use rand_pcg::Pcg32;

use smokers::{
    check_events, run_agent, spawn_smoker, spawn_updater, AgentSession, Event, Pair, RandomPairs,
    Report, ResourceKind, ScriptedPairs, Table,
};
use smokers::sync::Arc;

const WATCHDOG: Duration = Duration::from_secs(60);

/// Run `body` on its own thread, failing the test if it doesn't finish in time.
fn with_watchdog<T, F>(body: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(body());
    });
    match rx.recv_timeout(WATCHDOG) {
        Ok(value) => value,
        Err(RecvTimeoutError::Timeout) => panic!("table deadlocked"),
        Err(RecvTimeoutError::Disconnected) => panic!("table run panicked"),
    }
}

/// Start a traced table, run `iterations` rounds from `source`, and return the report and the
/// event log.
fn traced_run<S>(iterations: usize, mut source: S) -> (Report, Vec<Event>)
where
    S: smokers::PairSource + Send + 'static,
{
    with_watchdog(move || {
        let session = Arc::new(AgentSession::with_trace());
        let mut table = Table::start(session.clone()).unwrap();
        table.run(iterations, &mut source).unwrap();
        let report = table.shutdown().unwrap();
        (report, session.events().unwrap())
    })
}

/// Every offer is followed by exactly one smoke, by the smoker that needs that pair.
fn assert_alternates(events: &[Event], iterations: usize) {
    assert_eq!(events.len(), 2 * iterations);
    check_events(events).unwrap();
}

#[test]
fn forced_sequence_feeds_each_smoker_once() {
    let script = vec![Pair::MatchesPaper, Pair::MatchesTobacco, Pair::PaperTobacco];
    let (report, events) = traced_run(3, ScriptedPairs::new(script));

    report.check().unwrap();
    for kind in ResourceKind::ALL {
        assert_eq!(report.counters.smoke_count(kind), 1);
        assert_eq!(report.counters.signal_count(kind), 1);
    }
    assert_eq!(report.counters.total_smokes(), 3);
    assert_eq!(
        events,
        [
            Event::Offered(Pair::MatchesPaper),
            Event::Smoked(ResourceKind::Tobacco),
            Event::Offered(Pair::MatchesTobacco),
            Event::Smoked(ResourceKind::Paper),
            Event::Offered(Pair::PaperTobacco),
            Event::Smoked(ResourceKind::Matches),
        ]
    );
}

#[test]
fn the_same_pair_over_and_over() {
    for pair in Pair::ALL {
        let (report, events) = traced_run(50, ScriptedPairs::new(vec![pair]));
        report.check().unwrap();
        assert_eq!(report.counters.smoke_count(pair.smoker()), 50);
        assert_alternates(&events, 50);
    }
}

#[test]
fn random_runs_balance_across_seeds() {
    let mut seeds = Pcg32::new(1, 1);
    for _ in 0..16 {
        let seed: u64 = seeds.gen();
        let (report, events) = traced_run(500, RandomPairs::seeded(seed));
        if let Err(err) = report.check() {
            panic!("seed {}: {}", seed, err);
        }
        assert_alternates(&events, 500);
    }
}

#[test]
fn entropy_run_balances() {
    let (report, events) = traced_run(500, RandomPairs::from_entropy());
    report.check().unwrap();
    assert_eq!(report.iterations, 500);
    assert_alternates(&events, 500);
}

#[test]
fn zero_iterations_leave_everything_at_zero() {
    let (report, events) = traced_run(0, RandomPairs::seeded(3));
    report.check().unwrap();
    assert_eq!(report.counters.total_signals(), 0);
    assert_eq!(report.counters.total_smokes(), 0);
    assert!(events.is_empty());
}

// Drive the session the way a bare harness would: spawn the workers by hand, join the agent,
// read the counters, then tear down.
#[test]
fn hand_built_harness() {
    with_watchdog(|| {
        let session = Arc::new(AgentSession::new());
        let mut workers = Vec::new();
        for kind in ResourceKind::ALL {
            workers.push(spawn_updater(&session, kind).unwrap());
            workers.push(spawn_smoker(&session, kind).unwrap());
        }

        let agent_session = session.clone();
        let agent = thread::spawn(move || {
            run_agent(&agent_session, 200, &mut RandomPairs::seeded(99))
        });
        agent.join().unwrap().unwrap();

        let mut total = 0;
        for kind in ResourceKind::ALL {
            let smoked = session.smoke_count(kind).unwrap();
            assert_eq!(session.signal_count(kind).unwrap(), smoked);
            total += smoked;
        }
        assert_eq!(total, 200);
        assert_eq!(session.violations().unwrap(), 0);

        session.shutdown().unwrap();
        for worker in workers {
            worker.join().unwrap();
        }
    });
}

// The workers may not have reached their first wait when the agent starts.  Starting the agent
// first, and the workers only later, must still work.
#[test]
fn agent_before_workers() {
    with_watchdog(|| {
        let session = Arc::new(AgentSession::new());
        let agent_session = session.clone();
        let agent = thread::spawn(move || {
            run_agent(&agent_session, 20, &mut RandomPairs::seeded(5))
        });

        // Give the agent time to announce and block.
        thread::sleep(Duration::from_millis(50));
        let table = Table::start(session.clone()).unwrap();
        agent.join().unwrap().unwrap();

        let report = table.shutdown().unwrap();
        assert_eq!(report.counters.total_smokes(), 20);
        assert_eq!(report.counters.total_signals(), 20);
        assert_eq!(report.violations, 0);
    });
}

#[test]
fn shutdown_releases_a_waiting_agent() {
    with_watchdog(|| {
        // Nobody will ever smoke: only the agent runs.
        let session = Arc::new(AgentSession::new());
        let agent_session = session.clone();
        let agent = thread::spawn(move || {
            run_agent(&agent_session, 1, &mut RandomPairs::seeded(1))
        });
        thread::sleep(Duration::from_millis(20));
        session.shutdown().unwrap();
        assert!(matches!(agent.join().unwrap(), Err(smokers::Error::Closed)));
    });
}
