// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Logging through stderr
//!
//! This module implements a log handler (for the [`log`] crate) that writes each message as a
//! single line to stderr, tagged with the name of the thread that logged it.  The worker threads
//! are named after their role (`updater-paper`, `smoker-tobacco`), which makes the interleaving of
//! the protocol readable.
//!
//! Filtering is global, through [`log::set_max_level`].

use std::io::Write;
use std::thread;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// A simple log handler, built around stderr.
struct StderrLogger;

impl Log for StderrLogger {
    // The max level does the filtering.
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    // The stderr lock is held for the whole line, so lines from different threads never mix.
    fn log(&self, record: &Record<'_>) {
        let current = thread::current();
        let name = current.name().unwrap_or("-");
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "{}:{}:{}: {}",
            record.level(),
            name,
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static STDERR_LOGGER: StderrLogger = StderrLogger;

/// Set the log handler to log messages to stderr, filtering at `level`.
///
/// A second call only adjusts the level, and reports the `SetLoggerError` from the first install.
pub fn set_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    super::set_logger_internal(&STDERR_LOGGER, level)
}
