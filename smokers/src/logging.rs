// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Logging for the table.
//!
//! All of the logging in this crate goes through the [`log`] crate.  The protocol steps are logged
//! at `trace`, worker start and stop at `debug`, and run summaries at `info`.  With a few hundred
//! iterations per run, anything above `debug` scrolls by far too fast to be useful.
//!
//! Applications are free to install any `log` backend.  For programs that don't want to pull one
//! in, the `stderr-log` feature provides a small one, installed with [`set_logger`].  Without the
//! feature, [`set_logger`] does nothing, and messages are dropped.

use log::{LevelFilter, Log, SetLoggerError};

cfg_if::cfg_if! {
    if #[cfg(feature = "stderr-log")] {
        mod impl_stderr;
        pub use impl_stderr::set_logger;
    } else {
        /// No logging backend is available, provide an empty handler that does nothing.
        pub fn set_logger(_level: LevelFilter) -> Result<(), SetLoggerError> {
            Ok(())
        }
    }
}

// The logger can only be installed once per process.  Tests, and programs that run several
// tables, call `set_logger` more than once; only the level changes after the first install.
#[allow(dead_code)]
fn set_logger_internal(logger: &'static dyn Log, level: LevelFilter) -> Result<(), SetLoggerError> {
    let result = log::set_logger(logger);
    log::set_max_level(level);
    result
}
