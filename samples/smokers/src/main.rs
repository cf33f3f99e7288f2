// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

// Run the cigarette smokers table once, and check that the counts balance.
//
// Usage: smokers-sample [iterations] [config.yaml]
//
// The iteration count on the command line overrides the one in the config file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;
use smokers::{check_events, AgentSession, Table};
use smokers::sync::Arc;

use crate::config::Config;

mod config;

fn main() -> Result<()> {
    let args = &mut std::env::args_os().skip(1);
    let iterations: Option<usize> = match args.next() {
        Some(arg) => {
            let text = arg.into_string().ok().context("iterations must be a number")?;
            Some(text.parse().with_context(|| format!("bad iteration count {:?}", text))?)
        }
        None => None,
    };
    let mut config = match args.next() {
        Some(path) => Config::load(&PathBuf::from(path))?,
        None => Config::default(),
    };
    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }

    smokers::set_logger(config.level()?)?;
    info!("config: {:?}", config);

    let session = if config.trace {
        AgentSession::with_trace()
    } else {
        AgentSession::new()
    };
    let session = Arc::new(session);

    let mut source = config.source();
    let mut table = Table::start(session.clone())?;
    table.run(config.iterations, source.as_mut())?;
    let report = table.shutdown()?;

    if config.trace {
        let events = session.events()?;
        if events.len() != 2 * config.iterations {
            bail!("{} events for {} iterations", events.len(), config.iterations);
        }
        check_events(&events)?;
    }

    report.check()?;
    println!("{}", report);
    Ok(())
}
