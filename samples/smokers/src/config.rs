// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Config handling.
//!
//! The sample reads an optional yaml file describing the run.  Every field has a default, so an
//! empty file (or no file at all) runs 500 random rounds, logging at `info`.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use smokers::{Pair, PairSource, RandomPairs, ScriptedPairs};

/// The description of one run.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How many rounds the agent runs.
    pub iterations: usize,
    /// Seed for the random choices.  When absent, the operating system provides one.
    pub seed: Option<u64>,
    /// Name of a `log` level filter.
    pub log_level: String,
    /// Record the event log, and check it after the run.
    pub trace: bool,
    /// A fixed sequence of pairs.  When not empty, this is used instead of random choices.
    pub script: Vec<PairName>,
}

/// The names of the pairs, as written in the config file.
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum PairName {
    #[serde(rename = "matches+paper")]
    MatchesPaper,
    #[serde(rename = "matches+tobacco")]
    MatchesTobacco,
    #[serde(rename = "paper+tobacco")]
    PaperTobacco,
}

impl From<PairName> for Pair {
    fn from(name: PairName) -> Pair {
        match name {
            PairName::MatchesPaper => Pair::MatchesPaper,
            PairName::MatchesTobacco => Pair::MatchesTobacco,
            PairName::PaperTobacco => Pair::PaperTobacco,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            iterations: 500,
            seed: None,
            log_level: "info".to_string(),
            trace: false,
            script: Vec::new(),
        }
    }
}

impl Config {
    /// Load the config from a yaml file.
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Config::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse the config from yaml text.
    pub fn parse(text: &str) -> Result<Config> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    pub fn level(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .with_context(|| format!("unknown log level {:?}", self.log_level))
    }

    /// Build the agent's pair source described by this config.
    pub fn source(&self) -> Box<dyn PairSource> {
        if !self.script.is_empty() {
            let script = self.script.iter().map(|&name| Pair::from(name)).collect();
            Box::new(ScriptedPairs::new(script))
        } else if let Some(seed) = self.seed {
            Box::new(RandomPairs::seeded(seed))
        } else {
            Box::new(RandomPairs::from_entropy())
        }
    }
}
