// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Where the agent gets its pairs from.
//!
//! The agent makes one choice per iteration, and it is made through the [`PairSource`] trait so
//! that a run can be random, reproducible from a seed, or forced to a given sequence.

use core::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::resource::Pair;

/// A supply of pairs for the agent to put on the table.
pub trait PairSource: fmt::Debug {
    /// The pair for the next iteration.
    fn next_pair(&mut self) -> Pair;
}

/// Uniformly random pairs.
#[derive(Debug, Clone)]
pub struct RandomPairs {
    rng: Pcg32,
}

impl RandomPairs {
    /// A source that will produce the same sequence for the same seed.
    pub fn seeded(seed: u64) -> RandomPairs {
        RandomPairs { rng: Pcg32::seed_from_u64(seed) }
    }

    /// A source seeded from the operating system.
    pub fn from_entropy() -> RandomPairs {
        RandomPairs { rng: Pcg32::from_entropy() }
    }
}

impl PairSource for RandomPairs {
    fn next_pair(&mut self) -> Pair {
        Pair::ALL[self.rng.gen_range(0..Pair::ALL.len())]
    }
}

/// Replays a fixed sequence of pairs, starting over once it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedPairs {
    script: Vec<Pair>,
    next: usize,
}

impl ScriptedPairs {
    /// # Panics
    ///
    /// If `script` is empty.
    pub fn new(script: Vec<Pair>) -> ScriptedPairs {
        assert!(!script.is_empty(), "ScriptedPairs needs at least one pair");
        ScriptedPairs { script, next: 0 }
    }
}

impl PairSource for ScriptedPairs {
    fn next_pair(&mut self) -> Pair {
        let pair = self.script[self.next];
        self.next = (self.next + 1) % self.script.len();
        pair
    }
}
