// Copyright (c) 2024 Linaro LTD
// SPDX-License-Identifier: Apache-2.0

//! Resources, pairs of resources, and the matching predicate.
//!
//! There are three kinds of resource.  Each smoker holds an endless supply of one of them, and
//! needs the other two to smoke.  A smoker is named after the kind it holds, so the `Tobacco`
//! smoker is the one that needs matches and paper.

use core::fmt;

/// One of the three kinds of resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResourceKind {
    Matches = 0,
    Paper = 1,
    Tobacco = 2,
}

impl ResourceKind {
    /// Every kind, in index order.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Matches,
        ResourceKind::Paper,
        ResourceKind::Tobacco,
    ];

    /// Index of this kind into per-kind arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Matches => "matches",
            ResourceKind::Paper => "paper",
            ResourceKind::Tobacco => "tobacco",
        }
    }

    /// The pair that the smoker holding this kind needs.
    pub const fn needs(self) -> Pair {
        match self {
            ResourceKind::Matches => Pair::PaperTobacco,
            ResourceKind::Paper => Pair::MatchesTobacco,
            ResourceKind::Tobacco => Pair::MatchesPaper,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Two different kinds of resource, as put on the table by the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pair {
    MatchesPaper,
    MatchesTobacco,
    PaperTobacco,
}

impl Pair {
    /// The three choices the agent has.
    pub const ALL: [Pair; 3] = [Pair::MatchesPaper, Pair::MatchesTobacco, Pair::PaperTobacco];

    /// Build the pair out of two kinds, in either order.  Returns `None` if both are the same.
    pub fn of(a: ResourceKind, b: ResourceKind) -> Option<Pair> {
        use ResourceKind::*;
        match (a, b) {
            (Matches, Paper) | (Paper, Matches) => Some(Pair::MatchesPaper),
            (Matches, Tobacco) | (Tobacco, Matches) => Some(Pair::MatchesTobacco),
            (Paper, Tobacco) | (Tobacco, Paper) => Some(Pair::PaperTobacco),
            _ => None,
        }
    }

    pub const fn kinds(self) -> [ResourceKind; 2] {
        use ResourceKind::*;
        match self {
            Pair::MatchesPaper => [Matches, Paper],
            Pair::MatchesTobacco => [Matches, Tobacco],
            Pair::PaperTobacco => [Paper, Tobacco],
        }
    }

    pub fn contains(self, kind: ResourceKind) -> bool {
        self.kinds().contains(&kind)
    }

    /// The smoker that consumes this pair: the one holding the kind that isn't in it.
    pub const fn smoker(self) -> ResourceKind {
        match self {
            Pair::MatchesPaper => ResourceKind::Tobacco,
            Pair::MatchesTobacco => ResourceKind::Paper,
            Pair::PaperTobacco => ResourceKind::Matches,
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.kinds();
        write!(f, "{}+{}", a, b)
    }
}

/// Which resources are currently on the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Availability([bool; 3]);

impl Availability {
    pub fn is_available(&self, kind: ResourceKind) -> bool {
        self.0[kind.index()]
    }

    pub fn set(&mut self, kind: ResourceKind) {
        self.0[kind.index()] = true;
    }

    pub fn clear(&mut self, kind: ResourceKind) {
        self.0[kind.index()] = false;
    }

    /// How many kinds are on the table.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&a| a).count()
    }

    /// True when exactly the two kinds of `pair` are on the table.
    pub fn holds(&self, pair: Pair) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|&kind| self.is_available(kind) == pair.contains(kind))
    }

    /// The matching predicate.
    ///
    /// Returns the one smoker whose pair is complete.  This only ever names a smoker when exactly
    /// two kinds are available; with fewer nothing is complete, and with all three every smoker
    /// would match, which a single agent can never cause.
    pub fn matching_smoker(&self) -> Option<ResourceKind> {
        let [matches, paper, tobacco] = self.0;
        match (matches, paper, tobacco) {
            (true, true, false) => Some(ResourceKind::Tobacco),
            (true, false, true) => Some(ResourceKind::Paper),
            (false, true, true) => Some(ResourceKind::Matches),
            _ => None,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        f.write_str("[")?;
        for kind in ResourceKind::ALL {
            if self.is_available(kind) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(kind.name())?;
                first = false;
            }
        }
        f.write_str("]")
    }
}

/// The accounting kept by the table.
///
/// `signal` counts how often the agent meant to feed each smoker, `smoke` how often each smoker
/// actually smoked.  After a correct run the two are equal for every kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    signal: [u64; 3],
    smoke: [u64; 3],
}

impl Counters {
    pub fn record_signal(&mut self, kind: ResourceKind) {
        self.signal[kind.index()] += 1;
    }

    pub fn record_smoke(&mut self, kind: ResourceKind) {
        self.smoke[kind.index()] += 1;
    }

    pub fn signal_count(&self, kind: ResourceKind) -> u64 {
        self.signal[kind.index()]
    }

    pub fn smoke_count(&self, kind: ResourceKind) -> u64 {
        self.smoke[kind.index()]
    }

    pub fn total_signals(&self) -> u64 {
        self.signal.iter().sum()
    }

    pub fn total_smokes(&self) -> u64 {
        self.smoke.iter().sum()
    }
}
