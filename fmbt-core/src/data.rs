//! Configuration for test generation.

use crate::error::{FmbtError, Result};
use std::fmt;

/// How randomly `best_path` chooses among candidate paths.
///
/// Levels are ordered from least to most random. Each level makes the
/// search indifferent to one more ranking criterion, and candidates are
/// shuffled with a seeded generator before ranking so that the choice among
/// equally ranked paths is random but reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Randomness {
    /// Deterministic: the first of equally good paths in walk order wins.
    #[default]
    None,
    /// Random choice among paths that are equal in every criterion.
    AmongEquallyGood,
    /// Random choice among paths that reach the maximal increase in equally
    /// few steps.
    AmongFastestMaxIncrease,
    /// Random choice among paths with the maximal increase.
    AmongMaxIncrease,
    /// The first shuffled path that increases coverage at all.
    AmongAnyPath,
}

impl fmt::Display for Randomness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Randomness::None => "none",
            Randomness::AmongEquallyGood => "among-equally-good",
            Randomness::AmongFastestMaxIncrease => "among-fastest-max-increase",
            Randomness::AmongMaxIncrease => "among-max-increase",
            Randomness::AmongAnyPath => "among-any-path",
        };
        write!(f, "{name}")
    }
}

/// How much of a best path a session executes before searching again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Advance {
    /// Up to and including the first step that increases coverage.
    #[default]
    FirstIncrease,
    /// Up to and including the step where the path's maximal increase is
    /// reached.
    MaxIncrease,
}

/// Configuration for a test generation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Maximum number of steps in searched paths.
    pub max_depth: usize,

    /// Tie-breaking randomness of the path search.
    pub randomness: Randomness,

    /// Seed for the random source used when `randomness` is not `None`.
    pub seed: u64,

    /// Maximum number of steps to execute, unlimited if `None`.
    pub step_limit: Option<usize>,

    /// How much of each best path to execute.
    pub advance: Advance,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            max_depth: 6,
            randomness: Randomness::None,
            seed: 0,
            step_limit: None,
            advance: Advance::FirstIncrease,
        }
    }
}

impl GenerationConfig {
    /// Set the search depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the randomness level and its seed.
    pub fn with_randomness(mut self, randomness: Randomness, seed: u64) -> Self {
        self.randomness = randomness;
        self.seed = seed;
        self
    }

    /// Stop after executing `limit` steps.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Set how much of each best path to execute.
    pub fn with_advance(mut self, advance: Advance) -> Self {
        self.advance = advance;
        self
    }

    /// Check that the configuration can drive a session.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(FmbtError::invalid_config(
                "max_depth must be at least 1, no path of zero steps can increase coverage",
            ));
        }
        Ok(())
    }
}
