//! Coverage accounting and coverage-guided path search.
//!
//! A [`Coverer`] combines what counts as covered, how much of it the steps
//! executed so far have covered, and which path from the current state
//! would increase coverage the most.
//!
//! What counts as covered is given by coverage functions. A coverage
//! function maps a path to coverage items (strings). Several criteria can
//! be registered at once and their items are counted together. For
//! instance, covering actions and states prefers paths with new actions and
//! new states, while covering state-action pairs requires testing every
//! action in every state.
//!
//! Typical generation loop:
//!
//! ```rust
//! use fmbt_core::*;
//!
//! let mut model = Model::new();
//! model.register(|n: &u32| {
//!     when(*n < 2, [on_action("inc").to_state(n + 1)])
//! });
//!
//! let mut coverer = Coverer::new();
//! coverer.cover_state_actions();
//! let mut state = 0u32;
//! while let Some((path, stats)) = coverer.best_path(&model, &state, 3) {
//!     let executed = &path[..=stats.first_step];
//!     coverer.mark_covered(executed);
//!     coverer.update_coverage();
//!     state = *executed[executed.len() - 1].end_state();
//! }
//! assert_eq!(coverer.coverage(), 2);
//! ```

use crate::data::Randomness;
use crate::error::{FmbtError, Result};
use crate::model::Walkable;
use crate::state::State;
use crate::step::{Path, Step};
use crate::walk::Walker;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::ops::ControlFlow;
use tracing::{debug, trace};

/// Joins the parts of combination items and state-action items. Rendered
/// names and states are assumed not to contain it.
pub const ITEM_SEPARATOR: &str = "\x00";

/// A function returning the coverage items of a path.
pub type CoverageFn<S> = Box<dyn Fn(&[Step<S>]) -> Vec<String>>;

/// Action names of the steps of a path.
pub fn action_names<S>(path: &[Step<S>]) -> Vec<String> {
    path.iter()
        .map(|step| step.action().name().to_string())
        .collect()
}

/// Action formats of the steps of a path.
pub fn action_formats<S>(path: &[Step<S>]) -> Vec<String> {
    path.iter()
        .map(|step| step.action().format().to_string())
        .collect()
}

/// Renderings of the states a path visits: its start state and the end
/// state of every step. Empty for the empty path.
pub fn state_strings<S: State>(path: &[Step<S>]) -> Vec<String> {
    let Some(first) = path.first() else {
        return Vec::new();
    };
    std::iter::once(first.start_state().render())
        .chain(path.iter().map(|step| step.end_state().render()))
        .collect()
}

/// Start state and action of every step of a path.
pub fn state_action_strings<S: State>(path: &[Step<S>]) -> Vec<String> {
    path.iter()
        .map(|step| {
            format!(
                "{}{}{}",
                step.start_state().render(),
                ITEM_SEPARATOR,
                step.action().name()
            )
        })
        .collect()
}

/// Items of every run of 1 to `max_len` consecutive steps, each item
/// joining the items `items` returns for the run.
fn combinations<S>(
    path: &[Step<S>],
    max_len: usize,
    items: fn(&[Step<S>]) -> Vec<String>,
) -> Vec<String> {
    let mut combs = Vec::new();
    for len in 1..=max_len.min(path.len()) {
        for run in path.windows(len) {
            combs.push(items(run).join(ITEM_SEPARATOR));
        }
    }
    combs
}

/// Built-in coverage criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Every action name.
    Actions,
    /// Every action format, grouping actions that differ only by arguments.
    ActionFormats,
    /// Every sequence of 1 to n consecutive action names.
    ActionCombinations(usize),
    /// Every sequence of 1 to n consecutive action formats.
    ActionFormatCombinations(usize),
    /// Every state.
    States,
    /// The states spanned by every run of 1 to n consecutive steps.
    StateCombinations(usize),
    /// Every action in every state.
    StateActions,
}

impl Criterion {
    /// Number of already covered steps that must precede a new path when
    /// estimating its coverage, so that items spanning both are counted.
    pub fn history_window(&self) -> usize {
        match *self {
            Criterion::ActionCombinations(n)
            | Criterion::ActionFormatCombinations(n)
            | Criterion::StateCombinations(n) => n,
            _ => 0,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Criterion::ActionCombinations(0)
            | Criterion::ActionFormatCombinations(0)
            | Criterion::StateCombinations(0) => Err(FmbtError::invalid_config(format!(
                "combination length of {self:?} must be at least 1"
            ))),
            _ => Ok(()),
        }
    }

    fn coverage_fn<S: State + 'static>(self) -> CoverageFn<S> {
        match self {
            Criterion::Actions => Box::new(action_names::<S>),
            Criterion::ActionFormats => Box::new(action_formats::<S>),
            Criterion::ActionCombinations(n) => {
                Box::new(move |path: &[Step<S>]| combinations(path, n, action_names))
            }
            Criterion::ActionFormatCombinations(n) => {
                Box::new(move |path: &[Step<S>]| combinations(path, n, action_formats))
            }
            Criterion::States => Box::new(state_strings::<S>),
            Criterion::StateCombinations(n) => {
                Box::new(move |path: &[Step<S>]| combinations(path, n, state_strings))
            }
            Criterion::StateActions => Box::new(state_action_strings::<S>),
        }
    }
}

/// Estimated coverage increase of extending the covered path with a
/// candidate path. Step indices are 0-based positions in the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageStats {
    /// Step after which the maximal increase has been reached.
    pub max_step: usize,
    /// Number of new items the whole candidate covers.
    pub max_increase: usize,
    /// First step after which coverage has increased.
    pub first_step: usize,
    /// Number of new items covered by `first_step`.
    pub first_increase: usize,
}

/// Tracks covered items and finds paths that increase coverage.
pub struct Coverer<S> {
    covered_path: Vec<Step<S>>,
    cover_count: HashMap<String, usize>,
    coverage_fns: Vec<CoverageFn<S>>,
    history_window: usize,
    rng: Option<Box<dyn RngCore>>,
    randomness: Randomness,
}

impl<S: State + 'static> Coverer<S> {
    /// Create a coverer that covers nothing yet.
    pub fn new() -> Self {
        Coverer {
            covered_path: Vec::new(),
            cover_count: HashMap::new(),
            coverage_fns: Vec::new(),
            history_window: 0,
            rng: None,
            randomness: Randomness::None,
        }
    }

    /// Start counting items of a built-in criterion.
    pub fn cover(&mut self, criterion: Criterion) -> Result<&mut Self> {
        criterion.validate()?;
        self.history_window = self.history_window.max(criterion.history_window());
        self.coverage_fns.push(criterion.coverage_fn());
        Ok(self)
    }

    /// Start counting covered action names.
    pub fn cover_actions(&mut self) -> &mut Self {
        self.push_fn(Box::new(action_names::<S>))
    }

    /// Start counting covered action formats.
    pub fn cover_action_formats(&mut self) -> &mut Self {
        self.push_fn(Box::new(action_formats::<S>))
    }

    /// Start counting covered states.
    pub fn cover_states(&mut self) -> &mut Self {
        self.push_fn(Box::new(state_strings::<S>))
    }

    /// Start counting covered state-action pairs.
    pub fn cover_state_actions(&mut self) -> &mut Self {
        self.push_fn(Box::new(state_action_strings::<S>))
    }

    /// Start counting action name sequences of length up to `max_len`.
    pub fn cover_action_combinations(&mut self, max_len: usize) -> Result<&mut Self> {
        self.cover(Criterion::ActionCombinations(max_len))
    }

    /// Start counting action format sequences of length up to `max_len`.
    pub fn cover_action_format_combinations(&mut self, max_len: usize) -> Result<&mut Self> {
        self.cover(Criterion::ActionFormatCombinations(max_len))
    }

    /// Start counting state sequences spanned by up to `max_len` steps.
    pub fn cover_state_combinations(&mut self, max_len: usize) -> Result<&mut Self> {
        self.cover(Criterion::StateCombinations(max_len))
    }

    /// Start counting the items of a custom coverage function.
    pub fn cover_with<F>(&mut self, coverage_fn: F) -> &mut Self
    where
        F: Fn(&[Step<S>]) -> Vec<String> + 'static,
    {
        self.push_fn(Box::new(coverage_fn))
    }

    /// Like [`Coverer::cover_with`] for functions whose items span up to
    /// `history_window` consecutive steps.
    pub fn cover_with_history<F>(&mut self, history_window: usize, coverage_fn: F) -> &mut Self
    where
        F: Fn(&[Step<S>]) -> Vec<String> + 'static,
    {
        self.history_window = self.history_window.max(history_window);
        self.push_fn(Box::new(coverage_fn))
    }

    fn push_fn(&mut self, coverage_fn: CoverageFn<S>) -> &mut Self {
        self.coverage_fns.push(coverage_fn);
        self
    }

    /// Number of covered steps re-included when estimating a candidate.
    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Items covered by `path` according to all registered criteria.
    /// Items may repeat.
    pub fn covered_in(&self, path: &[Step<S>]) -> Vec<String> {
        self.coverage_fns
            .iter()
            .flat_map(|coverage_fn| coverage_fn(path))
            .collect()
    }

    /// Append steps to the covered path. Coverage is not recomputed until
    /// [`Coverer::update_coverage`] is called.
    pub fn mark_covered(&mut self, steps: &[Step<S>]) {
        self.covered_path.extend_from_slice(steps);
    }

    /// Recompute covered items from the whole covered path.
    ///
    /// This is a full recount, so mark a batch of steps covered before
    /// calling it.
    pub fn update_coverage(&mut self) {
        let mut cover_count = HashMap::new();
        for item in self.covered_in(&self.covered_path) {
            *cover_count.entry(item).or_insert(0) += 1;
        }
        self.cover_count = cover_count;
        trace!(
            covered_steps = self.covered_path.len(),
            coverage = self.cover_count.len(),
            "coverage updated"
        );
    }

    /// Number of unique covered items.
    pub fn coverage(&self) -> usize {
        self.cover_count.len()
    }

    /// Unique covered items.
    pub fn covered_items(&self) -> BTreeSet<String> {
        self.cover_count.keys().cloned().collect()
    }

    /// How many times `item` occurs in the covered path.
    pub fn cover_count(&self, item: &str) -> usize {
        self.cover_count.get(item).copied().unwrap_or(0)
    }

    /// Steps marked covered so far.
    pub fn covered_path(&self) -> &[Step<S>] {
        &self.covered_path
    }

    /// Seed the random source and set the randomness level of
    /// [`Coverer::best_path`].
    pub fn set_random(&mut self, seed: u64, randomness: Randomness) {
        self.set_rng(ChaCha8Rng::seed_from_u64(seed), randomness);
    }

    /// Use `rng` as the random source with the given randomness level.
    pub fn set_rng<R>(&mut self, rng: R, randomness: Randomness)
    where
        R: RngCore + 'static,
    {
        self.rng = Some(Box::new(rng));
        self.randomness = randomness;
    }

    /// Current randomness level.
    pub fn randomness(&self) -> Randomness {
        self.randomness
    }

    /// Shuffle `paths` with the random source. Without a random source
    /// the order is kept.
    pub fn shuffle_paths(&mut self, paths: &mut [Path<S>]) {
        if let Some(rng) = self.rng.as_mut() {
            paths.shuffle(&mut **rng);
        }
    }

    /// Estimate how much appending `path` to the covered path would
    /// increase coverage. Returns `None` if it would not.
    ///
    /// `max_step` is the first step after which at least `max_increase`
    /// new items have been seen. For coverage functions whose items of a
    /// prefix are not a subset of the items of the whole path, the
    /// prefix counts may exceed `max_increase`.
    pub fn estimate_increase(&self, path: &[Step<S>]) -> Option<CoverageStats> {
        if path.is_empty() {
            return None;
        }
        let history = self.history_window.min(self.covered_path.len());
        let windowed: Cow<'_, [Step<S>]> = if history == 0 {
            Cow::Borrowed(path)
        } else {
            let mut steps = self.covered_path[self.covered_path.len() - history..].to_vec();
            steps.extend_from_slice(path);
            Cow::Owned(steps)
        };

        let is_new = |item: &String| !self.cover_count.contains_key(item);
        let max_increase = self
            .covered_in(&windowed)
            .into_iter()
            .filter(is_new)
            .collect::<HashSet<_>>()
            .len();
        if max_increase == 0 {
            return None;
        }

        let mut new_items = HashSet::new();
        let mut first = None;
        for end in history..windowed.len() {
            new_items.extend(self.covered_in(&windowed[..=end]).into_iter().filter(is_new));
            if first.is_none() && !new_items.is_empty() {
                first = Some((end - history, new_items.len()));
            }
            if let Some((first_step, first_increase)) = first {
                // custom functions may give a prefix items the whole
                // candidate does not have
                if new_items.len() >= max_increase {
                    return Some(CoverageStats {
                        max_step: end - history,
                        max_increase,
                        first_step,
                        first_increase,
                    });
                }
            }
        }
        None
    }

    /// The path of at most `max_depth` steps from `state` that increases
    /// coverage the most, with its statistics. `None` means that no such
    /// path increases coverage.
    pub fn best_path<W>(
        &mut self,
        model: &W,
        state: &S,
        max_depth: usize,
    ) -> Option<(Path<S>, CoverageStats)>
    where
        W: Walkable<S> + ?Sized,
    {
        self.best_path_with(&Walker::new(model), state, max_depth)
    }

    /// Like [`Coverer::best_path`], walking candidates with `walker` so its
    /// step filter applies to the search.
    ///
    /// Candidates are ranked by, in order: larger maximal increase, fewer
    /// steps to the maximal increase, fewer steps to the first increase,
    /// larger first increase. The randomness level makes the ranking stop
    /// early and shuffles the candidates first.
    pub fn best_path_with<W>(
        &mut self,
        walker: &Walker<'_, S, W>,
        state: &S,
        max_depth: usize,
    ) -> Option<(Path<S>, CoverageStats)>
    where
        W: Walkable<S> + ?Sized,
    {
        let mut best = None;
        let mut candidates = 0usize;

        if self.randomness != Randomness::None && self.rng.is_some() {
            let mut paths = walker.paths(state, max_depth);
            self.shuffle_paths(&mut paths);
            for path in &paths {
                candidates += 1;
                if self.rank_candidate(&mut best, path).is_break() {
                    break;
                }
            }
        } else {
            walker.visit_paths(state, max_depth, |view| {
                candidates += 1;
                self.rank_candidate(&mut best, view)
            });
        }

        match &best {
            Some((path, stats)) => debug!(
                candidates,
                randomness = %self.randomness,
                path_len = path.len(),
                max_increase = stats.max_increase,
                max_step = stats.max_step,
                first_step = stats.first_step,
                first_increase = stats.first_increase,
                "best path found"
            ),
            None => debug!(
                candidates,
                max_depth, "no path increases coverage"
            ),
        }
        best
    }

    fn rank_candidate(
        &self,
        best: &mut Option<(Path<S>, CoverageStats)>,
        candidate: &[Step<S>],
    ) -> ControlFlow<()> {
        let Some(stats) = self.estimate_increase(candidate) else {
            return ControlFlow::Continue(());
        };
        let better = match best {
            None => true,
            Some((_, best_stats)) => self.outranks(&stats, best_stats),
        };
        if better {
            *best = Some((Path::from_steps_unchecked(candidate.to_vec()), stats));
        }
        if self.randomness >= Randomness::AmongAnyPath {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// True if `candidate` should replace `best`. Ties keep `best`.
    fn outranks(&self, candidate: &CoverageStats, best: &CoverageStats) -> bool {
        let increase = candidate.max_increase.cmp(&best.max_increase);
        if increase != Ordering::Equal || self.randomness >= Randomness::AmongMaxIncrease {
            return increase == Ordering::Greater;
        }
        let to_max = best.max_step.cmp(&candidate.max_step);
        if to_max != Ordering::Equal || self.randomness >= Randomness::AmongFastestMaxIncrease {
            return to_max == Ordering::Greater;
        }
        let to_first = best
            .first_step
            .cmp(&candidate.first_step)
            .then(candidate.first_increase.cmp(&best.first_increase));
        to_first == Ordering::Greater
    }
}

impl<S: State + 'static> Default for Coverer<S> {
    fn default() -> Self {
        Coverer::new()
    }
}

impl<S> fmt::Debug for Coverer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coverer")
            .field("covered_steps", &self.covered_path.len())
            .field("coverage", &self.cover_count.len())
            .field("criteria", &self.coverage_fns.len())
            .field("history_window", &self.history_window)
            .field("randomness", &self.randomness)
            .finish()
    }
}
