//! Online test generation sessions.
//!
//! A [`Session`] drives the generation loop: search the best path from the
//! current state, execute a prefix of it on the system under test, mark the
//! executed steps covered and continue from where the prefix ended, until
//! no path within the search depth increases coverage.

use crate::cover::Coverer;
use crate::data::{Advance, GenerationConfig, Randomness};
use crate::error::{FmbtError, Result};
use crate::model::Walkable;
use crate::state::State;
use crate::step::Step;
use tracing::{debug, info};

/// Summary of a session so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Steps executed and marked covered.
    pub steps_executed: usize,
    /// Number of searches whose steps were executed.
    pub rounds: usize,
    /// Unique covered items.
    pub coverage: usize,
    /// True if the session ended because no path increased coverage,
    /// false if it has not ended or was stopped by the step limit.
    pub exhausted: bool,
}

/// A test generation session over a model.
pub struct Session<'m, S, W: ?Sized> {
    model: &'m W,
    coverer: Coverer<S>,
    state: S,
    config: GenerationConfig,
    steps_executed: usize,
    rounds: usize,
    exhausted: bool,
}

impl<'m, S, W> Session<'m, S, W>
where
    S: State + 'static,
    W: Walkable<S> + ?Sized,
{
    /// Start a session from `initial_state`. The coverer defines what is
    /// covered; its random source is seeded from `config` when the config
    /// asks for randomness.
    pub fn new(
        model: &'m W,
        mut coverer: Coverer<S>,
        initial_state: S,
        config: GenerationConfig,
    ) -> Result<Self> {
        config.validate()?;
        if config.randomness != Randomness::None {
            coverer.set_random(config.seed, config.randomness);
        }
        Ok(Session {
            model,
            coverer,
            state: initial_state,
            config,
            steps_executed: 0,
            rounds: 0,
            exhausted: false,
        })
    }

    /// The state the next steps start from.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The coverer of the session.
    pub fn coverer(&self) -> &Coverer<S> {
        &self.coverer
    }

    /// The configuration of the session.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Consume the session into its coverer.
    pub fn into_coverer(self) -> Coverer<S> {
        self.coverer
    }

    fn remaining_steps(&self) -> Option<usize> {
        self.config
            .step_limit
            .map(|limit| limit.saturating_sub(self.steps_executed))
    }

    /// Search the steps to execute next. `None` means that the session is
    /// over: either no path increases coverage or the step limit is used.
    pub fn next_steps(&mut self) -> Option<Vec<Step<S>>> {
        let remaining = self.remaining_steps();
        if remaining == Some(0) {
            return None;
        }
        let Some((path, stats)) =
            self.coverer
                .best_path(self.model, &self.state, self.config.max_depth)
        else {
            self.exhausted = true;
            return None;
        };
        let mut len = match self.config.advance {
            Advance::FirstIncrease => stats.first_step + 1,
            Advance::MaxIncrease => stats.max_step + 1,
        };
        if let Some(remaining) = remaining {
            len = len.min(remaining);
        }
        let mut steps = path.into_steps();
        steps.truncate(len);
        Some(steps)
    }

    /// Mark executed steps covered and continue from the end state of the
    /// last one.
    pub fn record(&mut self, steps: &[Step<S>]) {
        let Some(last) = steps.last() else {
            return;
        };
        self.state = last.end_state().clone();
        self.coverer.mark_covered(steps);
        self.coverer.update_coverage();
        self.steps_executed += steps.len();
        self.rounds += 1;
        debug!(
            round = self.rounds,
            steps = steps.len(),
            coverage = self.coverer.coverage(),
            state = %self.state.render(),
            "steps recorded"
        );
    }

    /// Run the session to the end, calling `execute` for every generated
    /// step in order.
    ///
    /// If `execute` fails, the steps of the round executed before the
    /// failing one are still recorded and the failure is returned.
    pub fn run<F>(&mut self, mut execute: F) -> Result<SessionReport>
    where
        F: FnMut(&Step<S>) -> std::result::Result<(), String>,
    {
        while let Some(steps) = self.next_steps() {
            for (i, step) in steps.iter().enumerate() {
                if let Err(reason) = execute(step) {
                    self.record(&steps[..i]);
                    return Err(FmbtError::StepFailed {
                        step: step.to_string(),
                        reason,
                    });
                }
            }
            self.record(&steps);
        }
        let report = self.report();
        info!(
            steps = report.steps_executed,
            rounds = report.rounds,
            coverage = report.coverage,
            exhausted = report.exhausted,
            "session finished"
        );
        Ok(report)
    }

    /// Summary of the session so far.
    pub fn report(&self) -> SessionReport {
        SessionReport {
            steps_executed: self.steps_executed,
            rounds: self.rounds,
            coverage: self.coverer.coverage(),
            exhausted: self.exhausted,
        }
    }
}
