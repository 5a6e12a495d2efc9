//! Test models.
//!
//! A model specifies what can be tested (actions) and when (states and
//! transitions). Transitions are produced on demand by transition
//! generators registered to the model.

use crate::state::State;
use crate::step::{Path, Step};
use crate::transition::Transition;
use crate::walk::Walker;
use std::fmt;
use std::rc::Rc;

/// A transition generator returns the transitions that may be taken from
/// a state. Returned transitions may still turn out impossible when their
/// state change is applied.
pub type TransitionGen<S> = Box<dyn Fn(&S) -> Vec<Transition<S>> + Send + Sync>;

/// Models that can be explored step by step.
///
/// Paths can be built from repeated `steps_from` calls, but `paths` is part
/// of the trait so that an implementation may cache whole paths.
pub trait Walkable<S: State> {
    /// All alternative steps that start from `state`.
    fn steps_from(&self, state: &S) -> Vec<Step<S>>;

    /// All alternative paths of at most `max_depth` steps from `state`.
    fn paths(&self, state: &S, max_depth: usize) -> Vec<Path<S>> {
        Walker::new(self).paths(state, max_depth)
    }
}

/// A state space given by an ordered list of transition generators.
pub struct Model<S> {
    generators: Vec<TransitionGen<S>>,
}

impl<S: State> Model<S> {
    /// Create an empty model. Every state of an empty model is a dead end.
    pub fn new() -> Self {
        Model {
            generators: Vec::new(),
        }
    }

    /// Add a transition generator. Generators are consulted in the order
    /// they were registered.
    pub fn register<F>(&mut self, generator: F) -> &mut Self
    where
        F: Fn(&S) -> Vec<Transition<S>> + Send + Sync + 'static,
    {
        self.generators.push(Box::new(generator));
        self
    }

    /// Number of registered transition generators.
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// All transitions offered at `state` by all generators, in
    /// registration order. Duplicates are kept.
    pub fn transitions_from(&self, state: &S) -> Vec<Transition<S>> {
        self.generators
            .iter()
            .flat_map(|generator| generator(state))
            .collect()
    }
}

impl<S: State> Walkable<S> for Model<S> {
    fn steps_from(&self, state: &S) -> Vec<Step<S>> {
        self.transitions_from(state)
            .into_iter()
            .filter_map(|transition| {
                let end = transition.change(state)?;
                Some(Step::with_shared_action(
                    state.clone(),
                    Rc::clone(transition.shared_action()),
                    end,
                ))
            })
            .collect()
    }
}

impl<S: State> Default for Model<S> {
    fn default() -> Self {
        Model::new()
    }
}

impl<S> fmt::Debug for Model<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("generators", &self.generators.len())
            .finish()
    }
}
