//! Steps and paths through a model.

use crate::action::Action;
use crate::error::{FmbtError, Result};
use crate::state::State;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// One executed transition: a start state, an action and an end state.
pub struct Step<S> {
    start: S,
    action: Rc<Action>,
    end: S,
}

impl<S> Step<S> {
    /// Create a new step.
    pub fn new(start: S, action: Action, end: S) -> Self {
        Step {
            start,
            action: Rc::new(action),
            end,
        }
    }

    pub(crate) fn with_shared_action(start: S, action: Rc<Action>, end: S) -> Self {
        Step { start, action, end }
    }

    /// The state the step starts from.
    pub fn start_state(&self) -> &S {
        &self.start
    }

    /// The action taken in the step.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The state the step ends in.
    pub fn end_state(&self) -> &S {
        &self.end
    }
}

impl<S: Clone> Clone for Step<S> {
    fn clone(&self) -> Self {
        Step {
            start: self.start.clone(),
            action: Rc::clone(&self.action),
            end: self.end.clone(),
        }
    }
}

impl<S: State> fmt::Display for Step<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}--{}->{}]",
            self.start.render(),
            self.action,
            self.end.render()
        )
    }
}

impl<S: State> fmt::Debug for Step<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Check that every step of `steps` starts from the state the previous
/// step ended in.
pub fn validate_chain<S: State>(steps: &[Step<S>]) -> Result<()> {
    for (i, pair) in steps.windows(2).enumerate() {
        let end = pair[0].end.render();
        let start = pair[1].start.render();
        if end != start {
            return Err(FmbtError::BrokenPath {
                index: i + 1,
                end,
                start,
            });
        }
    }
    Ok(())
}

/// A sequence of steps where each step starts from the end state of the
/// previous one. The empty path is valid.
pub struct Path<S> {
    steps: Vec<Step<S>>,
}

impl<S> Path<S> {
    /// The empty path.
    pub fn empty() -> Self {
        Path { steps: Vec::new() }
    }

    /// Steps of the path.
    pub fn steps(&self) -> &[Step<S>] {
        &self.steps
    }

    /// Consume the path into its steps.
    pub fn into_steps(self) -> Vec<Step<S>> {
        self.steps
    }

    /// The state the path starts from, unless the path is empty.
    pub fn start_state(&self) -> Option<&S> {
        self.steps.first().map(Step::start_state)
    }

    /// The state the path ends in, unless the path is empty.
    pub fn end_state(&self) -> Option<&S> {
        self.steps.last().map(Step::end_state)
    }

    pub(crate) fn from_steps_unchecked(steps: Vec<Step<S>>) -> Self {
        Path { steps }
    }
}

impl<S: State> Path<S> {
    /// Create a path from steps.
    ///
    /// Chaining is the caller's responsibility. It is verified only in
    /// debug builds; use [`Path::try_new`] to always verify it.
    pub fn new(steps: Vec<Step<S>>) -> Self {
        debug_assert!(
            validate_chain(&steps).is_ok(),
            "steps of a path must chain: {:?}",
            validate_chain(&steps)
        );
        Path { steps }
    }

    /// Create a path from steps, failing if they do not chain.
    pub fn try_new(steps: Vec<Step<S>>) -> Result<Self> {
        validate_chain(&steps)?;
        Ok(Path { steps })
    }

    /// Verify that the steps of the path chain.
    pub fn validate(&self) -> Result<()> {
        validate_chain(&self.steps)
    }

    /// A copy of the first `len` steps of the path.
    pub fn prefix(&self, len: usize) -> Path<S> {
        let len = len.min(self.steps.len());
        Path {
            steps: self.steps[..len].to_vec(),
        }
    }
}

impl<S> Default for Path<S> {
    fn default() -> Self {
        Path::empty()
    }
}

impl<S: Clone> Clone for Path<S> {
    fn clone(&self) -> Self {
        Path {
            steps: self.steps.clone(),
        }
    }
}

impl<S> Deref for Path<S> {
    type Target = [Step<S>];

    fn deref(&self) -> &Self::Target {
        &self.steps
    }
}

impl<S> IntoIterator for Path<S> {
    type Item = Step<S>;
    type IntoIter = std::vec::IntoIter<Step<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a Path<S> {
    type Item = &'a Step<S>;
    type IntoIter = std::slice::Iter<'a, Step<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl<S: State> fmt::Display for Path<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl<S: State> fmt::Debug for Path<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.steps.iter()).finish()
    }
}
