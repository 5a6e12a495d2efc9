//! Bounded depth-first path enumeration.
//!
//! A [`Walker`] produces every path of at most `max_depth` steps from a
//! state. A path that reaches a dead end before `max_depth` is produced as
//! is, so paths may be shorter than the depth. The number of paths grows
//! exponentially with the depth: keep it small for models with many
//! actions per state.
//!
//! Paths can be consumed in three ways:
//!
//! - [`Walker::visit_paths`] hands out borrowed views of a single buffer
//!   that is reused for every path. A view must be copied to keep it.
//! - [`Walker::iter_paths`] streams owned paths one at a time.
//! - [`Walker::paths`] collects all paths.

use crate::model::Walkable;
use crate::state::State;
use crate::step::{Path, Step};
use std::ops::ControlFlow;

/// Filters or reorders the candidate steps at each depth of a walk. The
/// filter affects only the walk, not the model.
pub type StepFilter<S> = Box<dyn Fn(Vec<Step<S>>) -> Vec<Step<S>>>;

/// Enumerates paths of a walkable model.
pub struct Walker<'m, S, W: ?Sized> {
    model: &'m W,
    step_filter: Option<StepFilter<S>>,
}

impl<'m, S, W> Walker<'m, S, W>
where
    S: State,
    W: Walkable<S> + ?Sized,
{
    /// Create a walker over `model`.
    pub fn new(model: &'m W) -> Self {
        Walker {
            model,
            step_filter: None,
        }
    }

    /// Use `filter` on the steps available at every depth.
    pub fn with_step_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(Vec<Step<S>>) -> Vec<Step<S>> + 'static,
    {
        self.set_step_filter(filter);
        self
    }

    /// Replace the step filter.
    pub fn set_step_filter<F>(&mut self, filter: F)
    where
        F: Fn(Vec<Step<S>>) -> Vec<Step<S>> + 'static,
    {
        self.step_filter = Some(Box::new(filter));
    }

    /// The walked model.
    pub fn model(&self) -> &'m W {
        self.model
    }

    fn next_steps(&self, state: &S) -> Vec<Step<S>> {
        let steps = self.model.steps_from(state);
        match &self.step_filter {
            Some(filter) => filter(steps),
            None => steps,
        }
    }

    /// Call `visit` with every path of at most `max_depth` steps from
    /// `state`, depth first, in the order the model offers steps.
    ///
    /// The slice passed to `visit` is a view of a buffer that is
    /// overwritten by the next path. Returning `ControlFlow::Break` stops
    /// the walk and the break value is returned.
    pub fn visit_paths<B, F>(&self, state: &S, max_depth: usize, mut visit: F) -> Option<B>
    where
        F: FnMut(&[Step<S>]) -> ControlFlow<B>,
    {
        let mut buffer = Vec::with_capacity(max_depth);
        match self.visit_from(state, max_depth, &mut buffer, &mut visit) {
            ControlFlow::Break(value) => Some(value),
            ControlFlow::Continue(()) => None,
        }
    }

    fn visit_from<B, F>(
        &self,
        state: &S,
        max_depth: usize,
        buffer: &mut Vec<Step<S>>,
        visit: &mut F,
    ) -> ControlFlow<B>
    where
        F: FnMut(&[Step<S>]) -> ControlFlow<B>,
    {
        if buffer.len() == max_depth {
            return visit(buffer);
        }
        let next_steps = self.next_steps(state);
        if next_steps.is_empty() {
            return visit(buffer);
        }
        for step in next_steps {
            let end = step.end_state().clone();
            buffer.push(step);
            if let ControlFlow::Break(value) = self.visit_from(&end, max_depth, buffer, visit) {
                return ControlFlow::Break(value);
            }
            buffer.pop();
        }
        ControlFlow::Continue(())
    }

    /// Stream owned paths of at most `max_depth` steps from `state`, in
    /// the same order as [`Walker::visit_paths`].
    pub fn iter_paths(&self, state: &S, max_depth: usize) -> PathIter<'_, 'm, S, W> {
        PathIter {
            walker: self,
            root: Some(state.clone()),
            max_depth,
            frames: Vec::new(),
            path: Vec::with_capacity(max_depth),
        }
    }

    /// All paths of at most `max_depth` steps from `state`.
    pub fn paths(&self, state: &S, max_depth: usize) -> Vec<Path<S>> {
        let mut paths = Vec::new();
        self.visit_paths(state, max_depth, |view| {
            paths.push(Path::from_steps_unchecked(view.to_vec()));
            ControlFlow::<()>::Continue(())
        });
        paths
    }

    /// Number of paths of at most `max_depth` steps from `state`.
    pub fn count_paths(&self, state: &S, max_depth: usize) -> usize {
        let mut count = 0;
        self.visit_paths(state, max_depth, |_| {
            count += 1;
            ControlFlow::<()>::Continue(())
        });
        count
    }
}

/// Streaming iterator over owned paths, see [`Walker::iter_paths`].
pub struct PathIter<'w, 'm, S, W: ?Sized> {
    walker: &'w Walker<'m, S, W>,
    root: Option<S>,
    max_depth: usize,
    // frames[i] holds the untried alternatives for path[i]
    frames: Vec<std::vec::IntoIter<Step<S>>>,
    path: Vec<Step<S>>,
}

impl<'w, 'm, S, W> Iterator for PathIter<'w, 'm, S, W>
where
    S: State,
    W: Walkable<S> + ?Sized,
{
    type Item = Path<S>;

    fn next(&mut self) -> Option<Path<S>> {
        if let Some(root) = self.root.take() {
            if self.max_depth == 0 {
                return Some(Path::empty());
            }
            let steps = self.walker.next_steps(&root);
            if steps.is_empty() {
                return Some(Path::empty());
            }
            self.frames.push(steps.into_iter());
        }

        loop {
            let frame = self.frames.last_mut()?;
            match frame.next() {
                None => {
                    self.frames.pop();
                    self.path.pop();
                }
                Some(step) => {
                    let next_steps = if self.path.len() + 1 < self.max_depth {
                        self.walker.next_steps(step.end_state())
                    } else {
                        Vec::new()
                    };
                    self.path.push(step);
                    if next_steps.is_empty() {
                        let path = Path::from_steps_unchecked(self.path.clone());
                        self.path.pop();
                        return Some(path);
                    }
                    self.frames.push(next_steps.into_iter());
                }
            }
        }
    }
}
