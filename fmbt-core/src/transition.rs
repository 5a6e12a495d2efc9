//! Transitions and the `when`/`on_action` modelling sugar.

use crate::action::Action;
use std::fmt;
use std::rc::Rc;

/// A state change function.
///
/// Returns the state after the change, or `None` if the change is not
/// possible in the given state. A state change must not have side effects.
pub type StateChange<S> = Rc<dyn Fn(&S) -> Option<S>>;

/// An action paired with the state change it causes.
pub struct Transition<S> {
    action: Rc<Action>,
    change: StateChange<S>,
}

impl<S> Transition<S> {
    /// Create a new transition.
    pub fn new<F>(action: Action, change: F) -> Self
    where
        F: Fn(&S) -> Option<S> + 'static,
    {
        Transition {
            action: Rc::new(action),
            change: Rc::new(change),
        }
    }

    /// Create a transition from an already shared action and state change.
    pub fn from_parts(action: Rc<Action>, change: StateChange<S>) -> Self {
        Transition { action, change }
    }

    /// The action of the transition.
    pub fn action(&self) -> &Action {
        &self.action
    }

    pub(crate) fn shared_action(&self) -> &Rc<Action> {
        &self.action
    }

    /// Apply the state change. `None` means the transition is not
    /// possible in `state`.
    pub fn change(&self, state: &S) -> Option<S> {
        (self.change)(state)
    }
}

impl<S> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Transition {
            action: Rc::clone(&self.action),
            change: Rc::clone(&self.change),
        }
    }
}

impl<S> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("action", &self.action.name())
            .finish_non_exhaustive()
    }
}

/// Returns all transitions of `groups` if `enabled`, otherwise nothing.
///
/// Together with [`on_action`] and [`Action::apply`] this lets a transition
/// generator read like a guarded command list:
///
/// ```rust
/// use fmbt_core::{on_action, when, Transition};
///
/// let playing = false;
/// let transitions: Vec<Transition<bool>> = when(true, [
///     when(playing, [on_action("pause").to_state(false)]),
///     when(!playing, [on_action("play").to_state(true)]),
/// ]);
/// assert_eq!(transitions.len(), 1);
/// assert_eq!(transitions[0].action().name(), "play");
/// ```
pub fn when<S, I>(enabled: bool, groups: I) -> Vec<Transition<S>>
where
    I: IntoIterator<Item = Vec<Transition<S>>>,
{
    if !enabled {
        return Vec::new();
    }
    groups.into_iter().flatten().collect()
}

/// Start a transition description with a plain action.
pub fn on_action(name: impl Into<String>) -> Action {
    Action::new(name)
}

/// Start a transition description with a parameterized action.
pub fn on_action_with<I, A>(format: impl Into<String>, args: I) -> Action
where
    I: IntoIterator<Item = A>,
    A: fmt::Display,
{
    Action::with_args(format, args)
}

impl Action {
    /// A single transition taking this action with the given state change.
    pub fn apply<S, F>(self, change: F) -> Vec<Transition<S>>
    where
        F: Fn(&S) -> Option<S> + 'static,
    {
        vec![Transition::new(self, change)]
    }

    /// A single transition whose state change runs `changes` in order,
    /// feeding each the result of the previous one. The transition is not
    /// possible if any of the changes is not.
    pub fn apply_all<S>(self, changes: Vec<StateChange<S>>) -> Vec<Transition<S>>
    where
        S: Clone + 'static,
    {
        let change = move |start: &S| {
            changes
                .iter()
                .try_fold(start.clone(), |state, change| change(&state))
        };
        vec![Transition::new(self, change)]
    }

    /// A single transition taking this action into a fixed state.
    pub fn to_state<S>(self, end: S) -> Vec<Transition<S>>
    where
        S: Clone + 'static,
    {
        vec![Transition::new(self, move |_: &S| Some(end.clone()))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn increment() -> StateChange<u32> {
        Rc::new(|n: &u32| if *n < 3 { Some(n + 1) } else { None })
    }

    #[test]
    fn test_transition_change() {
        let t = Transition::new(Action::new("inc"), |n: &u32| Some(n + 1));
        assert_eq!(t.action().name(), "inc");
        assert_eq!(t.change(&1), Some(2));
    }

    #[test]
    fn test_inapplicable_transition() {
        let t = Transition::new(Action::new("dec"), |n: &u32| n.checked_sub(1));
        assert_eq!(t.change(&0), None);
    }

    #[test]
    fn test_when_filters_disabled_groups() {
        let ts: Vec<Transition<u32>> = when(
            true,
            [
                when(false, [on_action("never").to_state(0)]),
                on_action("reset").to_state(0),
                on_action_with("set({})", [7]).to_state(7),
            ],
        );
        let names: Vec<_> = ts.iter().map(|t| t.action().name().to_string()).collect();
        assert_eq!(names, vec!["reset", "set(7)"]);

        let none: Vec<Transition<u32>> = when(false, [on_action("reset").to_state(0)]);
        assert!(none.is_empty());
    }

    #[test]
    fn test_apply_all_composes_changes() {
        let ts = on_action("inc2").apply_all(vec![increment(), increment()]);
        assert_eq!(ts[0].change(&0), Some(2));
        // the second increment is not possible from 3
        assert_eq!(ts[0].change(&2), None);
    }

    #[test]
    fn test_clone_shares_action() {
        let t = Transition::new(Action::new("inc"), |n: &u32| Some(n + 1));
        let copy = t.clone();
        assert!(Rc::ptr_eq(t.shared_action(), copy.shared_action()));
        assert_eq!(format!("{copy:?}"), "Transition { action: \"inc\", .. }");
    }
}
