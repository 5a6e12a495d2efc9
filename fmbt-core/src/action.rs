//! Actions: named test stimuli.

use std::fmt;
use std::hash::{Hash, Hasher};

/// An action specifies what to execute on the system under test to cause
/// the state change of a transition.
///
/// An action may be parameterized: it keeps the format it was created from
/// and the rendered arguments, so coverage can either tell parameterized
/// actions apart (by name) or group them together (by format). The identity
/// of an action is its rendered name.
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    format: String,
    args: Vec<String>,
}

impl Action {
    /// Create an action without parameters. The format equals the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Action {
            format: name.clone(),
            name,
            args: Vec::new(),
        }
    }

    /// Create a parameterized action.
    ///
    /// Every `{}` in `format` is replaced by the `Display` rendering of the
    /// next argument. `{{` and `}}` produce literal braces. Placeholders
    /// without an argument are kept as is, surplus arguments are appended to
    /// the name separated by spaces so that they still distinguish actions.
    ///
    /// ```rust
    /// use fmbt_core::Action;
    ///
    /// let action = Action::with_args("addsong({})", [4]);
    /// assert_eq!(action.name(), "addsong(4)");
    /// assert_eq!(action.format(), "addsong({})");
    /// ```
    pub fn with_args<I, A>(format: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: fmt::Display,
    {
        let format = format.into();
        let args: Vec<String> = args.into_iter().map(|arg| arg.to_string()).collect();
        Action {
            name: render_format(&format, &args),
            format,
            args,
        }
    }

    /// The rendered name of the action.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The un-parameterized format of the action.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Rendered arguments of the action.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn render_format(format: &str, args: &[String]) -> String {
    let mut rendered = String::with_capacity(format.len());
    let mut next_arg = args.iter();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('{', Some('{')) | ('}', Some('}')) => {
                rendered.push(c);
                chars.next();
            }
            ('{', Some('}')) => {
                chars.next();
                match next_arg.next() {
                    Some(arg) => rendered.push_str(arg),
                    None => rendered.push_str("{}"),
                }
            }
            _ => rendered.push(c),
        }
    }

    for extra in next_arg {
        rendered.push(' ');
        rendered.push_str(extra);
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_action() {
        let action = Action::new("play");
        assert_eq!(action.name(), "play");
        assert_eq!(action.format(), "play");
        assert!(action.args().is_empty());
        assert_eq!(action.to_string(), "play");
    }

    #[test]
    fn test_parameterized_action() {
        let action = Action::with_args("press-button '{}' {} times", ["play".to_string(), 3.to_string()]);
        assert_eq!(action.name(), "press-button 'play' 3 times");
        assert_eq!(action.format(), "press-button '{}' {} times");
        assert_eq!(action.args(), &["play".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_escaped_braces() {
        let action = Action::with_args("set {{x}} = {}", [1]);
        assert_eq!(action.name(), "set {x} = 1");
    }

    #[test]
    fn test_missing_and_surplus_arguments() {
        let missing = Action::with_args("pair({}, {})", [1]);
        assert_eq!(missing.name(), "pair(1, {})");

        let surplus = Action::with_args("tap", [1, 2]);
        assert_eq!(surplus.name(), "tap 1 2");
        assert_ne!(surplus, Action::new("tap"));
    }

    #[test]
    fn test_identity_is_the_name() {
        let a = Action::with_args("song({})", [2]);
        let b = Action::new("song(2)");
        assert_eq!(a, b);
        assert_ne!(a.format(), b.format());
    }
}
