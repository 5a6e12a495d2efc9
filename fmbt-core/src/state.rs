//! Model states.
//!
//! States are defined by the user of the library. The only thing the engine
//! needs from a state is a canonical rendering: two states are the same
//! state if and only if their renderings are equal. Coverage items, path
//! chaining and de-duplication are all keyed by the rendering.

use std::rc::Rc;
use std::sync::Arc;

/// A state of the modelled system under test.
///
/// `render` must be deterministic and stable across calls. Avoid rendering
/// collections with unspecified iteration order, such as `HashMap`.
///
/// # Example
///
/// ```rust
/// use fmbt_core::State;
///
/// #[derive(Clone)]
/// struct Door {
///     open: bool,
/// }
///
/// impl State for Door {
///     fn render(&self) -> String {
///         format!("{{open:{}}}", self.open)
///     }
/// }
///
/// assert_eq!(Door { open: true }.render(), "{open:true}");
/// ```
pub trait State: Clone {
    /// Canonical rendering used as the identity of this state.
    fn render(&self) -> String;
}

/// Returns true if two states render equal.
pub fn same_state<S: State>(a: &S, b: &S) -> bool {
    a.render() == b.render()
}

macro_rules! impl_state_via_to_string {
    ($($ty:ty),* $(,)?) => {
        $(
            impl State for $ty {
                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_state_via_to_string!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, String,
    &'static str,
);

impl<T: State> State for Rc<T> {
    fn render(&self) -> String {
        T::render(self)
    }
}

impl<T: State> State for Arc<T> {
    fn render(&self) -> String {
        T::render(self)
    }
}

impl<T: State> State for Box<T> {
    fn render(&self) -> String {
        T::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Counter(u32);

    impl State for Counter {
        fn render(&self) -> String {
            format!("count={}", self.0)
        }
    }

    #[test]
    fn test_primitive_rendering() {
        assert_eq!(42u8.render(), "42");
        assert_eq!(true.render(), "true");
        assert_eq!("idle".render(), "idle");
        assert_eq!(String::from("busy").render(), "busy");
    }

    #[test]
    fn test_smart_pointers_forward_rendering() {
        assert_eq!(Rc::new(Counter(3)).render(), "count=3");
        assert_eq!(Arc::new(Counter(4)).render(), "count=4");
        assert_eq!(Box::new(Counter(5)).render(), "count=5");
    }

    #[test]
    fn test_same_state_compares_renderings() {
        assert!(same_state(&Counter(1), &Counter(1)));
        assert!(!same_state(&Counter(1), &Counter(2)));
    }
}
