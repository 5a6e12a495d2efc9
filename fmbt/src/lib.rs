//! fmbt model-based test generation library.
//!
//! This is the main entry point for fmbt, re-exporting the modelling,
//! path enumeration and coverage types of `fmbt-core`.
//!
//! ```rust
//! use fmbt::*;
//!
//! let mut model = Model::new();
//! model.register(|on: &bool| {
//!     when(true, [
//!         when(*on, [on_action("off").to_state(false)]),
//!         when(!*on, [on_action("on").to_state(true)]),
//!     ])
//! });
//!
//! let mut coverer = Coverer::new();
//! coverer.cover_actions();
//! let (path, stats) = coverer.best_path(&model, &false, 4).unwrap();
//! assert_eq!(stats.max_increase, 2);
//! assert_eq!(path.prefix(stats.max_step + 1).to_string(), "[false--on->true] [true--off->false]");
//! ```

pub use fmbt_core::*;

// Re-export derive macros when available
#[cfg(feature = "derive")]
pub use fmbt_derive::*;
