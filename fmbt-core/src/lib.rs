//! Core functionality for fmbt model-based test generation.
//!
//! This crate provides the building blocks for generating tests from
//! models: defining a model of the system under test, choosing what tests
//! should cover, and searching step sequences that increase coverage.
//!
//! # Models
//!
//! A model specifies what can be tested ([`Action`]s) and when, using
//! states and [`Transition`]s. States are user types implementing
//! [`State`]. Transition generators registered to a [`Model`] return the
//! transitions that may be taken from a state; a transition whose state
//! change returns `None` is not possible there.
//!
//! # Test generation
//!
//! Tests are sequences of [`Step`]s forming a [`Path`]. A [`Walker`]
//! enumerates the paths of bounded length from a state. A [`Coverer`]
//! knows what should be covered, what has been covered, and which path
//! increases coverage the most. A [`Session`] runs the whole loop.

pub mod action;
pub mod cover;
pub mod data;
pub mod error;
pub mod model;
pub mod session;
pub mod state;
pub mod step;
pub mod transition;
pub mod walk;

// Re-export the main types
pub use action::*;
pub use cover::*;
pub use data::*;
pub use error::*;
pub use model::*;
pub use session::*;
pub use state::*;
pub use step::*;
pub use transition::*;
pub use walk::*;
