//! Polynomial model evaluation.
//!
//! Models are implemented as small, pure functions so that fitting code can
//! stay generic over the degree.

pub mod model;

pub use model::*;
