//! Built-in inputs: reference data sets and seeded random matrices.

pub mod random;
pub mod reference;

pub use random::*;
pub use reference::*;
