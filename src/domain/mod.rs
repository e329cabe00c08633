//! Domain types used throughout the kernel.
//!
//! This module defines:
//!
//! - the dense [`Matrix`] with its explicit [`Layout`] tag
//! - fitting inputs (`SamplePoint`, `SampleSet`, `ModelKind`, `SolveMethod`)
//! - fit outputs (`FitRow`, `FitReport`)
//! - run configurations derived from CLI flags

pub mod matrix;
pub mod types;

pub use matrix::*;
pub use types::*;
