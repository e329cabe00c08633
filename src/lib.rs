//! `densela` library crate.
//!
//! The binary (`dla`) is a thin wrapper around this library so that:
//!
//! - the numerical core is testable without spawning processes
//! - the kernels (`math`) and fitters (`fit`) are usable on their own
//!
//! Matrices are stored as flat buffers tagged with their layout. The kernels
//! work in column-major internally and hand row-major results back to callers.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
