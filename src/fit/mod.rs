//! Least-squares polynomial fitting.
//!
//! Responsibilities:
//!
//! - build the design matrix for a sample set and degree
//! - solve for the coefficients by normal equations (LU) or Householder QR
//! - report per-sample predictions, residuals, SSE and MSE

pub mod design;
pub mod fitter;

pub use design::*;
pub use fitter::*;
