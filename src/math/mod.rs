//! Dense linear-algebra kernels.
//!
//! All kernels work on column-major buffers internally; [`layout`] converts at
//! the edges so callers can keep thinking in rows.

pub mod gemm;
pub mod layout;
pub mod lu;
pub mod qr;
pub mod svd;

pub use gemm::{multiply, multiply_flat};
pub use layout::{to_column_major, to_row_major};
pub use lu::{LuDecomposition, solve_linear};
pub use qr::{LeastSquaresSolution, least_squares_in_place, solve_least_squares};
pub use svd::{Svd, SvdReport, svd, svd_with_reconstruction};
