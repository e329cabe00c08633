//! General dense matrix product `C = A·B`.
//!
//! Operands are re-expressed in column-major and the product is accumulated one
//! output column at a time:
//!
//! ```text
//! C[:, j] = Σ_k A[:, k] · B[k, j]
//! ```
//!
//! The innermost loop is an axpy over a contiguous column of `A` into a contiguous
//! column of `C`. Large products split the columns of `C` across the rayon pool;
//! every column has exactly one writer and the `k` order is fixed, so results are
//! bit-identical regardless of thread count.

use log::debug;
use rayon::prelude::*;

use crate::domain::{Layout, Matrix};
use crate::error::LinalgError;
use crate::math::layout::{ensure_shape, to_column_major, to_row_major};

/// Products with at least this many multiply-adds run in parallel.
const PAR_MIN_FLOPS: usize = 64 * 64 * 64;

/// `C = A·B` for `A` (m×n) and `B` (n×l). The result is row-major.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, LinalgError> {
    if a.cols() != b.rows() {
        return Err(LinalgError::DimensionMismatch {
            left_cols: a.cols(),
            right_rows: b.rows(),
        });
    }
    let (m, n) = a.shape();
    let l = b.cols();

    let c = gemm_col_major(&a.col_major_data(), &b.col_major_data(), m, n, l);
    Ok(Matrix::from_col_major(m, l, c)?.to_layout(Layout::RowMajor))
}

/// Flat-buffer form of [`multiply`]: row-major in, row-major out.
///
/// `a` must hold `m*n` values and `b` must hold `n*l` values.
pub fn multiply_flat(a: &[f64], b: &[f64], m: usize, n: usize, l: usize) -> Result<Vec<f64>, LinalgError> {
    if m == 0 || n == 0 || l == 0 {
        return Err(LinalgError::InvalidDimensions(format!(
            "m, n, l must be positive (got {m}, {n}, {l})"
        )));
    }
    let a_cm = to_column_major(a, m, n)?;
    let b_cm = to_column_major(b, n, l)?;
    let c = gemm_col_major(&a_cm, &b_cm, m, n, l);
    to_row_major(&c, m, l)
}

/// Column-major kernel. Shapes are trusted.
pub(crate) fn gemm_col_major(a: &[f64], b: &[f64], m: usize, n: usize, l: usize) -> Vec<f64> {
    let parallel = m.saturating_mul(n).saturating_mul(l) >= PAR_MIN_FLOPS;
    debug!("gemm {m}x{n} * {n}x{l} (parallel={parallel})");
    gemm_col_major_with(a, b, m, n, l, parallel)
}

fn gemm_col_major_with(a: &[f64], b: &[f64], m: usize, n: usize, l: usize, parallel: bool) -> Vec<f64> {
    debug_assert!(ensure_shape(m, n, a.len()).is_ok() && ensure_shape(n, l, b.len()).is_ok());

    let mut c = vec![0.0; m * l];
    let column = |(j, c_col): (usize, &mut [f64])| {
        let b_col = &b[j * n..(j + 1) * n];
        for (k, &bkj) in b_col.iter().enumerate() {
            let a_col = &a[k * m..(k + 1) * m];
            for (cij, &aik) in c_col.iter_mut().zip(a_col) {
                *cij += aik * bkj;
            }
        }
    };

    if parallel {
        c.par_chunks_mut(m).enumerate().for_each(column);
    } else {
        c.chunks_mut(m).enumerate().for_each(column);
    }
    c
}
