//! Singular value decomposition of a square matrix (one-sided Jacobi).
//!
//! Hestenes' method: repeatedly rotate pairs of columns of `W = A·V` until every
//! pair is orthogonal. At convergence
//!
//! ```text
//! σ_j = ||W[:, j]||      U[:, j] = W[:, j] / σ_j      A = U·diag(σ)·Vᵗ
//! ```
//!
//! The method is simple, accurate for small dense problems, and produces `U` and
//! `V` that are orthogonal to working precision. Columns of `U` belonging to zero
//! singular values are completed to an orthonormal basis.

use log::{debug, trace, warn};
use serde::Serialize;

use crate::domain::{Layout, Matrix};
use crate::error::LinalgError;
use crate::math::gemm::multiply;

/// Sweep budget. Convergence is quadratic, so well-behaved inputs need < 10.
const MAX_SWEEPS: usize = 60;

/// A column pair counts as orthogonal when `|w_p·w_q| <= n * ORTH_RTOL * ||w_p||·||w_q||`.
const ORTH_RTOL: f64 = 8.0 * f64::EPSILON;

/// Factorization triple `A = U·diag(s)·Vt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Svd {
    pub u: Matrix,
    /// Singular values, non-negative and descending.
    pub s: Vec<f64>,
    pub vt: Matrix,
    /// Jacobi sweeps used.
    pub sweeps: usize,
}

/// SVD plus the reconstruction check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvdReport {
    pub original: Matrix,
    pub svd: Svd,
    pub reconstructed: Matrix,
    /// `max_i |Â_i - A_i|`
    pub max_err: f64,
}

/// Factor a square matrix.
pub fn svd(a: &Matrix) -> Result<Svd, LinalgError> {
    jacobi_svd(a, MAX_SWEEPS)
}

/// Factor `a`, rebuild it from the factors and measure the element-wise error.
pub fn svd_with_reconstruction(a: &Matrix) -> Result<SvdReport, LinalgError> {
    let svd = svd(a)?;
    let reconstructed = svd.reconstruct()?;
    let max_err = reconstructed.max_abs_diff(a)?;

    let scale = a.data().iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    let expected = 100.0 * a.rows() as f64 * f64::EPSILON * scale;
    if max_err > expected {
        warn!("SVD reconstruction error {max_err:e} exceeds expected {expected:e}");
    }

    Ok(SvdReport {
        original: a.to_layout(Layout::RowMajor),
        svd,
        reconstructed,
        max_err,
    })
}

impl Svd {
    /// `Â = (U·diag(s))·Vt`, as two dense products.
    pub fn reconstruct(&self) -> Result<Matrix, LinalgError> {
        let us = multiply(&self.u, &Matrix::diagonal(&self.s)?)?;
        multiply(&us, &self.vt)
    }

    pub fn v(&self) -> Matrix {
        self.vt.transpose()
    }

    /// `(max |UᵗU - I|, max |VᵗV - I|)`.
    pub fn orthogonality_error(&self) -> Result<(f64, f64), LinalgError> {
        let n = self.s.len();
        let eye = Matrix::identity(n)?;
        let utu = multiply(&self.u.transpose(), &self.u)?;
        let vtv = multiply(&self.vt, &self.vt.transpose())?;
        Ok((utu.max_abs_diff(&eye)?, vtv.max_abs_diff(&eye)?))
    }
}

fn jacobi_svd(a: &Matrix, max_sweeps: usize) -> Result<Svd, LinalgError> {
    if !a.is_square() {
        return Err(LinalgError::InvalidDimensions(format!(
            "SVD needs a square matrix, got {}x{}",
            a.rows(),
            a.cols()
        )));
    }
    if a.data().iter().any(|v| !v.is_finite()) {
        return Err(LinalgError::InvalidArgument("matrix contains non-finite values".to_string()));
    }

    let n = a.rows();
    let tol = n as f64 * ORTH_RTOL;
    let mut w = a.col_major_data().into_owned();
    let mut v = Matrix::identity(n)?.col_major_data().into_owned();

    let mut sweeps = 0;
    let mut converged = false;
    while sweeps < max_sweeps {
        sweeps += 1;
        let mut rotations = 0usize;

        for p in 0..n.saturating_sub(1) {
            for q in (p + 1)..n {
                let alpha = dot(&w, n, p, p);
                let beta = dot(&w, n, q, q);
                let gamma = dot(&w, n, p, q);
                if gamma == 0.0 || gamma.abs() <= tol * (alpha * beta).sqrt() {
                    continue;
                }

                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;

                rotate(&mut w, n, p, q, c, s);
                rotate(&mut v, n, p, q, c, s);
                rotations += 1;
            }
        }

        trace!("jacobi sweep {sweeps}: {rotations} rotations");
        if rotations == 0 {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(LinalgError::ConvergenceFailure { sweeps });
    }
    debug!("jacobi svd {n}x{n} converged in {sweeps} sweeps");

    let sigma: Vec<f64> = (0..n).map(|j| dot(&w, n, j, j).sqrt()).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| sigma[j].total_cmp(&sigma[i]));

    let sigma_max = sigma[order[0]];
    let zero_tol = sigma_max * tol;

    let u_cols: Vec<Option<Vec<f64>>> = order
        .iter()
        .map(|&j| {
            let sj = sigma[j];
            (sj > zero_tol && sj > 0.0).then(|| w[j * n..(j + 1) * n].iter().map(|x| x / sj).collect())
        })
        .collect();
    let u_data: Vec<f64> = complete_basis(u_cols, n)?.into_iter().flatten().collect();
    let vt_data: Vec<f64> = order.iter().flat_map(|&j| v[j * n..(j + 1) * n].to_vec()).collect();

    Ok(Svd {
        u: Matrix::from_col_major(n, n, u_data)?.to_layout(Layout::RowMajor),
        s: order.iter().map(|&j| sigma[j]).collect(),
        vt: Matrix::from_row_major(n, n, vt_data)?,
        sweeps,
    })
}

/// Fill `None` columns with unit vectors orthogonal to every other column.
///
/// For each gap every standard basis vector is orthogonalized twice (modified
/// Gram–Schmidt) against the columns filled so far, and the one with the largest
/// remainder is kept. While fewer than `n` columns are filled some `e_i` keeps at
/// least `1/√n` of its norm, so a usable candidate always exists.
fn complete_basis(mut cols: Vec<Option<Vec<f64>>>, n: usize) -> Result<Vec<Vec<f64>>, LinalgError> {
    for target in 0..cols.len() {
        if cols[target].is_some() {
            continue;
        }
        let mut best: Option<(f64, Vec<f64>)> = None;
        for e in 0..n {
            let mut cand = vec![0.0; n];
            cand[e] = 1.0;
            for _ in 0..2 {
                for col in cols.iter().flatten() {
                    let d: f64 = col.iter().zip(&cand).map(|(a, b)| a * b).sum();
                    for (c, x) in cand.iter_mut().zip(col) {
                        *c -= d * x;
                    }
                }
            }
            let norm = cand.iter().map(|x| x * x).sum::<f64>().sqrt();
            if best.as_ref().is_none_or(|(b, _)| norm > *b) {
                best = Some((norm, cand));
            }
        }
        match best {
            Some((norm, cand)) if norm > 0.0 => {
                cols[target] = Some(cand.into_iter().map(|x| x / norm).collect());
            }
            _ => {
                return Err(LinalgError::InvalidArgument(format!(
                    "could not complete column {target} of U to an orthonormal basis"
                )));
            }
        }
    }
    cols.into_iter()
        .enumerate()
        .map(|(j, col)| {
            col.ok_or_else(|| LinalgError::InvalidArgument(format!("column {j} of U was left empty")))
        })
        .collect()
}

/// Dot product of columns `p` and `q` of a column-major `n×n` buffer.
fn dot(buf: &[f64], n: usize, p: usize, q: usize) -> f64 {
    buf[p * n..(p + 1) * n]
        .iter()
        .zip(&buf[q * n..(q + 1) * n])
        .map(|(a, b)| a * b)
        .sum()
}

/// Apply the plane rotation `[c s; -s c]` to columns `p` and `q`.
fn rotate(buf: &mut [f64], n: usize, p: usize, q: usize, c: f64, s: f64) {
    for i in 0..n {
        let xp = buf[p * n + i];
        let xq = buf[q * n + i];
        buf[p * n + i] = c * xp - s * xq;
        buf[q * n + i] = s * xp + c * xq;
    }
}
