//! Householder QR least squares.
//!
//! Solves the overdetermined problem
//!
//! ```text
//! minimize ||A·θ - y||_2        A is m×n, m >= n
//! ```
//!
//! by reducing `A` to upper-triangular `R = QᵗA` with Householder reflections,
//! applying the same reflections to `y`, and back-substituting `R·θ = (Qᵗy)[..n]`.
//! `AᵗA` is never formed, so the conditioning of the problem is not squared.
//!
//! [`least_squares_in_place`] follows the usual LAPACK buffer convention: `b` is
//! at least `max(m, n)` long, holds `y` on entry, and holds `θ` in `b[..n]` plus
//! the residual components `(Qᵗy)[n..m]` on return.

use log::debug;

use crate::domain::Matrix;
use crate::error::LinalgError;
use crate::math::layout::ensure_shape;

/// Column `k` counts as independent when `|R[k,k]| > RANK_RTOL * ||A[:,k]||`.
const RANK_RTOL: f64 = 1e-12;

/// Least-squares solution and the residual read off the packed tail.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresSolution {
    pub theta: Vec<f64>,
    /// `Σ (Qᵗy)[n..m]²`, equal to the SSE in exact arithmetic.
    pub packed_residual_sse: f64,
}

/// Solve `min ||A·θ - y||` without touching the caller's buffers.
pub fn solve_least_squares(a: &Matrix, y: &[f64]) -> Result<LeastSquaresSolution, LinalgError> {
    let (m, n) = a.shape();
    if y.len() != m {
        return Err(LinalgError::InvalidDimensions(format!(
            "observation vector has {} entries, design matrix has {m} rows",
            y.len()
        )));
    }

    let mut work = a.col_major_data().into_owned();
    let mut b = vec![0.0; m.max(n)];
    b[..m].copy_from_slice(y);

    least_squares_in_place(&mut work, m, n, &mut b)?;

    Ok(LeastSquaresSolution {
        theta: b[..n].to_vec(),
        packed_residual_sse: b[n..m].iter().map(|r| r * r).sum(),
    })
}

/// In-place Householder least squares on a column-major `m×n` buffer.
///
/// On success `a` holds `R` in its upper triangle (zeros below) and `b` holds
/// `θ` followed by the packed residual. On failure the buffers are left in an
/// unspecified state.
pub fn least_squares_in_place(a: &mut [f64], m: usize, n: usize, b: &mut [f64]) -> Result<(), LinalgError> {
    ensure_shape(m, n, a.len())?;
    if b.len() < m.max(n) {
        return Err(LinalgError::InvalidArgument(format!(
            "right-hand side buffer has {} entries, needs at least max(m, n) = {}",
            b.len(),
            m.max(n)
        )));
    }
    if m < n {
        // At most m independent rows, so the columns cannot be independent.
        return Err(LinalgError::RankDeficient { rank: m, cols: n });
    }
    debug!("householder least squares {m}x{n}");

    let col_norms: Vec<f64> = (0..n).map(|j| norm(&a[j * m..(j + 1) * m])).collect();

    for k in 0..n {
        let col = k * m;
        let norm_k = norm(&a[col + k..col + m]);
        if norm_k == 0.0 {
            continue;
        }

        let akk = a[col + k];
        let alpha = if akk >= 0.0 { -norm_k } else { norm_k };

        // v = x - alpha·e1, stored over the column below (and on) the diagonal.
        a[col + k] = akk - alpha;
        let vtv: f64 = a[col + k..col + m].iter().map(|v| v * v).sum();

        for j in (k + 1)..n {
            let (left, right) = a.split_at_mut(j * m);
            reflect(&left[col + k..col + m], &mut right[k..m], vtv);
        }
        reflect(&a[col + k..col + m], &mut b[k..m], vtv);

        a[col + k] = alpha;
        for v in &mut a[col + k + 1..col + m] {
            *v = 0.0;
        }
    }

    // Column k is dependent when little of it survives outside span(cols 0..k).
    let rank = (0..n)
        .filter(|&k| a[k * m + k].abs() > RANK_RTOL * col_norms[k])
        .count();
    if rank < n {
        return Err(LinalgError::RankDeficient { rank, cols: n });
    }

    for k in (0..n).rev() {
        let mut s = b[k];
        for j in (k + 1)..n {
            s -= a[j * m + k] * b[j];
        }
        b[k] = s / a[k * m + k];
    }

    Ok(())
}

/// `x ← (I - 2vvᵗ/vᵗv)·x`
fn reflect(v: &[f64], x: &mut [f64], vtv: f64) {
    let dot: f64 = v.iter().zip(x.iter()).map(|(vi, xi)| vi * xi).sum();
    let f = 2.0 * dot / vtv;
    for (xi, vi) in x.iter_mut().zip(v) {
        *xi -= f * vi;
    }
}

fn norm(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn solves_exact_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = Matrix::from_row_major(3, 2, vec![1.0, 0.0, 1.0, 1.0, 1.0, 2.0]).unwrap();
        let sol = solve_least_squares(&x, &[2.0, 5.0, 8.0]).unwrap();
        assert_abs_diff_eq!(sol.theta[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.theta[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.packed_residual_sse, 0.0, epsilon = 1e-20);
    }

    #[test]
    fn packed_residual_matches_recomputed_sse() {
        let rows = [(0.0, 1.2), (1.0, 2.0), (2.0, 2.9), (3.0, 4.1), (4.0, 5.8), (5.0, 8.2)];
        let data: Vec<f64> = rows.iter().flat_map(|&(x, _)| [x * x, x, 1.0]).collect();
        let a = Matrix::from_row_major(6, 3, data).unwrap();
        let y: Vec<f64> = rows.iter().map(|&(_, y)| y).collect();

        let sol = solve_least_squares(&a, &y).unwrap();
        let sse: f64 = rows
            .iter()
            .map(|&(x, y)| {
                let t = &sol.theta;
                let r = t[0] * x * x + t[1] * x + t[2] - y;
                r * r
            })
            .sum();
        assert_relative_eq!(sol.packed_residual_sse, sse, max_relative = 1e-9);
    }

    #[test]
    fn in_place_buffer_must_hold_max_m_n() {
        let mut a = vec![1.0, 1.0, 1.0, 0.0, 1.0, 2.0];
        let mut b = vec![2.0, 5.0];
        assert!(matches!(
            least_squares_in_place(&mut a, 3, 2, &mut b),
            Err(LinalgError::InvalidArgument(_))
        ));
    }

    #[test]
    fn in_place_leaves_theta_then_residual() {
        // Column-major [x, 1] for x = [0, 1, 2, 3], y = x exactly except the last.
        let mut a = vec![0.0, 1.0, 2.0, 3.0, 1.0, 1.0, 1.0, 1.0];
        let mut b = vec![0.0, 1.0, 2.0, 4.0];
        least_squares_in_place(&mut a, 4, 2, &mut b).unwrap();
        // Upper triangle of R only.
        assert_eq!(a[1], 0.0);
        assert_eq!(a[3], 0.0);
        let tail: f64 = b[2..].iter().map(|r| r * r).sum();
        // Line through (0,0),(1,1),(2,2),(3,4): slope 1.3, intercept -0.2, SSE 0.3.
        assert_abs_diff_eq!(b[0], 1.3, epsilon = 1e-12);
        assert_abs_diff_eq!(b[1], -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(tail, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn dependent_columns_are_rank_deficient() {
        // x is constant, so [x^2, x, 1] has rank 1.
        let data: Vec<f64> = (0..5).flat_map(|_| [0.01, 0.1, 1.0]).collect();
        let a = Matrix::from_row_major(5, 3, data).unwrap();
        assert!(matches!(
            solve_least_squares(&a, &[1.0, 2.0, 3.0, 4.0, 5.0]),
            Err(LinalgError::RankDeficient { rank: 1, cols: 3 })
        ));
    }

    #[test]
    fn underdetermined_is_rank_deficient() {
        let a = Matrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert!(matches!(
            solve_least_squares(&a, &[1.0, 2.0]),
            Err(LinalgError::RankDeficient { .. })
        ));
    }

    #[test]
    fn rejects_observation_length_mismatch() {
        let a = Matrix::identity(3).unwrap();
        assert!(matches!(
            solve_least_squares(&a, &[1.0, 2.0]),
            Err(LinalgError::InvalidDimensions(_))
        ));
    }
}
