//! LU factorization with partial pivoting (`P·A = L·U`).
//!
//! Used to solve the small Gram systems of the normal-equation fit. The factors
//! are stored packed in one column-major buffer: `U` on and above the diagonal,
//! the unit-lower `L` multipliers below it.

use crate::domain::Matrix;
use crate::error::LinalgError;

/// Default relative pivot threshold per row: a pivot is treated as zero when
/// `|pivot| <= n * PIVOT_RTOL * max|A|`.
const PIVOT_RTOL: f64 = f64::EPSILON;

#[derive(Debug, Clone)]
pub struct LuDecomposition {
    n: usize,
    lu: Vec<f64>,
    /// `perm[i]` = original row now stored at row `i`.
    perm: Vec<usize>,
    swaps: usize,
}

impl LuDecomposition {
    /// Factor a square matrix.
    ///
    /// Fails with `InvalidDimensions` for non-square input and `SingularSystem`
    /// when a pivot column has no usable entry.
    pub fn new(a: &Matrix) -> Result<Self, LinalgError> {
        Self::with_tolerance(a, a.rows() as f64 * PIVOT_RTOL)
    }

    /// Factor with an explicit pivot threshold: a pivot is treated as zero when
    /// `|pivot| <= rtol * max|A|`.
    ///
    /// Use a larger `rtol` when the entries of `A` already carry accumulated
    /// rounding, e.g. Gram matrices built from long sums.
    pub fn with_tolerance(a: &Matrix, rtol: f64) -> Result<Self, LinalgError> {
        if !a.is_square() {
            return Err(LinalgError::InvalidDimensions(format!(
                "LU needs a square matrix, got {}x{}",
                a.rows(),
                a.cols()
            )));
        }
        let n = a.rows();
        let mut lu = a.col_major_data().into_owned();
        let scale = lu.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let tol = rtol * scale;

        let mut perm: Vec<usize> = (0..n).collect();
        let mut swaps = 0;

        for k in 0..n {
            let (p, pivot_abs) = (k..n)
                .map(|i| (i, lu[k * n + i].abs()))
                .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

            if !(pivot_abs > tol) {
                return Err(LinalgError::SingularSystem { pivot: k });
            }

            if p != k {
                for j in 0..n {
                    lu.swap(j * n + k, j * n + p);
                }
                perm.swap(k, p);
                swaps += 1;
            }

            let pivot = lu[k * n + k];
            for i in (k + 1)..n {
                lu[k * n + i] /= pivot;
            }
            for j in (k + 1)..n {
                let ukj = lu[j * n + k];
                if ukj == 0.0 {
                    continue;
                }
                for i in (k + 1)..n {
                    lu[j * n + i] -= lu[k * n + i] * ukj;
                }
            }
        }

        Ok(Self { n, lu, perm, swaps })
    }

    /// Solve `A·x = b`.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
        let n = self.n;
        if b.len() != n {
            return Err(LinalgError::InvalidDimensions(format!(
                "right-hand side has {} entries, system has {n}",
                b.len()
            )));
        }

        let mut x: Vec<f64> = self.perm.iter().map(|&p| b[p]).collect();

        // Forward substitution with unit-lower L.
        for j in 0..n {
            let xj = x[j];
            for i in (j + 1)..n {
                x[i] -= self.lu[j * n + i] * xj;
            }
        }
        // Back substitution with U.
        for j in (0..n).rev() {
            x[j] /= self.lu[j * n + j];
            let xj = x[j];
            for i in 0..j {
                x[i] -= self.lu[j * n + i] * xj;
            }
        }
        Ok(x)
    }

    pub fn determinant(&self) -> f64 {
        let n = self.n;
        let diag: f64 = (0..n).map(|k| self.lu[k * n + k]).product();
        if self.swaps % 2 == 0 { diag } else { -diag }
    }
}

/// Factor and solve in one call.
pub fn solve_linear(a: &Matrix, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
    LuDecomposition::new(a)?.solve(b)
}
