//! Fitting routines.
//!
//! Given samples `(x_i, y_i)` and a model of degree `d`, we solve
//!
//! ```text
//! minimize Σ (A·θ - y)_i^2        A = design_matrix(samples, d)
//! ```
//!
//! with one of two strategies:
//! - `SolveMethod::Normal`: form the Gram system `AᵗA·θ = Aᵗy` with the dense
//!   multiplier and solve it with LU. Cheap for tiny systems, but squares the
//!   condition number.
//! - `SolveMethod::Qr`: Householder QR straight on `A`.
//!
//! Residuals and SSE are always recomputed from `θ`, never read from the QR
//! packed tail, so both strategies report the same quantities.

use log::debug;

use crate::domain::{FitReport, FitRow, Matrix, ModelKind, SampleSet, SolveMethod};
use crate::error::LinalgError;
use crate::fit::design_matrix;
use crate::math::{LuDecomposition, multiply, solve_least_squares};
use crate::models::predict;

/// Fit `model` to `samples` using `method`.
pub fn fit(samples: &SampleSet, model: ModelKind, method: SolveMethod) -> Result<FitReport, LinalgError> {
    let design = design_matrix(samples, model.degree())?;
    let y = samples.ys();
    debug!(
        "fitting {} model to {} samples via {}",
        model.display_name(),
        samples.len(),
        method.display_name()
    );

    let theta = match method {
        SolveMethod::Normal => solve_normal_equations(&design, &y)?,
        SolveMethod::Qr => solve_least_squares(&design, &y)?.theta,
    };

    Ok(build_report(samples, model, method, theta))
}

/// Straight line by normal equations.
pub fn fit_linear(samples: &SampleSet) -> Result<FitReport, LinalgError> {
    fit(samples, ModelKind::Linear, SolveMethod::Normal)
}

/// Parabola by Householder QR.
pub fn fit_quadratic(samples: &SampleSet) -> Result<FitReport, LinalgError> {
    fit(samples, ModelKind::Quadratic, SolveMethod::Qr)
}

/// Gram pivot threshold per row and per accumulated sample.
const GRAM_RTOL: f64 = 8.0 * f64::EPSILON;

/// Solve `(AᵗA)·θ = Aᵗy`.
///
/// A singular Gram matrix (e.g. all x identical) surfaces as `SingularSystem`.
/// Every Gram entry is a sum of `m` products, so its rounding grows with `m`
/// and the pivot threshold is `n * m * GRAM_RTOL * max|AᵗA|`.
pub fn solve_normal_equations(a: &Matrix, y: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let (m, n) = a.shape();
    let at = a.transpose();
    let gram = multiply(&at, a)?;
    let rhs = multiply(&at, &Matrix::column_vector(y)?)?;
    let rtol = (n * m) as f64 * GRAM_RTOL;
    LuDecomposition::with_tolerance(&gram, rtol)?.solve(rhs.data())
}

fn build_report(samples: &SampleSet, model: ModelKind, method: SolveMethod, theta: Vec<f64>) -> FitReport {
    let rows: Vec<FitRow> = samples
        .points()
        .iter()
        .map(|p| {
            let y_hat = predict(&theta, p.x);
            FitRow {
                x: p.x,
                y: p.y,
                y_hat,
                residual: y_hat - p.y,
            }
        })
        .collect();

    let sse: f64 = rows.iter().map(|r| r.residual * r.residual).sum();
    let mse = sse / rows.len() as f64;

    FitReport {
        model,
        method,
        theta,
        rows,
        sse,
        mse,
    }
}

impl FitReport {
    /// Evaluate the fitted model at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        predict(&self.theta, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn linear_points() -> SampleSet {
        SampleSet::from_pairs(&[(1.0, 2.0), (2.0, 2.0), (3.0, 4.0), (4.0, 5.0)]).unwrap()
    }

    fn quadratic_points() -> SampleSet {
        SampleSet::from_pairs(&[(0.0, 1.2), (1.0, 2.0), (2.0, 2.9), (3.0, 4.1), (4.0, 5.8), (5.0, 8.2)]).unwrap()
    }

    fn sse_at(samples: &SampleSet, theta: &[f64]) -> f64 {
        samples
            .points()
            .iter()
            .map(|p| (predict(theta, p.x) - p.y).powi(2))
            .sum()
    }

    #[test]
    fn linear_fit_matches_closed_form() {
        let report = fit_linear(&linear_points()).unwrap();
        // slope = Sxy/Sxx = 5.5/5, intercept = ȳ - slope·x̄
        assert_abs_diff_eq!(report.theta[0], 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(report.theta[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(report.sse, 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(report.mse, 0.175, epsilon = 1e-12);
        assert_eq!(report.rows.len(), 4);
        assert_abs_diff_eq!(report.rows[1].residual, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn linear_fit_is_a_local_minimum() {
        let samples = linear_points();
        let report = fit_linear(&samples).unwrap();
        assert!(report.sse >= 0.0);
        let h = 1e-4;
        for (da, db) in [(h, 0.0), (-h, 0.0), (0.0, h), (0.0, -h), (h, h), (-h, h), (h, -h), (-h, -h)] {
            let perturbed = [report.theta[0] + da, report.theta[1] + db];
            assert!(sse_at(&samples, &perturbed) > report.sse, "perturbation ({da}, {db}) lowered SSE");
        }
    }

    #[test]
    fn strategies_agree_on_well_conditioned_data() {
        for (samples, model) in [(linear_points(), ModelKind::Linear), (quadratic_points(), ModelKind::Quadratic)] {
            let normal = fit(&samples, model, SolveMethod::Normal).unwrap();
            let qr = fit(&samples, model, SolveMethod::Qr).unwrap();
            for (a, b) in normal.theta.iter().zip(&qr.theta) {
                assert_relative_eq!(*a, *b, max_relative = 1e-6, epsilon = 1e-9);
            }
            assert_relative_eq!(normal.sse, qr.sse, max_relative = 1e-6);
        }
    }

    #[test]
    fn quadratic_sse_matches_residual_table() {
        let samples = quadratic_points();
        let report = fit_quadratic(&samples).unwrap();
        assert_eq!(report.theta.len(), 3);
        let from_rows: f64 = report.rows.iter().map(|r| (r.y_hat - r.y).powi(2)).sum();
        assert_relative_eq!(report.sse, from_rows, max_relative = 1e-12);
        assert_relative_eq!(report.sse, sse_at(&samples, &report.theta), max_relative = 1e-12);
        assert_relative_eq!(report.mse, report.sse / 6.0, max_relative = 1e-12);

        let design = design_matrix(&samples, 2).unwrap();
        let packed = solve_least_squares(&design, &samples.ys()).unwrap().packed_residual_sse;
        assert_relative_eq!(report.sse, packed, max_relative = 1e-9);
    }

    #[test]
    fn report_predict_uses_theta() {
        let report = fit_quadratic(&quadratic_points()).unwrap();
        let t = &report.theta;
        assert_abs_diff_eq!(report.predict(2.5), t[0] * 6.25 + t[1] * 2.5 + t[2], epsilon = 1e-12);
    }

    #[test]
    fn identical_x_values_fail_per_strategy() {
        let samples = SampleSet::from_pairs(&[(2.0, 1.0), (2.0, 3.0), (2.0, 2.0), (2.0, 5.0)]).unwrap();
        assert!(matches!(
            fit(&samples, ModelKind::Linear, SolveMethod::Normal),
            Err(LinalgError::SingularSystem { .. })
        ));
        assert!(matches!(
            fit(&samples, ModelKind::Quadratic, SolveMethod::Qr),
            Err(LinalgError::RankDeficient { .. })
        ));
        assert!(matches!(
            fit(&samples, ModelKind::Linear, SolveMethod::Qr),
            Err(LinalgError::RankDeficient { .. })
        ));
    }

    #[test]
    fn identical_inexact_x_values_are_singular() {
        // Non-representable x values leave rounding in Σx and Σx², so the Gram
        // matrix is only singular up to accumulated error.
        for &x in &[0.1, 0.3, 0.7, 1.1, 2.0, 3.7, 12.3, 1000.1, 1e-3] {
            for &m in &[2usize, 3, 4, 5, 7, 10, 13, 50] {
                let pairs: Vec<(f64, f64)> = (0..m).map(|i| (x, i as f64)).collect();
                let samples = SampleSet::from_pairs(&pairs).unwrap();
                let normal = fit(&samples, ModelKind::Linear, SolveMethod::Normal);
                assert!(
                    matches!(normal, Err(LinalgError::SingularSystem { .. })),
                    "x = {x}, m = {m}: {normal:?}"
                );
                assert!(matches!(
                    fit(&samples, ModelKind::Linear, SolveMethod::Qr),
                    Err(LinalgError::RankDeficient { .. })
                ));
            }
        }
    }

    #[test]
    fn clustered_but_distinct_x_values_still_fit() {
        let samples = SampleSet::from_pairs(&[(100.0, 1.0), (100.5, 2.0), (101.0, 3.0), (101.5, 4.0)]).unwrap();
        let report = fit(&samples, ModelKind::Linear, SolveMethod::Normal).unwrap();
        assert_relative_eq!(report.theta[0], 2.0, max_relative = 1e-4);
    }

    #[test]
    fn too_few_samples_for_parabola() {
        let samples = SampleSet::from_pairs(&[(0.0, 1.0), (1.0, 2.0)]).unwrap();
        assert!(matches!(fit_quadratic(&samples), Err(LinalgError::RankDeficient { .. })));
    }
}
