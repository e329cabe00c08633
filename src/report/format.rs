//! Terminal formatting for matrices, fit reports and SVD results.

use crate::domain::{FitReport, FitRow, Matrix};
use crate::math::SvdReport;

const COEFF_NAMES: [&str; 3] = ["a", "b", "c"];

/// One line per row, fixed-width columns.
pub fn format_matrix(m: &Matrix, precision: usize) -> String {
    let mut out = String::new();
    for i in 0..m.rows() {
        let line: Vec<String> = (0..m.cols())
            .map(|j| format!("{:>14.*}", precision, m.get(i, j)))
            .collect();
        out.push_str(line.join(" ").trim_end());
        out.push('\n');
    }
    out
}

/// Coefficients, per-sample table and fit quality.
pub fn format_fit_report(report: &FitReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== dla fit: {} model ({}) ===\n",
        report.model.display_name(),
        report.method.display_name()
    ));
    out.push_str(report.model.formula());
    out.push('\n');
    for (i, c) in report.theta.iter().enumerate() {
        let name = COEFF_NAMES.get(i).map(|s| s.to_string()).unwrap_or_else(|| format!("theta[{i}]"));
        out.push_str(&format!("{name} = {c:.10}\n"));
    }

    out.push_str("\nPoints and prediction:\n");
    out.push_str(&format_table(&report.rows));

    out.push_str(&format!("\nSSE = {:.10}\n", report.sse));
    out.push_str(&format!("MSE = {:.10}\n", report.mse));
    out
}

fn format_table(rows: &[FitRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>14} {:>14} {:>14} {:>14}\n", "x", "y", "y_hat", "err"));
    out.push_str(&format!("{:->14} {:->14} {:->14} {:->14}\n", "", "", "", ""));
    for r in rows {
        out.push_str(&format!(
            "{:>14.6} {:>14.6} {:>14.10} {:>14.10}\n",
            r.x, r.y, r.y_hat, r.residual
        ));
    }
    out
}

/// Singular values, factors, reconstruction and its max error.
pub fn format_svd_report(report: &SvdReport) -> String {
    let n = report.svd.s.len();
    let mut out = String::new();

    out.push_str("Singular values S:\n");
    for (i, s) in report.svd.s.iter().enumerate() {
        out.push_str(&format!("  S[{i}] = {s:.8}\n"));
    }

    out.push_str(&format!("\nMatrix U ({n}x{n}):\n"));
    out.push_str(&format_matrix(&report.svd.u, 8));

    out.push_str(&format!("\nMatrix V^T ({n}x{n}):\n"));
    out.push_str(&format_matrix(&report.svd.vt, 8));

    out.push_str("\nA reconstructed (U * Sigma * V^T):\n");
    out.push_str(&format_matrix(&report.reconstructed, 8));

    out.push_str(&format!("\nMax error |A_rec - A| = {:e}\n", report.max_err));
    out
}

/// One-line summary printed by `dla multiply`.
pub fn format_multiply_summary(c: &Matrix) -> String {
    format!("OK: C = A*B ({}x{})", c.rows(), c.cols())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{reference_points, reference_svd_matrix};
    use crate::domain::ModelKind;
    use crate::fit::fit_linear;
    use crate::math::svd_with_reconstruction;

    #[test]
    fn matrix_rows_are_trimmed_and_aligned() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, -0.5, 0.0, 2.0]).unwrap();
        let s = format_matrix(&m, 2);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("{:>14} {:>14}", "1.00", "-0.50"));
    }

    #[test]
    fn fit_report_lists_coefficients_and_quality() {
        let report = fit_linear(&reference_points(ModelKind::Linear).unwrap()).unwrap();
        let s = format_fit_report(&report);
        assert!(s.contains("y = a*x + b"));
        assert!(s.contains("a = 1.1000000000"));
        assert!(s.contains("b = 0.5000000000"));
        assert!(s.contains("SSE = 0.7000000000"));
        assert!(s.contains("MSE = 0.1750000000"));
        // header + rule + 4 samples
        let table_lines = s.lines().skip_while(|l| !l.contains("y_hat")).take_while(|l| !l.is_empty()).count();
        assert_eq!(table_lines, 6);
    }

    #[test]
    fn svd_report_sections() {
        let report = svd_with_reconstruction(&reference_svd_matrix().unwrap()).unwrap();
        let s = format_svd_report(&report);
        assert!(s.contains("S[0] = "));
        assert!(s.contains("S[1] = "));
        assert!(s.contains("Matrix U (2x2):"));
        assert!(s.contains("Max error |A_rec - A| = "));
    }

    #[test]
    fn multiply_summary() {
        let c = Matrix::zeros(3, 4).unwrap();
        assert_eq!(format_multiply_summary(&c), "OK: C = A*B (3x4)");
    }
}
