//! Plotting CSV export.
//!
//! Layout: `x_pts,y_pts,x_fit,y_fit`. The first two columns hold the samples,
//! the last two a dense evaluation grid of the fitted model over `[min x, max x]`.
//! When one side runs out of rows its cells are left blank.

use std::path::Path;

use crate::domain::FitReport;
use crate::error::AppError;
use crate::models::{linspace, predict_grid};

/// Write the samples and an evenly spaced prediction grid of `steps` points.
pub fn write_fit_csv(path: &Path, report: &FitReport, steps: usize) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let (grid_x, grid_y) = fit_grid(report, steps);
    let rows = report.rows.len().max(grid_x.len());

    writer
        .write_record(["x_pts", "y_pts", "x_fit", "y_fit"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for i in 0..rows {
        let (x_pts, y_pts) = match report.rows.get(i) {
            Some(r) => (r.x.to_string(), r.y.to_string()),
            None => (String::new(), String::new()),
        };
        let (x_fit, y_fit) = match (grid_x.get(i), grid_y.get(i)) {
            (Some(x), Some(y)) => (format!("{x:.10}"), format!("{y:.10}")),
            _ => (String::new(), String::new()),
        };
        writer
            .write_record([x_pts, y_pts, x_fit, y_fit])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Grid over the sample x-range. A degenerate range is widened by one unit.
pub(crate) fn fit_grid(report: &FitReport, steps: usize) -> (Vec<f64>, Vec<f64>) {
    let (mut lo, mut hi) = report
        .rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r.x), hi.max(r.x)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (Vec::new(), Vec::new());
    }
    if (hi - lo).abs() < 1e-12 {
        lo -= 0.5;
        hi += 0.5;
    }
    let xs = linspace(lo, hi, steps);
    let ys = predict_grid(&report.theta, &xs);
    (xs, ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKind, SampleSet, SolveMethod};
    use crate::fit::fit;

    fn report() -> FitReport {
        let samples = SampleSet::from_pairs(&[(1.0, 2.0), (2.0, 2.0), (3.0, 4.0), (4.0, 5.0)]).unwrap();
        fit(&samples, ModelKind::Linear, SolveMethod::Normal).unwrap()
    }

    #[test]
    fn grid_spans_sample_range() {
        let (xs, ys) = fit_grid(&report(), 5);
        assert_eq!(xs, vec![1.0, 1.75, 2.5, 3.25, 4.0]);
        assert_eq!(ys.len(), 5);
    }

    #[test]
    fn writes_blank_cells_past_the_samples() {
        let path = std::env::temp_dir().join(format!("dla-fit-{}.csv", std::process::id()));
        write_fit_csv(&path, &report(), 6).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x_pts,y_pts,x_fit,y_fit");
        assert_eq!(lines.len(), 1 + 6);
        assert!(lines[1].starts_with("1,2,1.0000000000,"));
        assert!(lines[6].starts_with(",,4.0000000000,"));
    }

    #[test]
    fn short_grid_leaves_fit_columns_blank() {
        let path = std::env::temp_dir().join(format!("dla-fit-short-{}.csv", std::process::id()));
        write_fit_csv(&path, &report(), 2).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 4);
        assert_eq!(lines[4], "4,5,,");
    }
}
