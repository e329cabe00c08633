//! Shared subcommand workflows.
//!
//! Each `run_*` takes a config, does all the work, and returns the computed
//! outputs without printing, so the front-end only deals with presentation:
//!
//! - multiply: read input -> GEMM -> write C
//! - fit: load samples -> fit -> optional exports
//! - svd: load/generate matrix -> SVD -> reconstruction check -> optional export

use log::{debug, warn};

use crate::data::{random_square, reference_points, reference_svd_matrix};
use crate::domain::{FitConfig, FitReport, Matrix, MultiplyConfig, SampleSet, SvdConfig, SvdSource};
use crate::error::AppError;
use crate::fit::fit;
use crate::io::{RowError, load_points, read_matrix_file, read_multiply_input, write_fit_csv, write_matrix_file, write_report_json};
use crate::math::{SvdReport, multiply, svd_with_reconstruction};

/// Outputs of `dla multiply`.
#[derive(Debug, Clone)]
pub struct MultiplyOutput {
    pub product: Matrix,
}

/// Outputs of `dla fit`.
#[derive(Debug, Clone)]
pub struct FitOutput {
    pub report: FitReport,
    /// Rows skipped while reading the points CSV.
    pub row_errors: Vec<RowError>,
    /// Data rows read from the points CSV (0 for built-in data).
    pub rows_read: usize,
}

pub fn run_multiply(config: &MultiplyConfig) -> Result<MultiplyOutput, AppError> {
    let input = read_multiply_input(&config.input)?;
    // The output file is only created once the product exists.
    let product = multiply(&input.a, &input.b)?;
    write_matrix_file(&config.output, &product)?;
    Ok(MultiplyOutput { product })
}

pub fn run_fit(config: &FitConfig) -> Result<FitOutput, AppError> {
    let (samples, row_errors, rows_read) = load_samples(config)?;
    for e in &row_errors {
        warn!("skipping points CSV line {}: {}", e.line, e.message);
    }

    let report = fit(&samples, config.model, config.method)?;
    debug!("fit theta = {:?}, sse = {:e}", report.theta, report.sse);

    if let Some(path) = &config.export_csv {
        write_fit_csv(path, &report, config.grid_steps)?;
    }
    if let Some(path) = &config.export_json {
        write_report_json(path, &report)?;
    }

    Ok(FitOutput {
        report,
        row_errors,
        rows_read,
    })
}

pub fn run_svd(config: &SvdConfig) -> Result<SvdReport, AppError> {
    let a = match &config.source {
        SvdSource::Reference => reference_svd_matrix()?,
        SvdSource::File(path) => read_matrix_file(path)?,
        SvdSource::Random { n, seed } => random_square(*n, *seed)?,
    };

    let report = svd_with_reconstruction(&a)?;
    debug!("svd converged after {} sweeps", report.svd.sweeps);

    if let Some(path) = &config.export_json {
        write_report_json(path, &report)?;
    }
    Ok(report)
}

fn load_samples(config: &FitConfig) -> Result<(SampleSet, Vec<RowError>, usize), AppError> {
    match &config.points_path {
        Some(path) => {
            let ingested = load_points(path)?;
            Ok((ingested.samples, ingested.row_errors, ingested.rows_read))
        }
        None => Ok((reference_points(config.model)?, Vec::new(), 0)),
    }
}
