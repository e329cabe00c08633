//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - printed as terminal reports

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::LinalgError;

/// Storage order of a flat matrix buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Consecutive elements walk along a row.
    RowMajor,
    /// Consecutive elements walk down a column (BLAS/LAPACK order).
    ColMajor,
}

impl Layout {
    pub fn flipped(self) -> Layout {
        match self {
            Layout::RowMajor => Layout::ColMajor,
            Layout::ColMajor => Layout::RowMajor,
        }
    }
}

/// Which polynomial model to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// `y = a*x + b`
    Linear,
    /// `y = a*x^2 + b*x + c`
    Quadratic,
}

impl ModelKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Quadratic => "quadratic",
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            ModelKind::Linear => "y = a*x + b",
            ModelKind::Quadratic => "y = a*x^2 + b*x + c",
        }
    }

    /// Polynomial degree `d`.
    pub fn degree(self) -> usize {
        match self {
            ModelKind::Linear => 1,
            ModelKind::Quadratic => 2,
        }
    }

    /// Number of coefficients (`d + 1`).
    pub fn param_len(self) -> usize {
        self.degree() + 1
    }

    /// Normal equations for the line, QR for the parabola.
    pub fn default_method(self) -> SolveMethod {
        match self {
            ModelKind::Linear => SolveMethod::Normal,
            ModelKind::Quadratic => SolveMethod::Qr,
        }
    }
}

/// Least-squares solution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SolveMethod {
    /// Form `AᵗA θ = Aᵗy` and solve with LU + partial pivoting.
    Normal,
    /// Householder QR on the design matrix, without forming `AᵗA`.
    Qr,
}

impl SolveMethod {
    pub fn display_name(self) -> &'static str {
        match self {
            SolveMethod::Normal => "normal equations (LU)",
            SolveMethod::Qr => "Householder QR",
        }
    }
}

/// One observed sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

/// Ordered, immutable set of fitting samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    points: Vec<SamplePoint>,
}

impl SampleSet {
    /// Build a sample set; rejects empty input and non-finite coordinates.
    pub fn new(points: Vec<SamplePoint>) -> Result<Self, LinalgError> {
        if points.is_empty() {
            return Err(LinalgError::InvalidDimensions("sample set is empty".to_string()));
        }
        if let Some(i) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(LinalgError::InvalidArgument(format!("sample {i} is not finite")));
        }
        Ok(Self { points })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, LinalgError> {
        Self::new(pairs.iter().map(|&(x, y)| SamplePoint { x, y }).collect())
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// `(min x, max x)`.
    pub fn x_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)))
    }
}

/// A per-sample fitted value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitRow {
    pub x: f64,
    pub y: f64,
    pub y_hat: f64,
    /// `y_hat - y`
    pub residual: f64,
}

/// Fit output: coefficients plus fit quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub model: ModelKind,
    pub method: SolveMethod,
    /// Coefficients, highest power first.
    pub theta: Vec<f64>,
    pub rows: Vec<FitRow>,
    pub sse: f64,
    pub mse: f64,
}

/// `dla multiply` configuration.
#[derive(Debug, Clone)]
pub struct MultiplyConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// `dla fit` configuration.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Points CSV; the model's reference data set when absent.
    pub points_path: Option<PathBuf>,
    pub model: ModelKind,
    pub method: SolveMethod,

    pub export_csv: Option<PathBuf>,
    /// Number of grid points in the plotting CSV.
    pub grid_steps: usize,
    pub export_json: Option<PathBuf>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// Where `dla svd` takes its matrix from.
#[derive(Debug, Clone, PartialEq)]
pub enum SvdSource {
    Reference,
    File(PathBuf),
    Random { n: usize, seed: u64 },
}

/// `dla svd` configuration.
#[derive(Debug, Clone)]
pub struct SvdConfig {
    pub source: SvdSource,
    pub export_json: Option<PathBuf>,
}
