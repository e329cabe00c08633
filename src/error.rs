//! Error types.
//!
//! Two layers:
//! - [`LinalgError`]: what the numerical core reports. Each variant is a distinct
//!   failure kind so callers can react differently (fix collinear samples vs.
//!   supply a square matrix, ...).
//! - [`AppError`]: what the `dla` binary reports. Carries a process exit code.

/// Failure kinds of the numerical core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinalgError {
    /// Non-positive or inconsistent shape parameters.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Inner dimensions of a product do not agree.
    #[error("dimension mismatch: left operand has {left_cols} columns, right operand has {right_rows} rows")]
    DimensionMismatch { left_cols: usize, right_rows: usize },

    /// LU factorization hit a (numerically) zero pivot.
    #[error("singular system: zero pivot at column {pivot}")]
    SingularSystem { pivot: usize },

    /// Least-squares design matrix lacks full column rank.
    #[error("rank deficient design matrix: rank {rank} < {cols} columns")]
    RankDeficient { rank: usize, cols: usize },

    /// Jacobi SVD did not converge within its sweep budget.
    #[error("SVD failed to converge after {sweeps} sweeps")]
    ConvergenceFailure { sweeps: usize },

    /// Buffer-size or value preconditions violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl LinalgError {
    /// Short stable name of the failure kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            LinalgError::InvalidDimensions(_) => "InvalidDimensions",
            LinalgError::DimensionMismatch { .. } => "DimensionMismatch",
            LinalgError::SingularSystem { .. } => "SingularSystem",
            LinalgError::RankDeficient { .. } => "RankDeficient",
            LinalgError::ConvergenceFailure { .. } => "ConvergenceFailure",
            LinalgError::InvalidArgument(_) => "InvalidArgument",
        }
    }

    /// Exit code used when this error reaches the binary.
    ///
    /// Shape/argument problems are input errors (2); the rest are numerical (4).
    pub fn exit_code(&self) -> u8 {
        match self {
            LinalgError::InvalidDimensions(_)
            | LinalgError::DimensionMismatch { .. }
            | LinalgError::InvalidArgument(_) => 2,
            LinalgError::SingularSystem { .. }
            | LinalgError::RankDeficient { .. }
            | LinalgError::ConvergenceFailure { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<LinalgError> for AppError {
    fn from(err: LinalgError) -> Self {
        AppError::new(err.exit_code(), format!("Error ({}): {err}", err.kind_name()))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
