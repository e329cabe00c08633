//! Reference problems used by `dla` when no input file is given.

use crate::domain::{Matrix, ModelKind, SampleSet};
use crate::error::LinalgError;

/// Four points for the straight-line fit.
pub const LINEAR_POINTS: [(f64, f64); 4] = [(1.0, 2.0), (2.0, 2.0), (3.0, 4.0), (4.0, 5.0)];

/// Six points for the parabola fit.
pub const QUADRATIC_POINTS: [(f64, f64); 6] = [(0.0, 1.2), (1.0, 2.0), (2.0, 2.9), (3.0, 4.1), (4.0, 5.8), (5.0, 8.2)];

/// Reference sample set for `model`.
pub fn reference_points(model: ModelKind) -> Result<SampleSet, LinalgError> {
    match model {
        ModelKind::Linear => SampleSet::from_pairs(&LINEAR_POINTS),
        ModelKind::Quadratic => SampleSet::from_pairs(&QUADRATIC_POINTS),
    }
}

/// `[[1, -0.8], [0, 1]]`
pub fn reference_svd_matrix() -> Result<Matrix, LinalgError> {
    Matrix::from_row_major(2, 2, vec![1.0, -0.8, 0.0, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_sets_have_expected_sizes() {
        assert_eq!(reference_points(ModelKind::Linear).unwrap().len(), 4);
        assert_eq!(reference_points(ModelKind::Quadratic).unwrap().len(), 6);
        assert!(reference_svd_matrix().unwrap().is_square());
    }
}
