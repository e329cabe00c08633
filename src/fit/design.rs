//! Design matrix construction.

use crate::domain::{Matrix, SampleSet};
use crate::error::LinalgError;
use crate::models::fill_design_row;

/// `m×(d+1)` design matrix: row `i` is `[x_i^d, ..., x_i, 1]`.
pub fn design_matrix(samples: &SampleSet, degree: usize) -> Result<Matrix, LinalgError> {
    let cols = degree + 1;
    let mut data = vec![0.0; samples.len() * cols];
    for (row, p) in data.chunks_mut(cols).zip(samples.points()) {
        fill_design_row(p.x, row);
    }
    Matrix::from_row_major(samples.len(), cols, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_design_columns() {
        let s = SampleSet::from_pairs(&[(0.0, 1.0), (2.0, 3.0), (-1.0, 0.0)]).unwrap();
        let a = design_matrix(&s, 2).unwrap();
        assert_eq!(a.shape(), (3, 3));
        assert_eq!(a.row_major_data().as_ref(), &[0.0, 0.0, 1.0, 4.0, 2.0, 1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn last_column_is_constant() {
        let s = SampleSet::from_pairs(&[(5.0, 0.0), (7.0, 0.0)]).unwrap();
        let a = design_matrix(&s, 1).unwrap();
        assert_eq!(a.get(0, 1), 1.0);
        assert_eq!(a.get(1, 1), 1.0);
        assert_eq!(a.get(1, 0), 7.0);
    }
}
