//! Row-major <-> column-major conversion.
//!
//! Every routine in `crate::math` works on column-major buffers (the order the
//! classic BLAS/LAPACK kernels expect). Callers describe problems row by row, so
//! the conversion sits at that boundary and nowhere else.

use crate::error::LinalgError;

/// Validate `rows, cols > 0` and `len == rows * cols`.
pub fn ensure_shape(rows: usize, cols: usize, len: usize) -> Result<(), LinalgError> {
    if rows == 0 || cols == 0 {
        return Err(LinalgError::InvalidDimensions(format!(
            "rows and cols must be positive (got {rows}x{cols})"
        )));
    }
    match rows.checked_mul(cols) {
        Some(expected) if expected == len => Ok(()),
        Some(expected) => Err(LinalgError::InvalidDimensions(format!(
            "buffer holds {len} values, {rows}x{cols} needs {expected}"
        ))),
        None => Err(LinalgError::InvalidDimensions(format!("{rows}x{cols} overflows"))),
    }
}

/// Row-major `rows×cols` buffer to column-major.
pub fn to_column_major(data: &[f64], rows: usize, cols: usize) -> Result<Vec<f64>, LinalgError> {
    ensure_shape(rows, cols, data.len())?;
    Ok(row_to_col(data, rows, cols))
}

/// Column-major `rows×cols` buffer to row-major.
pub fn to_row_major(data: &[f64], rows: usize, cols: usize) -> Result<Vec<f64>, LinalgError> {
    ensure_shape(rows, cols, data.len())?;
    Ok(col_to_row(data, rows, cols))
}

/// Unchecked core of [`to_column_major`]; the shape must already be valid.
pub(crate) fn row_to_col(rm: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    let mut cm = vec![0.0; rm.len()];
    for i in 0..rows {
        for j in 0..cols {
            cm[j * rows + i] = rm[i * cols + j];
        }
    }
    cm
}

/// Unchecked core of [`to_row_major`]; the shape must already be valid.
pub(crate) fn col_to_row(cm: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    let mut rm = vec![0.0; cm.len()];
    for i in 0..rows {
        for j in 0..cols {
            rm[i * cols + j] = cm[j * rows + i];
        }
    }
    rm
}
