//! Dense matrix stored as a flat buffer with a declared layout.
//!
//! A `Matrix` never mixes layouts: element `(i, j)` lives at `i * cols + j` for
//! row-major buffers and at `j * rows + i` for column-major buffers. The numerical
//! routines in `crate::math` work in column-major internally and hand results back
//! in row-major, so callers can stay with the "one row per line" mental model.

use std::borrow::Cow;

use nalgebra::DMatrix;
use serde::Serialize;

use crate::domain::Layout;
use crate::error::LinalgError;
use crate::math::layout::{col_to_row, ensure_shape, row_to_col};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    layout: Layout,
    data: Vec<f64>,
}

impl Matrix {
    /// Wrap a buffer, validating `rows, cols > 0` and `data.len() == rows * cols`.
    pub fn new(rows: usize, cols: usize, layout: Layout, data: Vec<f64>) -> Result<Self, LinalgError> {
        ensure_shape(rows, cols, data.len())?;
        Ok(Self {
            rows,
            cols,
            layout,
            data,
        })
    }

    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, LinalgError> {
        Self::new(rows, cols, Layout::RowMajor, data)
    }

    pub fn from_col_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, LinalgError> {
        Self::new(rows, cols, Layout::ColMajor, data)
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Self, LinalgError> {
        Self::from_row_major(rows, cols, vec![0.0; rows.saturating_mul(cols)])
    }

    pub fn identity(n: usize) -> Result<Self, LinalgError> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    /// Square matrix with `values` on the diagonal.
    pub fn diagonal(values: &[f64]) -> Result<Self, LinalgError> {
        let n = values.len();
        let mut m = Self::zeros(n, n)?;
        for (i, &v) in values.iter().enumerate() {
            m.data[i * n + i] = v;
        }
        Ok(m)
    }

    /// `values.len() × 1` matrix.
    pub fn column_vector(values: &[f64]) -> Result<Self, LinalgError> {
        Self::from_row_major(values.len(), 1, values.to_vec())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Raw buffer in the declared layout.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Element `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i >= rows` or `j >= cols`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds for {}x{}", self.rows, self.cols);
        match self.layout {
            Layout::RowMajor => self.data[i * self.cols + j],
            Layout::ColMajor => self.data[j * self.rows + i],
        }
    }

    /// Row-major view of the buffer (borrowed when no conversion is needed).
    pub fn row_major_data(&self) -> Cow<'_, [f64]> {
        match self.layout {
            Layout::RowMajor => Cow::Borrowed(&self.data),
            Layout::ColMajor => Cow::Owned(col_to_row(&self.data, self.rows, self.cols)),
        }
    }

    /// Column-major view of the buffer (borrowed when no conversion is needed).
    pub fn col_major_data(&self) -> Cow<'_, [f64]> {
        match self.layout {
            Layout::ColMajor => Cow::Borrowed(&self.data),
            Layout::RowMajor => Cow::Owned(row_to_col(&self.data, self.rows, self.cols)),
        }
    }

    /// Same logical matrix, stored in `layout`.
    pub fn to_layout(&self, layout: Layout) -> Matrix {
        if layout == self.layout {
            return self.clone();
        }
        let data = match layout {
            Layout::RowMajor => self.row_major_data().into_owned(),
            Layout::ColMajor => self.col_major_data().into_owned(),
        };
        Matrix {
            rows: self.rows,
            cols: self.cols,
            layout,
            data,
        }
    }

    /// Transpose without moving data.
    ///
    /// A row-major `r×c` buffer is exactly the column-major buffer of the `c×r`
    /// transpose, so only the shape and the layout tag change.
    pub fn transpose(&self) -> Matrix {
        Matrix {
            rows: self.cols,
            cols: self.rows,
            layout: self.layout.flipped(),
            data: self.data.clone(),
        }
    }

    /// Element-wise `max |self - other|`.
    pub fn max_abs_diff(&self, other: &Matrix) -> Result<f64, LinalgError> {
        if self.shape() != other.shape() {
            return Err(LinalgError::InvalidDimensions(format!(
                "cannot compare {}x{} with {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let lhs = self.row_major_data();
        let rhs = other.row_major_data();
        Ok(lhs
            .iter()
            .zip(rhs.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }

    /// Convert from a nalgebra matrix (column-major storage on both sides).
    pub fn from_dmatrix(m: &DMatrix<f64>) -> Result<Self, LinalgError> {
        Self::from_col_major(m.nrows(), m.ncols(), m.as_slice().to_vec())
    }
}

impl From<&Matrix> for DMatrix<f64> {
    fn from(m: &Matrix) -> Self {
        DMatrix::from_column_slice(m.rows, m.cols, &m.col_major_data())
    }
}
