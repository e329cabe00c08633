//! Whitespace-separated matrix text format.
//!
//! `dla multiply` input:
//!
//! ```text
//! m n l
//! <m lines of n numbers>   A
//! <n lines of l numbers>   B
//! ```
//!
//! Single-matrix files (SVD input, multiply output) start with `rows cols`
//! followed by the rows. Line breaks are not significant; values are read as a
//! token stream in row-major order.

use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;

use log::warn;

use crate::domain::Matrix;
use crate::error::{AppError, LinalgError};

/// The two operands of a product.
#[derive(Debug, Clone)]
pub struct MultiplyInput {
    pub a: Matrix,
    pub b: Matrix,
}

/// Read and parse a `dla multiply` input file.
pub fn read_multiply_input(path: &Path) -> Result<MultiplyInput, AppError> {
    let text = read_text(path)?;
    parse_multiply_input(&text)
}

pub fn parse_multiply_input(text: &str) -> Result<MultiplyInput, AppError> {
    let mut tokens = text.split_whitespace();
    let dims = read_dims(&mut tokens, 3, "m n l")?;
    let (m, n, l) = (dims[0], dims[1], dims[2]);

    let a = read_values(&mut tokens, m, n, "A")?;
    let b = read_values(&mut tokens, n, l, "B")?;
    warn_trailing(&mut tokens);

    Ok(MultiplyInput {
        a: Matrix::from_row_major(m, n, a)?,
        b: Matrix::from_row_major(n, l, b)?,
    })
}

/// Read and parse a single-matrix file.
pub fn read_matrix_file(path: &Path) -> Result<Matrix, AppError> {
    let text = read_text(path)?;
    parse_matrix(&text)
}

pub fn parse_matrix(text: &str) -> Result<Matrix, AppError> {
    let mut tokens = text.split_whitespace();
    let dims = read_dims(&mut tokens, 2, "rows cols")?;
    let values = read_values(&mut tokens, dims[0], dims[1], "M")?;
    warn_trailing(&mut tokens);
    Ok(Matrix::from_row_major(dims[0], dims[1], values)?)
}

/// `rows cols` header, then one line per row.
///
/// Values use Rust's shortest round-trip representation, so reading the file
/// back yields bit-identical values.
pub fn format_matrix_text(m: &Matrix) -> String {
    let mut out = format!("{} {}\n", m.rows(), m.cols());
    for i in 0..m.rows() {
        let row: Vec<String> = (0..m.cols()).map(|j| format!("{}", m.get(i, j))).collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

pub fn write_matrix_file(path: &Path, m: &Matrix) -> Result<(), AppError> {
    fs::write(path, format_matrix_text(m))
        .map_err(|e| AppError::new(2, format!("Failed to write output file '{}': {e}", path.display())))
}

fn read_text(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input file '{}': {e}", path.display())))
}

fn read_dims(tokens: &mut SplitWhitespace<'_>, count: usize, expected: &str) -> Result<Vec<usize>, AppError> {
    let mut dims = Vec::with_capacity(count);
    for _ in 0..count {
        let value: i64 = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| AppError::new(2, format!("Invalid dimensions. Expected: {expected} (positive integers).")))?;
        if value <= 0 {
            return Err(LinalgError::InvalidDimensions(format!(
                "expected {expected} to be positive integers, got {value}"
            ))
            .into());
        }
        let value = usize::try_from(value)
            .map_err(|_| AppError::new(2, format!("Dimension {value} does not fit in memory.")))?;
        dims.push(value);
    }
    Ok(dims)
}

fn read_values(tokens: &mut SplitWhitespace<'_>, rows: usize, cols: usize, name: &str) -> Result<Vec<f64>, AppError> {
    let mut values = Vec::with_capacity(rows.saturating_mul(cols).min(1 << 20));
    for i in 0..rows {
        for j in 0..cols {
            let v = tokens
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or_else(|| AppError::new(2, format!("Failed to read matrix {name} at ({i},{j}).")))?;
            values.push(v);
        }
    }
    Ok(values)
}

fn warn_trailing(tokens: &mut SplitWhitespace<'_>) {
    let extra = tokens.count();
    if extra > 0 {
        warn!("ignoring {extra} trailing tokens after the last matrix");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiply_input() {
        let text = "2 3 1\n1 2 3\n4 5 6\n1\n0\n-1\n";
        let input = parse_multiply_input(text).unwrap();
        assert_eq!(input.a.shape(), (2, 3));
        assert_eq!(input.b.shape(), (3, 1));
        assert_eq!(input.a.get(1, 2), 6.0);
        assert_eq!(input.b.get(2, 0), -1.0);
    }

    #[test]
    fn non_positive_dims_are_invalid_dimensions() {
        let err = parse_multiply_input("2 0 1\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("InvalidDimensions"));
    }

    #[test]
    fn reports_position_of_missing_value() {
        let err = parse_multiply_input("2 2 2\n1 2\n3 4\n5 6\n7\n").unwrap_err();
        assert!(err.to_string().contains("matrix B at (1,1)"), "{err}");
        let err = parse_multiply_input("1 2 1\n1 x\n").unwrap_err();
        assert!(err.to_string().contains("matrix A at (0,1)"), "{err}");
    }

    #[test]
    fn garbled_header() {
        let err = parse_matrix("two 2\n").unwrap_err();
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn text_round_trip_is_exact() {
        let m = Matrix::from_row_major(2, 2, vec![0.1, -1.0 / 3.0, 1e-300, 12345.678]).unwrap();
        let text = format_matrix_text(&m);
        assert!(text.starts_with("2 2\n"));
        assert_eq!(parse_matrix(&text).unwrap(), m);
    }
}
