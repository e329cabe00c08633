//! Points CSV ingest.
//!
//! Expected schema: a header row with `x` and `y` columns (any order, case
//! insensitive, extra columns ignored), then one sample per row. Rows that fail
//! to parse are skipped and reported rather than aborting the whole file.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{SamplePoint, SampleSet};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: samples + rows that were skipped.
#[derive(Debug, Clone)]
pub struct IngestedPoints {
    pub samples: SampleSet,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load samples from a CSV file.
pub fn load_points(path: &Path) -> Result<IngestedPoints, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open points CSV '{}': {e}", path.display())))?;
    parse_points(file)
}

/// Parse samples from any CSV reader.
pub fn parse_points<R: Read>(input: R) -> Result<IngestedPoints, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let (x_idx, y_idx) = match (header_map.get("x"), header_map.get("y")) {
        (Some(&x), Some(&y)) => (x, y),
        _ => return Err(AppError::new(2, "Points CSV needs `x` and `y` columns.")),
    };

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, x_idx, y_idx));
        match parsed {
            Ok(p) => points.push(p),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if points.is_empty() {
        return Err(AppError::new(3, "No data points to fit."));
    }

    Ok(IngestedPoints {
        samples: SampleSet::new(points)?,
        row_errors,
        rows_read,
    })
}

fn parse_row(record: &StringRecord, x_idx: usize, y_idx: usize) -> Result<SamplePoint, String> {
    let x = parse_field(record, x_idx, "x")?;
    let y = parse_field(record, y_idx, "y")?;
    Ok(SamplePoint { x, y })
}

fn parse_field(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record.get(idx).ok_or_else(|| format!("missing `{name}`"))?;
    let value: f64 = raw.parse().map_err(|_| format!("`{name}` is not a number: {raw:?}"))?;
    if !value.is_finite() {
        return Err(format!("`{name}` must be finite"));
    }
    Ok(value)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase(), idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_columns_in_any_order() {
        let csv = "label,Y,X\na,2,1\nb,2,2\nc,4,3\n";
        let ingested = parse_points(csv.as_bytes()).unwrap();
        assert_eq!(ingested.samples.xs(), vec![1.0, 2.0, 3.0]);
        assert_eq!(ingested.samples.ys(), vec![2.0, 2.0, 4.0]);
        assert!(ingested.row_errors.is_empty());
    }

    #[test]
    fn skips_bad_rows_with_line_numbers() {
        let csv = "x,y\n1,2\nfoo,3\n2,inf\n3,4\n";
        let ingested = parse_points(csv.as_bytes()).unwrap();
        assert_eq!(ingested.samples.len(), 2);
        assert_eq!(ingested.rows_read, 4);
        let lines: Vec<usize> = ingested.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn missing_columns_and_empty_files() {
        assert_eq!(parse_points("a,b\n1,2\n".as_bytes()).unwrap_err().exit_code(), 2);
        assert_eq!(parse_points("x,y\n".as_bytes()).unwrap_err().exit_code(), 3);
    }
}
