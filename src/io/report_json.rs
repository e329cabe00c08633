//! JSON report export.
//!
//! Every report is wrapped in a small envelope so files are self-describing:
//!
//! ```json
//! { "tool": "dla", "generated_at": "2024-01-01T00:00:00+00:00", "report": { ... } }
//! ```

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct ReportFile<'a, T: Serialize> {
    pub tool: &'static str,
    pub generated_at: DateTime<Utc>,
    pub report: &'a T,
}

impl<'a, T: Serialize> ReportFile<'a, T> {
    pub fn new(report: &'a T) -> Self {
        Self {
            tool: "dla",
            generated_at: Utc::now(),
            report,
        }
    }
}

/// Write `report` as pretty-printed JSON.
pub fn write_report_json<T: Serialize>(path: &Path, report: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &ReportFile::new(report))
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}
