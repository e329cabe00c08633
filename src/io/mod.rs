//! Input/output helpers.
//!
//! - matrix text files (`matrix_text`)
//! - points CSV ingest + validation (`points`)
//! - plotting CSV export (`export`)
//! - JSON report export (`report_json`)

pub mod export;
pub mod matrix_text;
pub mod points;
pub mod report_json;

pub use export::*;
pub use matrix_text::*;
pub use points::*;
pub use report_json::*;
