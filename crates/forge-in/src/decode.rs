//! Row decoding for uploaded files.
//!
//! Produces the loosely-typed rows the rest of the pipeline consumes. Only
//! text formats are handled here; spreadsheet binaries are decoded upstream.

use forge_core::{ForgeError, RawRow, RawValue};
use thiserror::Error;
use tracing::warn;

/// Errors that abort ingestion of one file
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported file format: {0}. Please use CSV or JSON files.")]
    UnsupportedFormat(String),
    #[error("No data found in the file.")]
    Empty,
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DecodeError> for ForgeError {
    fn from(err: DecodeError) -> Self {
        ForgeError::DecodeError(err.to_string())
    }
}

/// Decode a JSON array of row objects.
pub fn decode_json_rows(text: &str) -> Result<Vec<RawRow>, DecodeError> {
    let rows: Vec<RawRow> = serde_json::from_str(text)?;
    if rows.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(rows)
}

/// Decode CSV text with a header row. Every cell arrives as text; blank
/// lines are skipped and cells are trimmed.
pub fn decode_csv_rows(text: &str) -> Result<Vec<RawRow>, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let cell = record.get(i).unwrap_or("");
                (header.to_string(), RawValue::Text(cell.to_string()))
            })
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(rows)
}

/// Pick a decoder from the file name's extension.
pub fn decode_by_extension(file_name: &str, text: &str) -> Result<Vec<RawRow>, DecodeError> {
    let lower = file_name.to_lowercase();
    let result = if lower.ends_with(".csv") {
        decode_csv_rows(text)
    } else if lower.ends_with(".json") {
        decode_json_rows(text)
    } else {
        Err(DecodeError::UnsupportedFormat(file_name.to_string()))
    };

    if let Err(err) = &result {
        warn!(file = file_name, error = %err, "decode failed");
    }
    result
}
