//! Canonical records to CSV
//!
//! Canonical columns first, then pass-through columns in first-seen order.
//! Every cell is quoted and lines end in CRLF.

use crate::ExportError;
use forge_in::coerce::to_text_field;
use forge_in::CanonicalRecord;
use indexmap::IndexSet;

pub fn entities_to_csv<T: CanonicalRecord>(records: &[T]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let extra_columns: IndexSet<&str> = records
        .iter()
        .flat_map(|record| record.extra().keys())
        .map(String::as_str)
        .filter(|column| !T::COLUMNS.contains(column))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(T::COLUMNS.iter().copied().chain(extra_columns.iter().copied()))?;

    for record in records {
        let mut row = record.cells();
        row.extend(extra_columns.iter().map(|column| {
            record
                .extra()
                .get(*column)
                .map(to_text_field)
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Encoding(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::Encoding(err.to_string()))
}
