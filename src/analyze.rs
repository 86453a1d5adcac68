//! Missing-field analysis and record flagging.
//!
//! Pure functions: given an extraction and a reviewer-chosen field set,
//! report which of those fields are missing (absent, null, or an empty
//! sequence). Output order is the caller's field order, not the extraction's
//! insertion order, so the same request against different records lines up
//! column-for-column.

use crate::model::{Extraction, Record};

/// One flagged record: the triage unit handed to the ranker and exporter.
#[derive(Debug, Clone)]
pub struct FlaggedRecord {
    /// Position in the loaded batch — the record's identity.
    pub index: usize,
    pub text: String,
    pub extraction: Extraction,
    /// Missing fields, in requested order. Never empty.
    pub missing: Vec<String>,
}

/// Which of `requested` are missing from `extraction`, in `requested` order.
pub fn missing_fields(extraction: &Extraction, requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|field| extraction.is_missing(field))
        .cloned()
        .collect()
}

/// Flag every record missing at least one requested field.
///
/// Unflagged records are excluded entirely — a record never appears with an
/// empty missing list.
pub fn flag_records(records: &[Record], requested: &[String]) -> Vec<FlaggedRecord> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let missing = missing_fields(&record.extraction, requested);
            if missing.is_empty() {
                None
            } else {
                Some(FlaggedRecord {
                    index,
                    text: record.text.clone(),
                    extraction: record.extraction.clone(),
                    missing,
                })
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
