//! Export of record batches and triage subsets.
//!
//! Two families of output:
//! - full-batch exports (JSON, and a `text,extraction` CSV dump with the
//!   extraction flattened to a JSON column) that round-trip back through
//!   [`crate::store::RecordStore::load_json`];
//! - triage CSVs over flagged records, one row per record, with the missing
//!   fields `;`-joined.
//!
//! Text columns are escaped by doubling embedded quote characters and
//! wrapping the field in quotes, so output stays re-parseable whatever the
//! source text contains.

use crate::analyze::FlaggedRecord;
use crate::model::Record;

/// Which triage CSV shape to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageVariant {
    /// `index,text,missing_fields`
    Basic,
    /// `index,text,missing_fields,confidence` — confidence blank when the
    /// record has no numeric score.
    Preview,
}

/// Pretty-printed JSON of the whole batch, load-compatible.
pub fn full_batch_json(records: &[Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// `text,extraction` CSV of the whole batch, extraction as a compact JSON
/// column.
pub fn full_batch_csv(records: &[Record]) -> serde_json::Result<String> {
    let mut lines = vec!["text,extraction".to_string()];
    for record in records {
        let extraction = serde_json::to_string(&record.extraction)?;
        lines.push(format!(
            "{},{}",
            csv_field(&record.text),
            csv_field(&extraction)
        ));
    }
    Ok(lines.join("\n"))
}

/// Triage CSV over flagged records. Top-N capping is the caller's job —
/// pass the slice already truncated.
pub fn triage_csv(items: &[FlaggedRecord], variant: TriageVariant) -> String {
    let header = match variant {
        TriageVariant::Basic => "index,text,missing_fields",
        TriageVariant::Preview => "index,text,missing_fields,confidence",
    };
    let mut lines = vec![header.to_string()];
    for item in items {
        let mut line = format!(
            "{},{},{}",
            item.index,
            csv_field(&item.text),
            csv_field(&item.missing.join(";"))
        );
        if variant == TriageVariant::Preview {
            match item.extraction.confidence() {
                Some(c) => line.push_str(&format!(",{c}")),
                None => line.push(','),
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Quote a field: double embedded quote characters, wrap in quotes.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
