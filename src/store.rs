//! In-memory record store.
//!
//! Owns the ordered batch being reviewed plus the transient selection and
//! focus. Position is identity: the index a record loads at is how every
//! other component refers to it for the rest of the session. All mutations
//! go through the store; there is no ambient global — callers construct one
//! per reviewing session and thread it explicitly.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use crate::confidence::WeightTable;
use crate::model::{CONFIDENCE_FIELD, Extraction, Record};

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The loaded batch is not a sequence of `{text, extraction?}` objects.
    #[error("batch format error: {0}")]
    Format(String),

    /// A manual edit carried a confidence outside the contract.
    #[error("invalid confidence {found}: expected a finite number in [0, 1]")]
    Validation { found: String },

    #[error("record index {index} out of bounds for {len} records")]
    OutOfBounds { index: usize, len: usize },
}

/// The ordered record collection for one reviewing session.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    selection: BTreeSet<usize>,
    focus: Option<usize>,
    weights: WeightTable,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::with_weights(WeightTable::default())
    }

    /// A store scoring backfill with a custom weight table.
    pub fn with_weights(weights: WeightTable) -> Self {
        Self {
            records: Vec::new(),
            selection: BTreeSet::new(),
            focus: None,
            weights,
        }
    }

    /// Replace the whole collection from a parsed JSON batch.
    ///
    /// The batch must be a sequence of objects each carrying at least a
    /// `text` string; `extraction` may be absent or null (backfilled to an
    /// empty object). Confidence backfill runs over every record before the
    /// new batch becomes observable. Selection and focus reset.
    pub fn load_json(&mut self, batch: Value) -> Result<usize, StoreError> {
        let rows = match batch {
            Value::Array(rows) => rows,
            other => {
                return Err(StoreError::Format(format!(
                    "expected a sequence of records, got {}",
                    json_kind(&other)
                )));
            }
        };

        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let Value::Object(mut obj) = row else {
                return Err(StoreError::Format(format!(
                    "record {i} is not an object"
                )));
            };
            let text = match obj.remove("text") {
                Some(Value::String(text)) => text,
                Some(_) => {
                    return Err(StoreError::Format(format!(
                        "record {i} has a non-string text field"
                    )));
                }
                None => {
                    return Err(StoreError::Format(format!(
                        "record {i} is missing its text field"
                    )));
                }
            };
            let extraction = match obj.remove("extraction") {
                None | Some(Value::Null) => Extraction::new(),
                Some(Value::Object(map)) => Extraction::from(map),
                Some(other) => {
                    return Err(StoreError::Format(format!(
                        "record {i} extraction is {}, expected an object",
                        json_kind(&other)
                    )));
                }
            };
            records.push(Record::new(text, extraction));
        }

        self.load(records);
        Ok(self.records.len())
    }

    /// Replace the whole collection with already-typed records.
    ///
    /// Same backfill and reset semantics as [`RecordStore::load_json`].
    pub fn load(&mut self, records: Vec<Record>) {
        self.records = records;
        self.selection.clear();
        self.focus = None;

        let mut backfilled = 0usize;
        for record in &mut self.records {
            if self.weights.backfill(&mut record.extraction) {
                backfilled += 1;
            }
        }
        tracing::debug!(
            records = self.records.len(),
            backfilled,
            "loaded record batch"
        );
    }

    pub fn get(&self, index: usize) -> Result<&Record, StoreError> {
        self.records.get(index).ok_or(StoreError::OutOfBounds {
            index,
            len: self.records.len(),
        })
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Result<&mut Record, StoreError> {
        let len = self.records.len();
        self.records
            .get_mut(index)
            .ok_or(StoreError::OutOfBounds { index, len })
    }

    /// Replace one record's extraction.
    ///
    /// Rejects a `confidence` that is present but not a finite number in
    /// `[0, 1]` — manual edits are never clamped, unlike load-time backfill.
    pub fn set_extraction(
        &mut self,
        index: usize,
        extraction: Extraction,
    ) -> Result<(), StoreError> {
        if let Some(value) = extraction.get(CONFIDENCE_FIELD) {
            let valid = value
                .as_f64()
                .is_some_and(|c| c.is_finite() && (0.0..=1.0).contains(&c));
            if !valid {
                return Err(StoreError::Validation {
                    found: value.to_string(),
                });
            }
        }
        let record = self.get_mut(index)?;
        record.extraction = extraction;
        tracing::debug!(index, "replaced extraction");
        Ok(())
    }

    /// The full ordered sequence, for export.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // -- selection / focus ---------------------------------------------------

    pub fn select(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.selection.insert(index);
        Ok(())
    }

    pub fn deselect(&mut self, index: usize) {
        self.selection.remove(&index);
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, StoreError> {
        self.check_index(index)?;
        if self.selection.remove(&index) {
            Ok(false)
        } else {
            self.selection.insert(index);
            Ok(true)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    pub fn set_focus(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.focus = Some(index);
        Ok(())
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(StoreError::OutOfBounds {
                index,
                len: self.records.len(),
            })
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
