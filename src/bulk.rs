//! Bulk field edits over a selection.
//!
//! A deliberately destructive operation: the given value replaces whatever
//! each selected record held under the field, with no merging and no type
//! checking against the field's usual shape. Callers surface it as an
//! explicit "bulk set" so the overwrite reads as intended behavior.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use crate::store::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum BulkEditError {
    #[error("selection is empty")]
    EmptySelection,

    #[error("field name is blank")]
    InvalidField,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Set `field` to `value` on every selected record.
///
/// Returns the number of records mutated. Fails without touching any record
/// if the selection is empty, the field name is blank, or any selected index
/// is out of bounds.
pub fn apply_to_selection(
    store: &mut RecordStore,
    selection: &BTreeSet<usize>,
    field: &str,
    value: &Value,
) -> Result<usize, BulkEditError> {
    if selection.is_empty() {
        return Err(BulkEditError::EmptySelection);
    }
    if field.trim().is_empty() {
        return Err(BulkEditError::InvalidField);
    }
    if let Some(&max) = selection.iter().next_back() {
        // Validate up front so a bad index cannot leave a partial edit.
        store.get(max)?;
    }

    for &index in selection {
        store.get_mut(index)?.extraction.set(field, value.clone());
    }
    tracing::debug!(field, count = selection.len(), "bulk set applied");
    Ok(selection.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
