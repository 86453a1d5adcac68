//! Triage ranking over flagged records.
//!
//! Two independent sort toggles, applied as sequential stable sorts in a
//! fixed order: missing-count first, confidence second. The sequencing is a
//! behavior contract carried over from the original reviewer tool — when
//! both toggles are set, the confidence sort runs last and therefore becomes
//! the effective primary order, with the missing-count order surviving only
//! through ties. With neither toggle set, batch index order is preserved.

use crate::analyze::FlaggedRecord;

/// Ranking toggles. Both default off, which keeps index order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortToggles {
    /// Sort by missing-field count, descending.
    pub by_missing_count: bool,
    /// Sort by confidence, descending; records without a numeric confidence
    /// sort last.
    pub by_confidence: bool,
}

impl SortToggles {
    pub fn by_missing_count() -> Self {
        Self {
            by_missing_count: true,
            ..Self::default()
        }
    }

    pub fn by_confidence() -> Self {
        Self {
            by_confidence: true,
            ..Self::default()
        }
    }

    pub fn both() -> Self {
        Self {
            by_missing_count: true,
            by_confidence: true,
        }
    }
}

/// Order flagged records for reviewer attention.
///
/// Every sort is stable, so equal keys keep their relative batch order and
/// the output is deterministic for a given input.
pub fn rank(mut flagged: Vec<FlaggedRecord>, toggles: SortToggles) -> Vec<FlaggedRecord> {
    if toggles.by_missing_count {
        flagged.sort_by(|a, b| b.missing.len().cmp(&a.missing.len()));
    }
    if toggles.by_confidence {
        flagged.sort_by(|a, b| confidence_key(b).total_cmp(&confidence_key(a)));
    }
    flagged
}

/// Sort key: absent or non-numeric confidence ranks below every real score.
fn confidence_key(record: &FlaggedRecord) -> f64 {
    record.extraction.confidence().unwrap_or(f64::NEG_INFINITY)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
