//! Confidence estimation for extraction records.
//!
//! A deterministic weighted-presence heuristic: each field in the
//! [`WeightTable`] contributes its weight when present-and-non-empty, the sum
//! is clamped to 1.0 and rounded to 3 decimal places. Applied only as a
//! backfill — an explicit confidence value, wherever it came from, is never
//! overwritten.

use crate::model::{CONFIDENCE_FIELD, Extraction};
use serde_json::Value;

/// Configurable `{field: weight}` table driving [`WeightTable::estimate`].
///
/// Order is irrelevant to the score; it is kept for readable debug output.
#[derive(Debug, Clone)]
pub struct WeightTable {
    weights: Vec<(String, f64)>,
}

impl Default for WeightTable {
    /// The reference table for extractor reports. Sums to 1.0 for this field
    /// set; [`WeightTable::estimate`] clamps anyway so a larger table stays
    /// within bounds.
    fn default() -> Self {
        Self::new([
            ("fs", 0.30),
            ("data_path", 0.25),
            ("methods", 0.20),
            ("bandpass", 0.15),
            ("filters", 0.10),
        ])
    }
}

impl WeightTable {
    pub fn new<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            weights: weights
                .into_iter()
                .map(|(field, w)| (field.into(), w))
                .collect(),
        }
    }

    /// The fields this table scores, in table order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.weights.iter().map(|(field, _)| field.as_str())
    }

    /// Score an extraction in `[0, 1]`.
    ///
    /// Monotonic in field presence: adding a previously-missing table field
    /// never lowers the score, and the clamp keeps 1.0 a hard upper bound.
    pub fn estimate(&self, extraction: &Extraction) -> f64 {
        let mut score = 0.0;
        for (field, weight) in &self.weights {
            if !extraction.is_missing(field) {
                score += weight;
            }
        }
        round3(score.min(1.0))
    }

    /// Fill in `confidence` when absent or null. Returns true when a score
    /// was written.
    pub fn backfill(&self, extraction: &mut Extraction) -> bool {
        match extraction.get(CONFIDENCE_FIELD) {
            None | Some(Value::Null) => {
                extraction.set_confidence(self.estimate(extraction));
                true
            }
            Some(_) => false,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
