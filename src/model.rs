//! Record and extraction model.
//!
//! A [`Record`] is one reviewable unit: immutable source text plus the
//! structured [`Extraction`] attached to it by the upstream extractor.
//! Extractions are open field maps — scalars, sequences, and nested objects
//! all occur in real reports — so values stay as [`serde_json::Value`] and
//! presence is classified structurally via [`Presence`] instead of probing
//! runtime types at each call site.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved extraction field holding the quality score in `[0, 1]`.
pub const CONFIDENCE_FIELD: &str = "confidence";

/// One reviewable unit: source text plus its extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    #[serde(default)]
    pub extraction: Extraction,
}

impl Record {
    pub fn new(text: impl Into<String>, extraction: Extraction) -> Self {
        Self {
            text: text.into(),
            extraction,
        }
    }
}

/// Structural classification of an extraction field.
///
/// A field counts as missing iff it is `Absent`, `Null`, or `EmptySequence`.
/// Everything else — including `0`, `false`, and `""` — is `Present`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Absent,
    Null,
    EmptySequence,
    Present,
}

/// The field map attached to a record.
///
/// Serializes transparently as a plain JSON object, so full-batch exports
/// round-trip byte-compatible with upstream reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extraction(Map<String, Value>);

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, overwriting any existing value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Classify a field structurally.
    pub fn presence(&self, field: &str) -> Presence {
        match self.0.get(field) {
            None => Presence::Absent,
            Some(Value::Null) => Presence::Null,
            Some(Value::Array(items)) if items.is_empty() => Presence::EmptySequence,
            Some(_) => Presence::Present,
        }
    }

    /// True iff the field is absent, null, or an empty sequence.
    pub fn is_missing(&self, field: &str) -> bool {
        self.presence(field) != Presence::Present
    }

    /// The confidence score, when present and numeric.
    ///
    /// Non-numeric values under the reserved key are treated as unset here;
    /// the edit boundary ([`crate::store::RecordStore::set_extraction`])
    /// rejects them before they can be stored.
    pub fn confidence(&self) -> Option<f64> {
        self.0
            .get(CONFIDENCE_FIELD)
            .and_then(Value::as_f64)
            .filter(|c| c.is_finite())
    }

    pub fn set_confidence(&mut self, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.0.insert(CONFIDENCE_FIELD.to_string(), Value::Number(n));
        }
    }
}

impl From<Map<String, Value>> for Extraction {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extraction(value: Value) -> Extraction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn presence_classification() {
        let e = extraction(json!({
            "a": [],
            "b": 0,
            "c": null,
            "d": "",
            "e": false,
            "f": ["x"],
        }));
        assert_eq!(e.presence("a"), Presence::EmptySequence);
        assert_eq!(e.presence("b"), Presence::Present);
        assert_eq!(e.presence("c"), Presence::Null);
        assert_eq!(e.presence("d"), Presence::Present);
        assert_eq!(e.presence("e"), Presence::Present);
        assert_eq!(e.presence("f"), Presence::Present);
        assert_eq!(e.presence("missing"), Presence::Absent);
    }

    #[test]
    fn zero_and_false_are_present() {
        let e = extraction(json!({"fs": 0, "flag": false}));
        assert!(!e.is_missing("fs"));
        assert!(!e.is_missing("flag"));
    }

    #[test]
    fn confidence_reads_only_finite_numbers() {
        let e = extraction(json!({"confidence": 0.55}));
        assert_eq!(e.confidence(), Some(0.55));

        let e = extraction(json!({"confidence": "high"}));
        assert_eq!(e.confidence(), None);

        let e = extraction(json!({}));
        assert_eq!(e.confidence(), None);
    }

    #[test]
    fn set_overwrites() {
        let mut e = extraction(json!({"fs": 500}));
        e.set("fs", json!(1000));
        assert_eq!(e.get("fs"), Some(&json!(1000)));
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = Record::new(
            "Sampling rate was 2048Hz.",
            extraction(json!({"fs": 2048, "methods": ["ICA"]})),
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();

        assert_eq!(back, record);
    }

    #[test]
    fn record_extraction_defaults_to_empty() {
        let record: Record = serde_json::from_str(r#"{"text": "bare"}"#).unwrap();
        assert!(record.extraction.is_empty());
    }
}
