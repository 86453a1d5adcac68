//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

/// Write a JSON batch to `<dir>/<name>` and return its path.
pub fn write_report(dir: &Path, name: &str, batch: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(batch).unwrap()).unwrap();
    path
}

/// The reference backfill scenario: one record with every scored field, one
/// with none, one with only `fs`. Expected confidences 1.0 / 0.0 / 0.3.
pub fn backfill_batch() -> Value {
    json!([
        {
            "text": "We used Welch's method with a bandpass of 1-40 Hz.",
            "extraction": {
                "fs": 1000,
                "data_path": "data/subject1/session1.csv",
                "methods": ["Welch"],
                "bandpass": [1, 40],
                "filters": [{"type": "bandpass", "low": 1, "high": 40}],
            },
        },
        {
            "text": "Power spectra were computed after filtering.",
            "extraction": {},
        },
        {
            "text": "Sampling rate was 2048Hz.",
            "extraction": {"fs": 2048},
        },
    ])
}
