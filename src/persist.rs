//! Report persistence: save-with-backup, backup listing and retrieval.
//!
//! The core never touches the filesystem on its own; this collaborator
//! implements the save contract over a local report file. Every save writes
//! a timestamped backup before rewriting the main report, so a bad edit
//! session is always one file-copy away from recovery. Backups live in a
//! sibling `<stem>_backups/` directory and are named
//! `<stem>_<UTC %Y%m%d_%H%M%SZ>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::model::Record;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The name is not one of this report's backups.
    #[error("unknown backup '{0}'")]
    UnknownBackup(String),
}

/// Persistence handle for one report file.
#[derive(Debug, Clone)]
pub struct ReportStore {
    report_path: PathBuf,
    stem: String,
    backup_dir: PathBuf,
}

impl ReportStore {
    pub fn new(report_path: impl Into<PathBuf>) -> Self {
        let report_path = report_path.into();
        let stem = report_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let backup_dir = report_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{stem}_backups"));
        Self {
            report_path,
            stem,
            backup_dir,
        }
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Write a timestamped backup, then rewrite the main report.
    ///
    /// Returns the backup file name. Backup resolution is one second;
    /// saves within the same second reuse the same backup file, matching
    /// the original tool.
    pub fn save(&self, records: &[Record]) -> Result<String, PersistError> {
        let body = serde_json::to_string_pretty(records)?;

        fs::create_dir_all(&self.backup_dir)?;
        let timestamp = Utc::now().format("%Y%m%d_%H%M%SZ");
        let backup_name = format!("{}_{timestamp}.json", self.stem);
        fs::write(self.backup_dir.join(&backup_name), &body)?;

        if let Some(parent) = self.report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.report_path, &body)?;

        tracing::info!(
            report = %self.report_path.display(),
            backup = %backup_name,
            records = records.len(),
            "saved report"
        );
        Ok(backup_name)
    }

    /// Backup names for this report, newest first.
    ///
    /// Reverse-lexicographic order, which the timestamp format makes
    /// chronological. A missing backup directory is an empty list, not an
    /// error.
    pub fn list_backups(&self) -> Result<Vec<String>, PersistError> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if self.is_backup_name(&name) {
                names.push(name);
            }
        }
        names.sort_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Raw bytes of a named backup. Only names from this report's backup
    /// family resolve; anything else (including path-shaped names) is
    /// `UnknownBackup`.
    pub fn read_backup(&self, name: &str) -> Result<Vec<u8>, PersistError> {
        if !self.is_backup_name(name) {
            return Err(PersistError::UnknownBackup(name.to_string()));
        }
        let path = self.backup_dir.join(name);
        if !path.is_file() {
            return Err(PersistError::UnknownBackup(name.to_string()));
        }
        Ok(fs::read(path)?)
    }

    fn is_backup_name(&self, name: &str) -> bool {
        name.starts_with(&format!("{}_", self.stem))
            && name.ends_with(".json")
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains("..")
    }
}

/// Read and parse a report file into a JSON batch for
/// [`crate::store::RecordStore::load_json`].
pub fn read_report(path: &Path) -> Result<serde_json::Value, PersistError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_records() -> Vec<Record> {
        vec![Record::new(
            "sampled at 1kHz",
            serde_json::from_value(json!({"fs": 1000, "confidence": 0.3})).unwrap(),
        )]
    }

    #[test]
    fn save_writes_backup_then_report() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().join("report.json"));

        let backup = store.save(&sample_records()).unwrap();

        assert!(backup.starts_with("report_"));
        assert!(backup.ends_with("Z.json"));
        assert!(store.backup_dir().join(&backup).is_file());

        let report = fs::read_to_string(store.report_path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(parsed[0]["extraction"]["fs"], json!(1000));
    }

    #[test]
    fn saved_report_equals_backup() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().join("report.json"));
        let backup = store.save(&sample_records()).unwrap();

        let report_bytes = fs::read(store.report_path()).unwrap();
        assert_eq!(store.read_backup(&backup).unwrap(), report_bytes);
    }

    #[test]
    fn list_backups_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().join("report.json"));
        fs::create_dir_all(store.backup_dir()).unwrap();
        for name in [
            "report_20260101_000000Z.json",
            "report_20260301_000000Z.json",
            "report_20260201_000000Z.json",
        ] {
            fs::write(store.backup_dir().join(name), "[]").unwrap();
        }
        // A foreign file in the directory is not a backup of this report.
        fs::write(store.backup_dir().join("notes.txt"), "x").unwrap();

        let names = store.list_backups().unwrap();
        assert_eq!(
            names,
            [
                "report_20260301_000000Z.json",
                "report_20260201_000000Z.json",
                "report_20260101_000000Z.json",
            ]
        );
    }

    #[test]
    fn list_backups_without_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().join("report.json"));
        assert!(store.list_backups().unwrap().is_empty());
    }

    #[test]
    fn read_backup_rejects_foreign_names() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().join("report.json"));
        store.save(&sample_records()).unwrap();

        for bad in [
            "other_20260101_000000Z.json",
            "../report.json",
            "report_x/../../etc/passwd",
            "report_missing.json",
        ] {
            assert!(matches!(
                store.read_backup(bad).unwrap_err(),
                PersistError::UnknownBackup(_)
            ));
        }
    }

    #[test]
    fn read_report_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().join("report.json"));
        store.save(&sample_records()).unwrap();

        let value = read_report(store.report_path()).unwrap();
        let mut records = crate::store::RecordStore::new();
        assert_eq!(records.load_json(value).unwrap(), 1);
    }
}
