//! Record annotation and quality triage for extraction reports.
//!
//! An upstream extractor produces batches of `{text, extraction}` records;
//! this crate is the reviewing side: load a batch into an in-memory
//! [`store::RecordStore`], backfill missing confidence scores with the
//! [`confidence::WeightTable`] heuristic, flag records missing
//! reviewer-chosen fields ([`analyze`]), rank them for attention
//! ([`triage`]), bulk-apply corrections over a selection ([`bulk`]), and
//! export the results ([`export`]). [`persist`] handles the
//! save-with-backup contract against local report files; [`cli`] wraps it
//! all in the `extriage` binary.
//!
//! Everything is synchronous and single-session: one reviewer, one store,
//! operations run to completion in call order.

pub mod analyze;
pub mod bulk;
pub mod cli;
pub mod confidence;
pub mod export;
pub mod model;
pub mod persist;
pub mod store;
pub mod triage;

pub use analyze::{FlaggedRecord, flag_records, missing_fields};
pub use bulk::{BulkEditError, apply_to_selection};
pub use confidence::WeightTable;
pub use export::{TriageVariant, full_batch_csv, full_batch_json, triage_csv};
pub use model::{Extraction, Presence, Record};
pub use persist::{PersistError, ReportStore, read_report};
pub use store::{RecordStore, StoreError};
pub use triage::{SortToggles, rank};
