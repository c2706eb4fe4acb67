//! Boundary adapter that turns loosely shaped transaction payloads into
//! [`TransactionRecord`]s.
//!
//! Two payload families are accepted: the UPI statement shape used by the remote
//! scoring API (`"Sender UPI ID"`, `"Amount (INR)"`, ...) and the lighter in-app
//! ledger shape (`merchant`, `date`, `type: debit|credit`). Both arrive either as
//! a JSON array or as a CSV export. Records that cannot be normalized are skipped
//! and reported in [`ImportBatch::skipped`]; only a payload that is not a list at
//! all is a hard failure.

pub mod domain;
mod mapping;
mod normalizer;
mod parser;

pub use domain::{
    recent_transactions, Direction, ImportBatch, RecordDefect, SkippedRecord,
    TransactionCategory, TransactionRecord, TransactionStatus,
};
pub use normalizer::normalize_handle;

use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Errors that abort an import as a whole.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read transaction source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid transaction JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid transaction CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("expected a list of transactions, found {0}")]
    NotAList(&'static str),
}

/// Normalizes payloads on behalf of one subject. The subject handle is only used
/// to complete records that name a single party plus a direction.
#[derive(Debug, Clone, Default)]
pub struct TransactionImporter {
    subject_id: Option<String>,
}

impl TransactionImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_subject(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
        }
    }

    /// Accepts either a bare array or an object wrapping one under `transactions`.
    pub fn from_json_value(&self, payload: &Value) -> Result<ImportBatch, IngestError> {
        let entries = match payload {
            Value::Array(entries) => entries,
            Value::Object(map) => match map.get("transactions") {
                Some(Value::Array(entries)) => entries,
                Some(other) => return Err(IngestError::NotAList(json_kind(other))),
                None => return Err(IngestError::NotAList("object")),
            },
            other => return Err(IngestError::NotAList(json_kind(other))),
        };

        let mut batch = ImportBatch::default();
        for (index, entry) in entries.iter().enumerate() {
            let outcome = parser::raw_from_json(entry)
                .and_then(|raw| raw.into_transaction(self.subject_id.as_deref()));
            self.collect(&mut batch, index, outcome);
        }

        self.finish(batch)
    }

    pub fn from_json_str(&self, payload: &str) -> Result<ImportBatch, IngestError> {
        let value: Value = serde_json::from_str(payload)?;
        self.from_json_value(&value)
    }

    pub fn from_csv_reader<R: Read>(&self, reader: R) -> Result<ImportBatch, IngestError> {
        let mut batch = ImportBatch::default();
        for (index, raw) in parser::raw_from_csv(reader)?.into_iter().enumerate() {
            let outcome = raw.into_transaction(self.subject_id.as_deref());
            self.collect(&mut batch, index, outcome);
        }

        self.finish(batch)
    }

    /// Dispatches on the file extension; anything other than `.csv` is read as JSON.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<ImportBatch, IngestError> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            let file = std::fs::File::open(path)?;
            self.from_csv_reader(file)
        } else {
            let content = std::fs::read_to_string(path)?;
            self.from_json_str(&content)
        }
    }

    fn collect(
        &self,
        batch: &mut ImportBatch,
        index: usize,
        outcome: Result<TransactionRecord, RecordDefect>,
    ) {
        match outcome {
            Ok(record) => batch.records.push(record),
            Err(defect) => {
                debug!(index, %defect, "skipping transaction record");
                batch.skipped.push(SkippedRecord { index, defect });
            }
        }
    }

    fn finish(&self, batch: ImportBatch) -> Result<ImportBatch, IngestError> {
        debug!(
            accepted = batch.records.len(),
            skipped = batch.skipped.len(),
            "transaction import finished"
        );
        Ok(batch)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
