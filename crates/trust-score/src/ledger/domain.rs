use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::normalizer::normalize_handle;

/// Settlement outcome reported by the payment rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
}

impl TransactionStatus {
    pub fn is_success(self) -> bool {
        matches!(self, TransactionStatus::Success)
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Pending => "PENDING",
        }
    }
}

/// Counterparty classification of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionCategory {
    #[serde(rename = "P2P")]
    PeerToPeer,
    #[serde(rename = "P2M")]
    PeerToMerchant,
    #[serde(rename = "OTHER")]
    Other,
}

/// Which side of a record the scored subject sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outgoing,
    Incoming,
    SelfTransfer,
    ThirdParty,
}

/// A single normalized payment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub timestamp: NaiveDateTime,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: f64,
    pub status: TransactionStatus,
    pub category: TransactionCategory,
}

impl TransactionRecord {
    /// Handles are compared after normalization, so records built by hand match
    /// the subject regardless of case or stray whitespace.
    pub fn direction_for(&self, subject_id: &str) -> Direction {
        let subject = normalize_handle(subject_id);
        let sent = normalize_handle(&self.sender_id) == subject;
        let received = normalize_handle(&self.receiver_id) == subject;
        match (sent, received) {
            (true, true) => Direction::SelfTransfer,
            (true, false) => Direction::Outgoing,
            (false, true) => Direction::Incoming,
            (false, false) => Direction::ThirdParty,
        }
    }

    /// The other party from the subject's point of view, if the subject is involved.
    pub fn counterparty_for(&self, subject_id: &str) -> Option<&str> {
        match self.direction_for(subject_id) {
            Direction::Outgoing => Some(&self.receiver_id),
            Direction::Incoming => Some(&self.sender_id),
            Direction::SelfTransfer | Direction::ThirdParty => None,
        }
    }

    /// Amount is finite and non-negative.
    pub fn has_valid_amount(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }

    /// Total order over every field, newest first. Used wherever records have to
    /// be listed independently of input order.
    pub(crate) fn recency_cmp(&self, other: &Self) -> Ordering {
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.amount.total_cmp(&self.amount))
            .then_with(|| self.sender_id.cmp(&other.sender_id))
            .then_with(|| self.receiver_id.cmp(&other.receiver_id))
            .then_with(|| self.status.cmp(&other.status))
            .then_with(|| self.category.cmp(&other.category))
            .then_with(|| self.reference.cmp(&other.reference))
    }
}

/// Reason an inbound record could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RecordDefect {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("amount `{0}` is not a non-negative number")]
    InvalidAmount(String),
    #[error("timestamp `{0}` could not be parsed")]
    InvalidTimestamp(String),
    #[error("status is blank or not a string")]
    InvalidStatus,
    #[error("cannot determine sender and receiver")]
    UnresolvedParties,
}

/// A record dropped during ingest, kept so the skip is traceable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Zero-based position in the source payload (data rows for CSV).
    pub index: usize,
    pub defect: RecordDefect,
}

/// Normalized records plus whatever had to be skipped along the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub records: Vec<TransactionRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl ImportBatch {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The subject's `limit` most recent records, newest first. Transfers between
/// other parties are left out. Ties on timestamp are broken on the remaining
/// fields so the listing never depends on input order.
pub fn recent_transactions(
    records: &[TransactionRecord],
    subject_id: &str,
    limit: usize,
) -> Vec<TransactionRecord> {
    let mut sorted: Vec<&TransactionRecord> = records
        .iter()
        .filter(|record| record.direction_for(subject_id) != Direction::ThirdParty)
        .collect();
    sorted.sort_by(|a, b| a.recency_cmp(b));
    sorted.into_iter().take(limit).cloned().collect()
}
