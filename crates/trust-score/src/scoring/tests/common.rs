use std::sync::Arc;

use axum::response::Response;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::ledger::{TransactionCategory, TransactionRecord, TransactionStatus};
use crate::scoring::{
    scoring_router, CreditScoreService, ScoreEngine, SourcePreference,
    DEFAULT_DIVERGENCE_TOLERANCE,
};

pub(super) const SUBJECT: &str = "user@upi";

pub(super) fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(9, 30, 0)
        .expect("valid time")
}

pub(super) fn record(
    timestamp: NaiveDateTime,
    sender: &str,
    receiver: &str,
    amount: f64,
    status: TransactionStatus,
) -> TransactionRecord {
    TransactionRecord {
        reference: None,
        timestamp,
        sender_id: sender.to_string(),
        receiver_id: receiver.to_string(),
        amount,
        status,
        category: TransactionCategory::PeerToPeer,
    }
}

/// A year of salary credits on the 1st and grocery spend on the 15th.
pub(super) fn steady_history() -> Vec<TransactionRecord> {
    let mut records = Vec::new();
    for month in 1..=12 {
        records.push(record(
            at(2025, month, 1),
            "employer@upi",
            SUBJECT,
            10_000.0,
            TransactionStatus::Success,
        ));
        records.push(record(
            at(2025, month, 15),
            SUBJECT,
            "grocer@upi",
            2_000.0,
            TransactionStatus::Success,
        ));
    }
    records
}

/// Irregular spending that exceeds income over a few weeks.
pub(super) fn strained_history() -> Vec<TransactionRecord> {
    let start = at(2025, 3, 1);
    let amounts = [4_000.0, 150.0, 9_000.0, 35.0, 1_200.0];
    let mut records: Vec<TransactionRecord> = amounts
        .iter()
        .enumerate()
        .map(|(index, amount)| {
            record(
                start + Duration::days((index * index) as i64),
                SUBJECT,
                "merchant@upi",
                *amount,
                TransactionStatus::Success,
            )
        })
        .collect();
    records.push(record(
        start,
        "friend@upi",
        SUBJECT,
        3_000.0,
        TransactionStatus::Success,
    ));
    records
}

pub(super) fn failed(day: u32) -> TransactionRecord {
    record(
        at(2025, 6, day),
        SUBJECT,
        "landlord@upi",
        8_000.0,
        TransactionStatus::Failed,
    )
}

pub(super) fn engine() -> ScoreEngine {
    ScoreEngine::with_defaults()
}

pub(super) fn service(preference: SourcePreference) -> CreditScoreService {
    CreditScoreService::new(engine(), preference, DEFAULT_DIVERGENCE_TOLERANCE)
}

pub(super) fn router() -> axum::Router {
    scoring_router(Arc::new(service(SourcePreference::Local)))
}

/// The steady history in the statement shape the scoring API accepts.
pub(super) fn statement_payload() -> Value {
    let entries: Vec<Value> = steady_history()
        .iter()
        .map(|record| {
            json!({
                "Timestamp": record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                "Sender UPI ID": record.sender_id,
                "Receiver UPI ID": record.receiver_id,
                "Amount (INR)": record.amount,
                "Status": record.status.label(),
            })
        })
        .collect();
    Value::Array(entries)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
