use super::domain::{TransactionCategory, TransactionStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Payment direction as declared by the source, before the subject is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectionHint {
    Sent,
    Received,
}

pub(crate) fn normalize_key(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Payment handles compare case-insensitively and without surrounding whitespace.
pub fn normalize_handle(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_ascii_lowercase()
}

pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

/// Accepts plain numbers and the formatted strings statements tend to carry
/// (`"₹1,250.50"`, `" 300 "`). Negative and non-finite values are rejected.
pub(crate) fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('\u{20b9}')
        .trim_start_matches("INR")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let amount = cleaned.parse::<f64>().ok()?;
    if amount.is_finite() && amount >= 0.0 {
        Some(amount)
    } else {
        None
    }
}

/// Unknown statuses are treated as failures.
pub(crate) fn parse_status(value: &str) -> TransactionStatus {
    match normalize_key(value).as_str() {
        "success" | "successful" | "completed" | "settled" => TransactionStatus::Success,
        "pending" | "processing" | "initiated" => TransactionStatus::Pending,
        _ => TransactionStatus::Failed,
    }
}

pub(crate) fn parse_category(value: &str) -> TransactionCategory {
    match normalize_key(value).as_str() {
        "p2p" | "peertopeer" => TransactionCategory::PeerToPeer,
        "p2m" | "peertomerchant" | "merchant" => TransactionCategory::PeerToMerchant,
        _ => TransactionCategory::Other,
    }
}

pub(crate) fn parse_direction_hint(value: &str) -> Option<DirectionHint> {
    match normalize_key(value).as_str() {
        "sent" | "debit" | "outgoing" | "dr" => Some(DirectionHint::Sent),
        "received" | "incentive" | "credit" | "incoming" | "cr" | "refund" | "cashback" => {
            Some(DirectionHint::Received)
        }
        _ => None,
    }
}
