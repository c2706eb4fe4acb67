use crate::ledger::{normalize_handle, Direction, TransactionRecord};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const DAYS_PER_MONTH: f64 = 30.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Aggregate view of the subject's activity, reported alongside the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Records where the subject is sender, receiver, or both.
    pub considered: usize,
    pub successful: usize,
    pub failed_or_pending: usize,
    pub third_party_ignored: usize,
    pub skipped_records: usize,
    pub total_incoming: f64,
    pub total_outgoing: f64,
    pub distinct_counterparties: usize,
    pub first_activity: Option<NaiveDateTime>,
    pub last_activity: Option<NaiveDateTime>,
    pub span_days: f64,
    /// Observation window in 30-day months, never less than one.
    pub months_observed: f64,
    pub avg_monthly_incoming: f64,
    pub avg_monthly_outgoing: f64,
}

/// Metrics collected in steps one and two of the derivation. Amount and timestamp
/// series are kept sorted so every downstream figure is independent of input order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Aggregates {
    pub(crate) summary: ActivitySummary,
    pub(crate) success_amounts: Vec<f64>,
    pub(crate) success_timestamps: Vec<NaiveDateTime>,
}

impl Aggregates {
    pub(crate) fn has_successful_activity(&self) -> bool {
        self.summary.successful > 0
    }
}

pub(crate) fn aggregate(
    transactions: &[TransactionRecord],
    subject_id: &str,
    skipped_upstream: usize,
) -> Aggregates {
    let mut summary = ActivitySummary {
        skipped_records: skipped_upstream,
        ..ActivitySummary::default()
    };
    let mut incoming = Vec::new();
    let mut outgoing = Vec::new();
    let mut success_amounts = Vec::new();
    let mut success_timestamps = Vec::new();
    let mut counterparties = BTreeSet::new();

    for record in transactions {
        if !record.has_valid_amount() {
            summary.skipped_records += 1;
            continue;
        }

        let direction = record.direction_for(subject_id);
        if direction == Direction::ThirdParty {
            summary.third_party_ignored += 1;
            continue;
        }

        summary.considered += 1;
        if let Some(counterparty) = record.counterparty_for(subject_id) {
            counterparties.insert(normalize_handle(counterparty));
        }

        if !record.status.is_success() {
            summary.failed_or_pending += 1;
            continue;
        }

        summary.successful += 1;
        success_amounts.push(record.amount);
        success_timestamps.push(record.timestamp);
        match direction {
            Direction::Outgoing => outgoing.push(record.amount),
            Direction::Incoming => incoming.push(record.amount),
            Direction::SelfTransfer | Direction::ThirdParty => {}
        }
    }

    success_amounts.sort_by(f64::total_cmp);
    success_timestamps.sort();

    summary.total_incoming = sorted_sum(incoming);
    summary.total_outgoing = sorted_sum(outgoing);
    summary.distinct_counterparties = counterparties.len();
    summary.first_activity = success_timestamps.first().copied();
    summary.last_activity = success_timestamps.last().copied();
    summary.span_days = match (summary.first_activity, summary.last_activity) {
        (Some(first), Some(last)) => (last - first).num_seconds() as f64 / SECONDS_PER_DAY,
        _ => 0.0,
    };
    summary.months_observed = summary.span_days.max(DAYS_PER_MONTH) / DAYS_PER_MONTH;
    summary.avg_monthly_incoming = summary.total_incoming / summary.months_observed;
    summary.avg_monthly_outgoing = summary.total_outgoing / summary.months_observed;

    Aggregates {
        summary,
        success_amounts,
        success_timestamps,
    }
}

pub(crate) fn sorted_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}
