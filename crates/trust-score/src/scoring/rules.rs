use super::aggregate::Aggregates;
use super::config::ScoringConfig;
use serde::{Deserialize, Serialize};

/// Component sub-scores, each an integer in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub payment_history: u8,
    pub credit_utilization: u8,
    pub credit_age: u8,
    pub upi_activity: u8,
    pub transaction_patterns: u8,
}

impl ScoreComponents {
    pub(crate) fn as_array(&self) -> [u8; 5] {
        [
            self.payment_history,
            self.credit_utilization,
            self.credit_age,
            self.upi_activity,
            self.transaction_patterns,
        ]
    }
}

pub(crate) fn score_components(aggregates: &Aggregates, config: &ScoringConfig) -> ScoreComponents {
    let summary = &aggregates.summary;

    ScoreComponents {
        payment_history: payment_history(summary.failed_or_pending, config),
        credit_utilization: credit_utilization(
            summary.total_outgoing,
            summary.total_incoming,
            config,
        ),
        credit_age: credit_age(summary.span_days, config),
        upi_activity: upi_activity(summary.successful, summary.months_observed, config),
        transaction_patterns: transaction_patterns(aggregates, config),
    }
}

pub(crate) fn payment_history(failed_or_pending: usize, config: &ScoringConfig) -> u8 {
    to_component(100.0 - config.failure_penalty * failed_or_pending as f64)
}

/// Linear between the ideal and limit ratios; no income at all scores 0.
pub(crate) fn credit_utilization(outgoing: f64, incoming: f64, config: &ScoringConfig) -> u8 {
    if incoming <= 0.0 {
        return 0;
    }

    let ratio = outgoing / incoming;
    let ideal = config.utilization_ideal_ratio;
    let limit = config.utilization_limit_ratio;
    if ratio <= ideal {
        100
    } else if ratio >= limit {
        0
    } else {
        to_component(100.0 * (limit - ratio) / (limit - ideal))
    }
}

pub(crate) fn credit_age(span_days: f64, config: &ScoringConfig) -> u8 {
    to_component(100.0 * span_days / config.credit_age_saturation_days)
}

pub(crate) fn upi_activity(successful: usize, months_observed: f64, config: &ScoringConfig) -> u8 {
    let per_month = successful as f64 / months_observed.max(1.0);
    to_component(100.0 * per_month / config.activity_saturation_per_month)
}

/// Mean of amount regularity and interval regularity. With a single successful
/// transaction there is no pattern to judge.
pub(crate) fn transaction_patterns(aggregates: &Aggregates, config: &ScoringConfig) -> u8 {
    if aggregates.success_amounts.len() < 2 {
        return 0;
    }

    let amount_regularity = regularity(coefficient_of_variation(&aggregates.success_amounts), config);

    let intervals: Vec<f64> = aggregates
        .success_timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64)
        .collect();
    let interval_regularity = if intervals.len() >= 2 {
        regularity(coefficient_of_variation(&intervals), config)
    } else {
        None
    };

    match (amount_regularity, interval_regularity) {
        (Some(amounts), Some(intervals)) => to_component((amounts + intervals) / 2.0),
        (Some(amounts), None) => to_component(amounts),
        (None, Some(intervals)) => to_component(intervals),
        (None, None) => 0,
    }
}

/// `100 × (1 − min(cv / cap, 1))`; `None` when the series has no meaningful mean.
fn regularity(cv: Option<f64>, config: &ScoringConfig) -> Option<f64> {
    cv.map(|cv| 100.0 * (1.0 - (cv / config.variation_cap).min(1.0)))
}

/// Population coefficient of variation. Inputs are summed in sorted order.
fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / count;
    if !(mean.is_finite() && mean > 0.0) {
        return None;
    }

    let mut squared: Vec<f64> = sorted.iter().map(|value| (value - mean).powi(2)).collect();
    squared.sort_by(f64::total_cmp);
    let variance = squared.iter().sum::<f64>() / count;
    let cv = variance.sqrt() / mean;
    cv.is_finite().then_some(cv)
}

pub(crate) fn to_component(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn payment_history_loses_five_points_per_failure_and_floors_at_zero() {
        assert_eq!(payment_history(0, &config()), 100);
        assert_eq!(payment_history(3, &config()), 85);
        assert_eq!(payment_history(20, &config()), 0);
        assert_eq!(payment_history(500, &config()), 0);
    }

    #[test]
    fn utilization_maps_ratio_bands() {
        assert_eq!(credit_utilization(300.0, 1_000.0, &config()), 100);
        assert_eq!(credit_utilization(100.0, 1_000.0, &config()), 100);
        assert_eq!(credit_utilization(650.0, 1_000.0, &config()), 50);
        assert_eq!(credit_utilization(1_000.0, 1_000.0, &config()), 0);
        assert_eq!(credit_utilization(5_000.0, 1_000.0, &config()), 0);
        assert_eq!(credit_utilization(0.0, 0.0, &config()), 0);
        assert_eq!(credit_utilization(10.0, 0.0, &config()), 0);
    }

    #[test]
    fn credit_age_saturates_after_a_year() {
        assert_eq!(credit_age(0.0, &config()), 0);
        assert_eq!(credit_age(182.5, &config()), 50);
        assert_eq!(credit_age(365.0, &config()), 100);
        assert_eq!(credit_age(1_000.0, &config()), 100);
    }

    #[test]
    fn activity_counts_monthly_frequency() {
        assert_eq!(upi_activity(15, 1.0, &config()), 50);
        assert_eq!(upi_activity(60, 2.0, &config()), 100);
        assert_eq!(upi_activity(90, 1.0, &config()), 100);
        assert_eq!(upi_activity(3, 0.2, &config()), 10);
    }

    #[test]
    fn identical_amounts_have_zero_variation() {
        assert_eq!(coefficient_of_variation(&[100.0, 100.0, 100.0]), Some(0.0));
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
        let cv = coefficient_of_variation(&[50.0, 150.0]).expect("defined");
        assert!((cv - 0.5).abs() < 1e-12);
    }

    fn history(amounts: &[f64], days: &[i64]) -> Aggregates {
        let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Aggregates {
            success_amounts: amounts.to_vec(),
            success_timestamps: days
                .iter()
                .map(|day| start + chrono::Duration::days(*day))
                .collect(),
            ..Aggregates::default()
        }
    }

    #[test]
    fn patterns_combine_amount_and_interval_regularity() {
        let steady = history(&[500.0, 500.0, 500.0], &[0, 30, 60]);
        assert_eq!(transaction_patterns(&steady, &config()), 100);

        // Regular amounts, intervals of 1 and 59 days: interval CV 0.9667.
        let bursty = history(&[500.0, 500.0, 500.0], &[0, 1, 60]);
        assert_eq!(transaction_patterns(&bursty, &config()), 76);
    }

    #[test]
    fn patterns_fall_back_to_amounts_with_a_single_interval() {
        let pair = history(&[50.0, 150.0], &[0, 10]);
        assert_eq!(transaction_patterns(&pair, &config()), 75);

        let single = history(&[500.0], &[0]);
        assert_eq!(transaction_patterns(&single, &config()), 0);
    }

    #[test]
    fn to_component_clamps_and_rejects_nan() {
        assert_eq!(to_component(-4.0), 0);
        assert_eq!(to_component(140.0), 100);
        assert_eq!(to_component(f64::NAN), 0);
        assert_eq!(to_component(49.5), 50);
    }
}
