//! Mapping for score responses produced by the remote scoring API, and the policy
//! that decides between a remote result and the locally derived one.

use super::config::LoanPolicyConfig;
use super::policy::{clamp_score, monthly_emi, LoanEligibility, ScoreCategory};
use super::rules::{to_component, ScoreComponents};
use super::{ActivitySummary, ScoreResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

const DEFAULT_PAYMENT_HISTORY: f64 = 75.0;
const DEFAULT_UTILIZATION: f64 = 75.0;
const FIXED_CREDIT_AGE: u8 = 70;
const DEFAULT_ACTIVITY: f64 = 90.0;
const DEFAULT_PATTERNS: f64 = 80.0;
const DEFAULT_MAX_AMOUNT: f64 = 5_000.0;
const DEFAULT_DURATION_MONTHS: u32 = 12;
const DEFAULT_INTEREST_RATE: f64 = 14.0;

/// Body returned by the remote scoring API. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteScoreResponse {
    #[serde(default)]
    pub credit_score: Option<f64>,
    #[serde(default)]
    pub score_category: Option<String>,
    #[serde(default)]
    pub component_scores: RemoteComponentScores,
    #[serde(default)]
    pub loan_eligibility: RemoteLoanEligibility,
    #[serde(default)]
    pub improvement_recommendations: Vec<String>,
    /// Records in any of the ingest shapes.
    #[serde(default)]
    pub last_5_transactions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteComponentScores {
    #[serde(default)]
    pub financial_discipline: Option<f64>,
    #[serde(default)]
    pub expense_management: Option<f64>,
    #[serde(default)]
    pub transaction_history: Option<f64>,
    #[serde(default)]
    pub income_stability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteLoanEligibility {
    #[serde(default)]
    pub eligible: Option<bool>,
    #[serde(default)]
    pub max_loan_amount: Option<f64>,
    #[serde(default)]
    pub max_duration_months: Option<u32>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub monthly_emi: Option<f64>,
    #[serde(default)]
    pub disposable_income: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteScoreError {
    #[error("remote response carries no credit score")]
    MissingScore,
    #[error("remote credit score {0} is not a positive finite number")]
    InvalidScore(f64),
}

impl RemoteScoreResponse {
    /// Maps the response onto a [`ScoreResult`]. The score is clamped and the
    /// category recomputed from it; a reported `score_category` that disagrees
    /// is ignored.
    pub fn to_result(&self, policy: &LoanPolicyConfig) -> Result<ScoreResult, RemoteScoreError> {
        let raw = self.credit_score.ok_or(RemoteScoreError::MissingScore)?;
        if !(raw.is_finite() && raw > 0.0) {
            return Err(RemoteScoreError::InvalidScore(raw));
        }

        let score = clamp_score(raw);
        let category = ScoreCategory::from_score(score);
        if let Some(reported) = self.score_category.as_deref() {
            if ScoreCategory::from_label(reported) != Some(category) {
                debug!(reported, computed = category.label(), "remote category overridden");
            }
        }

        let reported = &self.component_scores;
        let components = ScoreComponents {
            payment_history: component_or(reported.financial_discipline, DEFAULT_PAYMENT_HISTORY),
            credit_utilization: component_or(reported.expense_management, DEFAULT_UTILIZATION),
            credit_age: FIXED_CREDIT_AGE,
            upi_activity: component_or(reported.transaction_history, DEFAULT_ACTIVITY),
            transaction_patterns: component_or(reported.income_stability, DEFAULT_PATTERNS),
        };

        let loan = &self.loan_eligibility;
        let max_amount = finite_or(loan.max_loan_amount, DEFAULT_MAX_AMOUNT).max(0.0);
        let max_duration_months = loan.max_duration_months.unwrap_or(DEFAULT_DURATION_MONTHS);
        let interest_rate = finite_or(loan.interest_rate, DEFAULT_INTEREST_RATE);
        let monthly_emi = loan
            .monthly_emi
            .filter(|emi| emi.is_finite() && *emi >= 0.0)
            .unwrap_or_else(|| monthly_emi(max_amount, interest_rate, max_duration_months));

        let loan_eligibility = LoanEligibility {
            eligible: loan
                .eligible
                .unwrap_or(score >= policy.minimum_eligible_score),
            max_amount,
            max_duration_months,
            interest_rate,
            monthly_emi,
            disposable_income: finite_or(loan.disposable_income, 0.0).max(0.0),
        };

        Ok(ScoreResult {
            score,
            category,
            components,
            loan_eligibility,
            activity: ActivitySummary::default(),
            prior_score: None,
            score_change: None,
        })
    }
}

fn component_or(value: Option<f64>, default: f64) -> u8 {
    to_component(finite_or(value, default))
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|value| value.is_finite()).unwrap_or(default)
}

/// Which result wins when both a local and a remote score are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePreference {
    #[default]
    Local,
    Remote,
}

impl FromStr for SourcePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "api" => Ok(Self::Remote),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Local,
    Remote,
}

/// The result that was chosen, where it came from, and how far the remote score
/// was from the local one when both were available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledScore {
    pub result: ScoreResult,
    pub source: ScoreSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divergence: Option<i32>,
}

/// Picks between `local` and `remote`. The remote result is used only when it
/// is preferred and maps cleanly; otherwise the local result stands. A chosen
/// remote result keeps the local activity summary and prior score.
pub fn reconcile(
    local: ScoreResult,
    remote: Option<&RemoteScoreResponse>,
    preference: SourcePreference,
    tolerance: u16,
    policy: &LoanPolicyConfig,
) -> ReconciledScore {
    let Some(remote) = remote else {
        return ReconciledScore {
            result: local,
            source: ScoreSource::Local,
            divergence: None,
        };
    };

    let mapped = match remote.to_result(policy) {
        Ok(mapped) => mapped,
        Err(error) => {
            warn!(%error, "ignoring unusable remote score");
            return ReconciledScore {
                result: local,
                source: ScoreSource::Local,
                divergence: None,
            };
        }
    };

    let divergence = i32::from(mapped.score) - i32::from(local.score);
    if divergence.unsigned_abs() > u32::from(tolerance) {
        warn!(
            local = local.score,
            remote = mapped.score,
            divergence,
            tolerance,
            "local and remote scores diverge"
        );
    }

    match preference {
        SourcePreference::Local => ReconciledScore {
            result: local,
            source: ScoreSource::Local,
            divergence: Some(divergence),
        },
        SourcePreference::Remote => {
            let score_change = local
                .prior_score
                .map(|prior| i32::from(mapped.score) - i32::from(prior));
            ReconciledScore {
                result: ScoreResult {
                    activity: local.activity,
                    prior_score: local.prior_score,
                    score_change,
                    ..mapped
                },
                source: ScoreSource::Remote,
                divergence: Some(divergence),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn remote(value: serde_json::Value) -> RemoteScoreResponse {
        serde_json::from_value(value).expect("remote payload")
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let response = remote(json!({ "credit_score": 712 }));
        let result = response
            .to_result(&LoanPolicyConfig::default())
            .expect("valid response");

        assert_eq!(result.score, 712);
        assert_eq!(result.category, ScoreCategory::Good);
        assert_eq!(
            result.components,
            ScoreComponents {
                payment_history: 75,
                credit_utilization: 75,
                credit_age: 70,
                upi_activity: 90,
                transaction_patterns: 80,
            }
        );
        assert_eq!(result.loan_eligibility.max_amount, 5_000.0);
        assert_eq!(result.loan_eligibility.max_duration_months, 12);
        assert_eq!(result.loan_eligibility.interest_rate, 14.0);
        assert!(result.loan_eligibility.eligible);
        assert!(result.loan_eligibility.monthly_emi > 0.0);
    }

    #[test]
    fn reported_components_are_mapped_and_clamped() {
        let response = remote(json!({
            "credit_score": 1_250,
            "score_category": "Poor",
            "component_scores": {
                "financial_discipline": 64.6,
                "expense_management": 140,
                "transaction_history": -3,
                "income_stability": 55
            },
            "loan_eligibility": {
                "eligible": true,
                "max_loan_amount": 80_000,
                "max_duration_months": 24,
                "interest_rate": 12.5
            }
        }));
        let result = response
            .to_result(&LoanPolicyConfig::default())
            .expect("valid response");

        assert_eq!(result.score, 900);
        assert_eq!(result.category, ScoreCategory::Excellent);
        assert_eq!(result.components.payment_history, 65);
        assert_eq!(result.components.credit_utilization, 100);
        assert_eq!(result.components.upi_activity, 0);
        assert_eq!(result.components.transaction_patterns, 55);
        assert_eq!(result.loan_eligibility.max_amount, 80_000.0);
        assert_eq!(result.loan_eligibility.max_duration_months, 24);
    }

    #[test]
    fn missing_or_invalid_score_is_rejected() {
        let policy = LoanPolicyConfig::default();
        assert_eq!(
            remote(json!({})).to_result(&policy),
            Err(RemoteScoreError::MissingScore)
        );
        assert_eq!(
            remote(json!({ "credit_score": 0 })).to_result(&policy),
            Err(RemoteScoreError::InvalidScore(0.0))
        );
    }

    #[test]
    fn source_preference_parses_case_insensitively() {
        assert_eq!("LOCAL".parse::<SourcePreference>(), Ok(SourcePreference::Local));
        assert_eq!(" remote ".parse::<SourcePreference>(), Ok(SourcePreference::Remote));
        assert!("both".parse::<SourcePreference>().is_err());
    }
}
