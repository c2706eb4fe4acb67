use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relative weight of each component in the composite score. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub payment_history: f64,
    pub credit_utilization: f64,
    pub credit_age: f64,
    pub upi_activity: f64,
    pub transaction_patterns: f64,
}

impl ComponentWeights {
    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }

    pub(crate) fn as_array(&self) -> [f64; 5] {
        [
            self.payment_history,
            self.credit_utilization,
            self.credit_age,
            self.upi_activity,
            self.transaction_patterns,
        ]
    }
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            payment_history: 0.35,
            credit_utilization: 0.30,
            credit_age: 0.15,
            upi_activity: 0.10,
            transaction_patterns: 0.10,
        }
    }
}

/// Loan sizing and pricing derived from the final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanPolicyConfig {
    pub minimum_eligible_score: u16,
    pub base_amount: f64,
    pub amount_ceiling: f64,
    pub amount_step: f64,
    /// Annual percentage charged at the minimum eligible score.
    pub rate_ceiling: f64,
    /// Annual percentage charged at the top of the range.
    pub rate_floor: f64,
    pub fair_term_months: u32,
    pub good_term_months: u32,
    pub very_good_term_months: u32,
    pub excellent_term_months: u32,
}

impl Default for LoanPolicyConfig {
    fn default() -> Self {
        Self {
            minimum_eligible_score: 580,
            base_amount: 5_000.0,
            amount_ceiling: 200_000.0,
            amount_step: 1_000.0,
            rate_ceiling: 22.0,
            rate_floor: 10.0,
            fair_term_months: 12,
            good_term_months: 24,
            very_good_term_months: 36,
            excellent_term_months: 60,
        }
    }
}

/// Every tunable constant of the scoring heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ComponentWeights,
    /// Points removed from payment history per failed or pending transaction.
    pub failure_penalty: f64,
    /// Spend-to-income ratio at or below which utilization scores 100.
    pub utilization_ideal_ratio: f64,
    /// Spend-to-income ratio at or above which utilization scores 0.
    pub utilization_limit_ratio: f64,
    pub credit_age_saturation_days: f64,
    pub activity_saturation_per_month: f64,
    /// Coefficient of variation at which a regularity score bottoms out.
    pub variation_cap: f64,
    pub loan: LoanPolicyConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            failure_penalty: 5.0,
            utilization_ideal_ratio: 0.3,
            utilization_limit_ratio: 1.0,
            credit_age_saturation_days: 365.0,
            activity_saturation_per_month: 30.0,
            variation_cap: 2.0,
            loan: LoanPolicyConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Reads a JSON override file. Omitted fields keep their defaults; the
    /// result is not validated here.
    pub fn from_path(path: &Path) -> Result<Self, ScoringConfigError> {
        let content = std::fs::read_to_string(path).map_err(|err| ScoringConfigError::Unreadable {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        serde_json::from_str(&content)
            .map_err(|err| ScoringConfigError::Malformed(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let weights = self.weights.as_array();
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(ScoringConfigError::NegativeWeight);
        }

        let total = self.weights.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(ScoringConfigError::WeightsDoNotSumToOne(total));
        }

        if !(self.failure_penalty.is_finite() && self.failure_penalty >= 0.0) {
            return Err(ScoringConfigError::InvalidParameter("failure_penalty"));
        }

        if !(self.utilization_ideal_ratio >= 0.0
            && self.utilization_ideal_ratio < self.utilization_limit_ratio)
        {
            return Err(ScoringConfigError::InvertedRange("utilization ratios"));
        }

        for (name, value) in [
            ("credit_age_saturation_days", self.credit_age_saturation_days),
            (
                "activity_saturation_per_month",
                self.activity_saturation_per_month,
            ),
            ("variation_cap", self.variation_cap),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ScoringConfigError::InvalidParameter(name));
            }
        }

        let loan = &self.loan;
        if !(loan.base_amount >= 0.0 && loan.base_amount <= loan.amount_ceiling) {
            return Err(ScoringConfigError::InvertedRange("loan amounts"));
        }
        if !(loan.amount_step > 0.0) {
            return Err(ScoringConfigError::InvalidParameter("amount_step"));
        }
        if !(loan.rate_floor >= 0.0 && loan.rate_floor <= loan.rate_ceiling) {
            return Err(ScoringConfigError::InvertedRange("interest rates"));
        }
        if !(loan.fair_term_months <= loan.good_term_months
            && loan.good_term_months <= loan.very_good_term_months
            && loan.very_good_term_months <= loan.excellent_term_months)
        {
            return Err(ScoringConfigError::InvertedRange("loan terms"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("component weights must sum to 1.0 (got {0:.4})")]
    WeightsDoNotSumToOne(f64),
    #[error("component weights must be finite and non-negative")]
    NegativeWeight,
    #[error("{0} must be ordered low to high")]
    InvertedRange(&'static str),
    #[error("{0} must be a positive finite number")]
    InvalidParameter(&'static str),
    #[error("cannot read scoring config `{path}`: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("scoring config is not valid JSON: {0}")]
    Malformed(String),
}
