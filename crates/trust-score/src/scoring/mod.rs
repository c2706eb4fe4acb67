//! Score derivation: aggregates a subject's transactions into five component
//! sub-scores, combines them into a bounded score, and prices loan eligibility
//! from the result.

mod aggregate;
mod config;
mod insights;
mod policy;
pub mod remote;
pub mod router;
mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::ActivitySummary;
pub use config::{ComponentWeights, LoanPolicyConfig, ScoringConfig, ScoringConfigError};
pub use insights::{improvement_suggestions, ScoreInsights};
pub use policy::{clamp_score, monthly_emi, LoanEligibility, ScoreCategory, MAX_SCORE, MIN_SCORE};
pub use remote::{
    reconcile, ReconciledScore, RemoteScoreError, RemoteScoreResponse, ScoreSource,
    SourcePreference,
};
pub use router::scoring_router;
pub use rules::ScoreComponents;
pub use service::{
    CreditScoreService, QuoteRequest, ScoreReport, ScoreRequest, ScoreServiceError,
    DEFAULT_DIVERGENCE_TOLERANCE, DEFAULT_RECENT_LIMIT,
};

use crate::ledger::{normalize_handle, ImportBatch, TransactionRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Stateless engine applying a [`ScoringConfig`] to transaction histories.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Derives the score for `subject_id` from its transaction history.
    ///
    /// Records with a negative or non-finite amount are counted as skipped.
    /// Records that involve neither side of the subject are ignored. With no
    /// successful activity the floor result is returned.
    pub fn compute_score(
        &self,
        transactions: &[TransactionRecord],
        subject_id: &str,
        prior_score: Option<u16>,
    ) -> ScoreResult {
        self.derive(transactions, subject_id, prior_score, 0)
    }

    /// Like [`compute_score`](Self::compute_score), carrying the ingest skip count
    /// into the reported activity.
    pub fn score_batch(
        &self,
        batch: &ImportBatch,
        subject_id: &str,
        prior_score: Option<u16>,
    ) -> ScoreResult {
        self.derive(&batch.records, subject_id, prior_score, batch.skipped_count())
    }

    /// Loan terms for an already known score, e.g. one reported by another system.
    pub fn eligibility_for(&self, score: u16, disposable_income: f64) -> LoanEligibility {
        let score = score.clamp(MIN_SCORE, MAX_SCORE);
        policy::loan_eligibility(score, disposable_income, &self.config.loan)
    }

    fn derive(
        &self,
        transactions: &[TransactionRecord],
        subject_id: &str,
        prior_score: Option<u16>,
        skipped_upstream: usize,
    ) -> ScoreResult {
        let subject = normalize_handle(subject_id);
        let aggregates = aggregate::aggregate(transactions, &subject, skipped_upstream);
        debug!(
            subject = %subject,
            considered = aggregates.summary.considered,
            successful = aggregates.summary.successful,
            failed_or_pending = aggregates.summary.failed_or_pending,
            third_party_ignored = aggregates.summary.third_party_ignored,
            skipped = aggregates.summary.skipped_records,
            "aggregated transaction history"
        );

        let (score, components) = if aggregates.has_successful_activity() {
            let components = rules::score_components(&aggregates, &self.config);
            let score = policy::composite_score(&components, &self.config.weights);
            (score, components)
        } else {
            (MIN_SCORE, ScoreComponents::default())
        };

        let category = ScoreCategory::from_score(score);
        let disposable_income = aggregates.summary.avg_monthly_incoming
            - aggregates.summary.avg_monthly_outgoing;
        let loan_eligibility =
            policy::loan_eligibility(score, disposable_income, &self.config.loan);

        let prior_score = prior_score.map(|prior| prior.clamp(MIN_SCORE, MAX_SCORE));
        let score_change = prior_score.map(|prior| i32::from(score) - i32::from(prior));

        info!(
            subject = %subject,
            score,
            category = category.label(),
            eligible = loan_eligibility.eligible,
            "computed trust score"
        );

        ScoreResult {
            score,
            category,
            components,
            loan_eligibility,
            activity: aggregates.summary,
            prior_score,
            score_change,
        }
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Full outcome of a score derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u16,
    pub category: ScoreCategory,
    pub components: ScoreComponents,
    pub loan_eligibility: LoanEligibility,
    pub activity: ActivitySummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_score: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_change: Option<i32>,
}

impl ScoreResult {
    pub fn insights(&self) -> ScoreInsights {
        insights::generate_insights(self)
    }
}
