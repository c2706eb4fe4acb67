use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::remote::{reconcile, RemoteScoreResponse, ScoreSource, SourcePreference};
use super::{ScoreEngine, ScoreResult};
use crate::ledger::{
    recent_transactions, IngestError, SkippedRecord, TransactionImporter, TransactionRecord,
};
use crate::lending::{LoanApplication, LoanApplicationError, LoanQuote};
use crate::scoring::LoanEligibility;

pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_DIVERGENCE_TOLERANCE: u16 = 50;

/// Score request as accepted over HTTP. `transactions` may be any of the
/// supported record shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub subject_id: String,
    pub transactions: Value,
    #[serde(default)]
    pub prior_score: Option<u16>,
    #[serde(default)]
    pub recent_limit: Option<usize>,
    #[serde(default)]
    pub remote: Option<RemoteScoreResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub result: ScoreResult,
    pub source: ScoreSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divergence: Option<i32>,
    pub skipped: Vec<SkippedRecord>,
    pub recent_transactions: Vec<TransactionRecord>,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub eligibility: LoanEligibility,
    pub application: LoanApplication,
}

/// Service composing ingest, the score engine and the local/remote policy.
pub struct CreditScoreService {
    engine: ScoreEngine,
    preference: SourcePreference,
    tolerance: u16,
}

impl CreditScoreService {
    pub fn new(engine: ScoreEngine, preference: SourcePreference, tolerance: u16) -> Self {
        Self {
            engine,
            preference,
            tolerance,
        }
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    pub fn preference(&self) -> SourcePreference {
        self.preference
    }

    /// Normalize the submitted records, score them, and reconcile with any
    /// remote result supplied alongside.
    pub fn score(&self, request: &ScoreRequest) -> Result<ScoreReport, ScoreServiceError> {
        let batch = TransactionImporter::for_subject(&request.subject_id)
            .from_json_value(&request.transactions)?;
        let local = self
            .engine
            .score_batch(&batch, &request.subject_id, request.prior_score);

        let reconciled = reconcile(
            local,
            request.remote.as_ref(),
            self.preference,
            self.tolerance,
            &self.engine.config().loan,
        );

        let mut insights = reconciled.result.insights();
        let limit = request.recent_limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        let mut recent = recent_transactions(&batch.records, &request.subject_id, limit);

        // A remote result that wins also supplies its own advice and listing.
        if let (ScoreSource::Remote, Some(remote)) = (reconciled.source, &request.remote) {
            if !remote.improvement_recommendations.is_empty() {
                insights.suggestions = remote.improvement_recommendations.clone();
            }
            if !remote.last_5_transactions.is_empty() {
                let listed = TransactionImporter::for_subject(&request.subject_id)
                    .from_json_value(&Value::Array(remote.last_5_transactions.clone()))?;
                if !listed.is_empty() {
                    recent = recent_transactions(&listed.records, &request.subject_id, limit);
                }
            }
        }

        Ok(ScoreReport {
            recent_transactions: recent,
            skipped: batch.skipped,
            result: reconciled.result,
            source: reconciled.source,
            divergence: reconciled.divergence,
            message: insights.message,
            suggestions: insights.suggestions,
        })
    }

    pub fn quote(&self, request: &QuoteRequest) -> Result<LoanQuote, ScoreServiceError> {
        Ok(request.application.quote(&request.eligibility)?)
    }
}

impl Default for CreditScoreService {
    fn default() -> Self {
        Self::new(
            ScoreEngine::with_defaults(),
            SourcePreference::default(),
            DEFAULT_DIVERGENCE_TOLERANCE,
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreServiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Lending(#[from] LoanApplicationError),
}
