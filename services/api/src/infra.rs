use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use trust_score::config::ScoringSettings;
use trust_score::error::AppError;
use trust_score::scoring::{
    CreditScoreService, ScoreEngine, ScoringConfig, ScoringConfigError, SourcePreference,
    MAX_SCORE, MIN_SCORE,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the scoring service, applying and validating any scoring override file.
pub(crate) fn build_service(settings: &ScoringSettings) -> Result<CreditScoreService, AppError> {
    let engine = match &settings.config_path {
        Some(path) => {
            let engine = ScoreEngine::new(ScoringConfig::from_path(path)?)?;
            info!(path = %path.display(), "loaded scoring overrides");
            engine
        }
        None => ScoreEngine::with_defaults(),
    };

    Ok(CreditScoreService::new(
        engine,
        settings.source_preference,
        settings.divergence_tolerance,
    ))
}

pub(crate) fn parse_score(raw: &str) -> Result<u16, String> {
    let score = raw
        .trim()
        .parse::<u16>()
        .map_err(|err| format!("failed to parse '{raw}' as a score ({err})"))?;
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(format!("score must be between {MIN_SCORE} and {MAX_SCORE}"))
    }
}

pub(crate) fn format_inr(amount: f64) -> String {
    let rounded = amount.round().max(0.0) as u64;
    let digits = rounded.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }

    // Indian grouping: last three digits, then pairs.
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("₹{},{tail}", groups.join(","))
}
