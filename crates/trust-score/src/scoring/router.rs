use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::service::{CreditScoreService, QuoteRequest, ScoreRequest, ScoreServiceError};

/// Router exposing score derivation and loan quotes.
pub fn scoring_router(service: Arc<CreditScoreService>) -> Router {
    Router::new()
        .route("/api/v1/credit-score", post(score_handler))
        .route("/api/v1/loans/quote", post(quote_handler))
        .with_state(service)
}

pub(crate) async fn score_handler(
    State(service): State<Arc<CreditScoreService>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response {
    match service.score(&request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn quote_handler(
    State(service): State<Arc<CreditScoreService>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response {
    match service.quote(&request) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScoreServiceError) -> Response {
    let status = match error {
        ScoreServiceError::Ingest(_) => StatusCode::BAD_REQUEST,
        ScoreServiceError::Lending(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
