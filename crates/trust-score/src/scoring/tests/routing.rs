use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::lending::{LoanApplication, LoanPurpose};
use crate::scoring::router::{quote_handler, score_handler};
use crate::scoring::{LoanEligibility, QuoteRequest, ScoreRequest, SourcePreference};

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

fn eligible_terms() -> LoanEligibility {
    LoanEligibility {
        eligible: true,
        max_amount: 60_000.0,
        max_duration_months: 24,
        interest_rate: 14.0,
        monthly_emi: 0.0,
        disposable_income: 8_000.0,
    }
}

#[tokio::test]
async fn score_route_returns_report() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/credit-score",
            &json!({
                "subject_id": SUBJECT,
                "transactions": statement_payload(),
                "prior_score": 700,
                "recent_limit": 3
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let score = payload["result"]["score"].as_u64().expect("numeric score");
    assert!((300..=900).contains(&score));
    assert_eq!(payload["source"], "local");
    assert_eq!(payload["result"]["prior_score"], 700);
    assert_eq!(
        payload["recent_transactions"]
            .as_array()
            .map(|entries| entries.len()),
        Some(3)
    );
    assert!(payload["message"].as_str().is_some());
    assert!(payload["suggestions"]
        .as_array()
        .is_some_and(|entries| !entries.is_empty()));
}

#[tokio::test]
async fn score_route_rejects_non_list_transactions() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/credit-score",
            &json!({ "subject_id": SUBJECT, "transactions": "none" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|error| error.contains("list")));
}

#[tokio::test]
async fn score_handler_reports_skipped_records() {
    let service = Arc::new(service(SourcePreference::Local));
    let request = ScoreRequest {
        subject_id: SUBJECT.to_string(),
        transactions: json!([
            { "Timestamp": "2025-01-01", "Sender UPI ID": SUBJECT, "Receiver UPI ID": "a@upi",
              "Amount (INR)": "abc", "Status": "SUCCESS" }
        ]),
        prior_score: None,
        recent_limit: None,
        remote: None,
    };

    let response = score_handler(State(service), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result"]["score"], 300);
    assert_eq!(payload["skipped"][0]["index"], 0);
    assert_eq!(payload["skipped"][0]["defect"]["kind"], "invalid_amount");
}

#[tokio::test]
async fn quote_route_prices_valid_application() {
    let body = serde_json::to_value(QuoteRequest {
        eligibility: eligible_terms(),
        application: LoanApplication {
            amount: 50_000.0,
            term_months: 12,
            purpose: Some(LoanPurpose::Medical),
        },
    })
    .expect("serialize quote");

    let response = router()
        .oneshot(post_json("/api/v1/loans/quote", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let emi = payload["monthly_emi"].as_f64().expect("emi");
    assert!((emi - 4_489.0).abs() < 1.0, "emi was {emi}");
    assert_eq!(payload["purpose"], "Medical Expenses");
}

#[tokio::test]
async fn quote_handler_rejects_out_of_range_application() {
    let service = Arc::new(service(SourcePreference::Local));
    let request = QuoteRequest {
        eligibility: eligible_terms(),
        application: LoanApplication {
            amount: 75_000.0,
            term_months: 12,
            purpose: Some(LoanPurpose::Travel),
        },
    };

    let response = quote_handler(State(service), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
