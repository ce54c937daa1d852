use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::underwriting::router::loan_router;

fn build_router() -> axum::Router {
    let (service, _) = build_service();
    loan_router(Arc::new(service))
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn predict_request(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/loans/predict")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serialize")))
        .expect("request")
}

#[tokio::test]
async fn predict_returns_the_full_payload() {
    let router = build_router();
    let payload = serde_json::to_value(strong_application()).expect("serialize");

    let response = router
        .oneshot(predict_request(&payload))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body.get("loan_decision"), Some(&json!("Yes")));
    assert_eq!(body.get("risk_score"), Some(&json!(20)));
    assert_eq!(body.get("risk_category"), Some(&json!("Low")));
    assert_eq!(body.get("recommendation"), Some(&json!("Approve")));
    assert!(body.get("application_id").is_some());
    assert!(body.get("justification").is_some());
    assert!(body.get("confidence_score").is_some());
    assert!(body.get("credit_risk_score").is_some());
    assert!(body.get("income_risk_score").is_some());
    assert!(body.get("employment_risk_score").is_some());
    assert!(body
        .get("key_positive_factors")
        .and_then(Value::as_array)
        .is_some());
    assert_eq!(body.get("suggested_loan_amount"), Some(&json!(750.0)));
}

#[tokio::test]
async fn predict_rejects_unknown_categories_naming_the_field() {
    let router = build_router();
    let mut application = strong_application();
    application.assets.collateral_type = "Yacht".to_string();
    let payload = serde_json::to_value(application).expect("serialize");

    let response = router
        .oneshot(predict_request(&payload))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json(response).await;
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .expect("error message");
    assert!(message.contains("collateral_type"));
    assert!(message.contains("Yacht"));
}

#[tokio::test]
async fn status_endpoint_round_trips_a_prediction() {
    let router = build_router();
    let payload = serde_json::to_value(strong_application()).expect("serialize");

    let response = router
        .clone()
        .oneshot(predict_request(&payload))
        .await
        .expect("router dispatch");
    let prediction = read_json(response).await;
    let application_id = prediction
        .get("application_id")
        .and_then(Value::as_str)
        .expect("application id")
        .to_string();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/loans/{application_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body.get("application_id"), Some(&json!(application_id)));
    assert_eq!(body.get("status"), Some(&json!("approved")));
    assert_eq!(body.get("loan_decision"), Some(&json!("Yes")));
}

#[tokio::test]
async fn status_endpoint_reports_missing_applications() {
    let router = build_router();
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/loans/LOAN-000000")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_decision_endpoint_overrides_a_rejection() {
    let router = build_router();
    let payload = serde_json::to_value(weak_application()).expect("serialize");

    let response = router
        .clone()
        .oneshot(predict_request(&payload))
        .await
        .expect("router dispatch");
    let prediction = read_json(response).await;
    assert_eq!(prediction.get("loan_decision"), Some(&json!("No")));
    let application_id = prediction
        .get("application_id")
        .and_then(Value::as_str)
        .expect("application id")
        .to_string();

    let override_payload = json!({
        "final_status": "Yes",
        "admin_notes": "income re-verified with employer"
    });
    let response = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/loans/{application_id}/admin-decision"))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(&override_payload).expect("serialize"),
                ))
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("overridden")));
    assert_eq!(body.get("loan_decision"), Some(&json!("Yes")));
}

#[tokio::test]
async fn pending_review_lists_conditional_applications() {
    let router = build_router();
    let payload = serde_json::to_value(moderate_application()).expect("serialize");

    let response = router
        .clone()
        .oneshot(predict_request(&payload))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/loans/review/pending?limit=5")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let listing = body.as_array().expect("array payload");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].get("status"), Some(&json!("needs_review")));
}

#[tokio::test]
async fn weight_endpoints_list_and_update() {
    let router = build_router();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/admin/weights")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body.get("credit_history")
            .and_then(|entry| entry.get("weight")),
        Some(&json!(2.5))
    );

    let update = json!({ "weight": 3.5, "description": "quarterly review" });
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/admin/weights/credit_history")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&update).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/admin/weights")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    let body = read_json(response).await;
    assert_eq!(
        body.get("credit_history")
            .and_then(|entry| entry.get("weight")),
        Some(&json!(3.5))
    );
}

#[tokio::test]
async fn invalid_weight_is_rejected_unchanged() {
    let router = build_router();
    let update = json!({ "weight": -2.0 });

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/admin/weights/credit_history")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&update).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/admin/weights")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    let body = read_json(response).await;
    assert_eq!(
        body.get("credit_history")
            .and_then(|entry| entry.get("weight")),
        Some(&json!(2.5))
    );
}
