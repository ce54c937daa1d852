use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::assessment::AssessmentError;
use super::domain::{ApplicationId, LoanApplication, LoanDecision, Recommendation, RiskCategory};
use super::explainer::ExplanationGenerator;
use super::repository::{ApplicationRecord, LoanApplicationRepository, RepositoryError};
use super::service::{LoanService, LoanServiceError};

/// Router builder exposing HTTP endpoints for prediction, lookup, admin
/// overrides, and weight tuning.
pub fn loan_router<R, X>(service: Arc<LoanService<R, X>>) -> Router
where
    R: LoanApplicationRepository + 'static,
    X: ExplanationGenerator + 'static,
{
    Router::new()
        .route("/api/v1/loans/predict", post(predict_handler::<R, X>))
        .route(
            "/api/v1/loans/review/pending",
            get(pending_review_handler::<R, X>),
        )
        .route(
            "/api/v1/loans/:application_id",
            get(status_handler::<R, X>),
        )
        .route(
            "/api/v1/loans/:application_id/admin-decision",
            put(admin_decision_handler::<R, X>),
        )
        .route("/api/v1/admin/weights", get(list_weights_handler::<R, X>))
        .route(
            "/api/v1/admin/weights/:feature_name",
            put(update_weight_handler::<R, X>),
        )
        .with_state(service)
}

/// Full prediction payload returned to the caller, one field per datum the
/// downstream systems consume.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub application_id: ApplicationId,
    pub loan_decision: LoanDecision,
    pub risk_score: u8,
    pub risk_category: RiskCategory,
    pub justification: Option<String>,
    pub recommendation: Recommendation,
    pub confidence_score: f64,
    pub key_risk_factors: Vec<String>,
    pub key_positive_factors: Vec<String>,
    pub suggested_loan_amount: f64,
    pub debt_to_income_ratio: f64,
    pub credit_risk_score: f64,
    pub income_risk_score: f64,
    pub employment_risk_score: f64,
}

impl PredictionView {
    fn from_record(record: &ApplicationRecord) -> Option<Self> {
        let assessment = record.assessment.as_ref()?;
        Some(Self {
            application_id: record.application_id.clone(),
            loan_decision: assessment.decision.loan_decision,
            risk_score: assessment.breakdown.risk_score,
            risk_category: assessment.breakdown.risk_category,
            justification: record.justification.clone(),
            recommendation: assessment.decision.recommendation,
            confidence_score: assessment.decision.confidence_score,
            key_risk_factors: assessment.decision.key_risk_factors.clone(),
            key_positive_factors: assessment.decision.key_positive_factors.clone(),
            suggested_loan_amount: assessment.decision.suggested_loan_amount,
            debt_to_income_ratio: assessment.decision.debt_to_income_ratio,
            credit_risk_score: assessment.breakdown.credit_risk_score,
            income_risk_score: assessment.breakdown.income_risk_score,
            employment_risk_score: assessment.breakdown.employment_risk_score,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminDecisionRequest {
    pub(crate) final_status: LoanDecision,
    #[serde(default)]
    pub(crate) admin_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PendingQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeightUpdateRequest {
    pub(crate) weight: f64,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

pub(crate) async fn predict_handler<R, X>(
    State(service): State<Arc<LoanService<R, X>>>,
    axum::Json(application): axum::Json<LoanApplication>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    X: ExplanationGenerator + 'static,
{
    match service.assess(application) {
        Ok(record) => match PredictionView::from_record(&record) {
            Some(view) => (StatusCode::OK, axum::Json(view)).into_response(),
            None => internal_error(),
        },
        Err(LoanServiceError::Assessment(AssessmentError::Transform(err))) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(LoanServiceError::Assessment(err @ AssessmentError::Incomplete { .. })) => {
            error!(%err, "assessment invariant violated");
            internal_error()
        }
        Err(LoanServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "application already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(err = %other, "prediction failed");
            internal_error()
        }
    }
}

pub(crate) async fn status_handler<R, X>(
    State(service): State<Arc<LoanService<R, X>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    X: ExplanationGenerator + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(LoanServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "application not found", "application_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(err = %other, "status lookup failed");
            internal_error()
        }
    }
}

pub(crate) async fn admin_decision_handler<R, X>(
    State(service): State<Arc<LoanService<R, X>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<AdminDecisionRequest>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    X: ExplanationGenerator + 'static,
{
    let id = ApplicationId(application_id);
    match service.override_decision(&id, request.final_status, request.admin_notes) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(LoanServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "application not found", "application_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(err = %other, "admin override failed");
            internal_error()
        }
    }
}

pub(crate) async fn pending_review_handler<R, X>(
    State(service): State<Arc<LoanService<R, X>>>,
    Query(query): Query<PendingQuery>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    X: ExplanationGenerator + 'static,
{
    let limit = query.limit.unwrap_or(50);
    match service.pending_review(limit) {
        Ok(records) => {
            let views: Vec<_> = records
                .iter()
                .map(ApplicationRecord::status_view)
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => {
            error!(err = %other, "pending review listing failed");
            internal_error()
        }
    }
}

pub(crate) async fn list_weights_handler<R, X>(
    State(service): State<Arc<LoanService<R, X>>>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    X: ExplanationGenerator + 'static,
{
    let snapshot = service.feature_weights();
    (StatusCode::OK, axum::Json(snapshot.entries().clone())).into_response()
}

pub(crate) async fn update_weight_handler<R, X>(
    State(service): State<Arc<LoanService<R, X>>>,
    Path(feature_name): Path<String>,
    axum::Json(request): axum::Json<WeightUpdateRequest>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    X: ExplanationGenerator + 'static,
{
    match service.update_feature_weight(&feature_name, request.weight, request.description) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(LoanServiceError::Weight(err)) => {
            let payload = json!({ "error": err.to_string(), "feature_name": feature_name });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(err = %other, "weight update failed");
            internal_error()
        }
    }
}

// Internal defects return a generic message; details stay in the server log.
fn internal_error() -> Response {
    let payload = json!({ "error": "internal error" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
