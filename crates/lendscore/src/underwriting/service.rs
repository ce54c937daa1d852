use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::assessment::{AssessmentEngine, AssessmentError};
use super::domain::{
    ApplicationId, LoanApplication, LoanApplicationStatus, LoanAssessment, LoanDecision,
    Recommendation,
};
use super::explainer::ExplanationGenerator;
use super::repository::{
    AdminOverride, ApplicationRecord, LoanApplicationRepository, RepositoryError,
};
use super::weights::{InvalidWeightError, WeightSnapshot};

/// Service composing the assessment engine, repository, and explanation
/// capability.
pub struct LoanService<R, X> {
    repository: Arc<R>,
    explainer: Arc<X>,
    engine: Arc<AssessmentEngine>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("LOAN-{id:06}"))
}

impl<R, X> LoanService<R, X>
where
    R: LoanApplicationRepository + 'static,
    X: ExplanationGenerator + 'static,
{
    pub fn new(repository: Arc<R>, explainer: Arc<X>, engine: Arc<AssessmentEngine>) -> Self {
        Self {
            repository,
            explainer,
            engine,
        }
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    /// Assess a new application end to end and persist the outcome.
    pub fn assess(
        &self,
        application: LoanApplication,
    ) -> Result<ApplicationRecord, LoanServiceError> {
        let application_id = next_application_id();
        let assessment = self.engine.assess(&application)?;

        info!(
            application_id = %application_id.0,
            decision = assessment.decision.loan_decision.label(),
            risk_score = assessment.breakdown.risk_score,
            category = assessment.breakdown.risk_category.label(),
            "application assessed"
        );

        let justification = match self.explainer.explain(&application, &assessment) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, application_id = %application_id.0, "explanation generation failed");
                fallback_justification(&assessment)
            }
        };

        let record = ApplicationRecord {
            application_id,
            application,
            status: status_for(&assessment),
            assessment: Some(assessment),
            justification: Some(justification),
            admin_override: None,
            received_at: chrono::Utc::now().naive_utc(),
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Fetch an application and current status for API responses.
    pub fn get(&self, application_id: &ApplicationId) -> Result<ApplicationRecord, LoanServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Layer a manual decision over the automated one. The stored
    /// assessment is left untouched; the override supersedes it.
    pub fn override_decision(
        &self,
        application_id: &ApplicationId,
        final_status: LoanDecision,
        notes: Option<String>,
    ) -> Result<ApplicationRecord, LoanServiceError> {
        let mut record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;

        record.admin_override = Some(AdminOverride {
            final_status,
            notes,
            decided_at: chrono::Utc::now().naive_utc(),
        });
        record.status = LoanApplicationStatus::Overridden;

        self.repository.update(record.clone())?;
        info!(
            application_id = %application_id.0,
            final_status = final_status.label(),
            "admin override recorded"
        );
        Ok(record)
    }

    /// Applications waiting on a reviewing officer.
    pub fn pending_review(
        &self,
        limit: usize,
    ) -> Result<Vec<ApplicationRecord>, LoanServiceError> {
        Ok(self.repository.pending_review(limit)?)
    }

    pub fn feature_weights(&self) -> WeightSnapshot {
        self.engine.weight_snapshot()
    }

    pub fn update_feature_weight(
        &self,
        feature_name: &str,
        weight: f64,
        description: Option<String>,
    ) -> Result<(), LoanServiceError> {
        self.engine.update_weight(feature_name, weight, description)?;
        info!(feature_name, weight, "feature weight updated");
        Ok(())
    }
}

fn status_for(assessment: &LoanAssessment) -> LoanApplicationStatus {
    if assessment.decision.recommendation == Recommendation::ConditionallyApprove {
        return LoanApplicationStatus::NeedsReview;
    }
    match assessment.decision.loan_decision {
        LoanDecision::Yes => LoanApplicationStatus::Approved,
        LoanDecision::No => LoanApplicationStatus::Rejected,
    }
}

fn fallback_justification(assessment: &LoanAssessment) -> String {
    format!(
        "Risk score {}/100 ({}); recommendation: {}.",
        assessment.breakdown.risk_score,
        assessment.breakdown.risk_category.label(),
        assessment.decision.recommendation.label()
    )
}

/// Error raised by the loan service.
#[derive(Debug, thiserror::Error)]
pub enum LoanServiceError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Weight(#[from] InvalidWeightError),
}
