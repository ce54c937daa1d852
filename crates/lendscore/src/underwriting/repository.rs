use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationId, LoanApplication, LoanApplicationStatus, LoanAssessment, LoanDecision,
};

/// Repository record holding the application, its assessment, and status
/// metadata. The assessment stays immutable after creation; an admin
/// override is stored alongside it as a separate superseding decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub application: LoanApplication,
    pub status: LoanApplicationStatus,
    pub assessment: Option<LoanAssessment>,
    pub justification: Option<String>,
    pub admin_override: Option<AdminOverride>,
    pub received_at: NaiveDateTime,
}

/// Manual decision layered over the automated one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminOverride {
    pub final_status: LoanDecision,
    pub notes: Option<String>,
    pub decided_at: NaiveDateTime,
}

impl ApplicationRecord {
    /// Decision communicated outward: the override wins when present.
    pub fn effective_decision(&self) -> Option<LoanDecision> {
        if let Some(override_decision) = &self.admin_override {
            return Some(override_decision.final_status);
        }
        self.assessment
            .as_ref()
            .map(|assessment| assessment.decision.loan_decision)
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.application_id.clone(),
            status: self.status.label(),
            loan_decision: self.effective_decision().map(LoanDecision::label),
            risk_score: self
                .assessment
                .as_ref()
                .map(|assessment| assessment.breakdown.risk_score),
            justification: self.justification.clone(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait LoanApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn pending_review(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_decision: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}
