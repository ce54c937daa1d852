//! Loan application underwriting: feature encoding, model scoring, risk
//! composition, rule-based decisioning, and the service facade around them.

pub mod assessment;
pub mod batch;
pub mod domain;
pub mod explainer;
pub mod features;
pub mod model;
pub mod repository;
pub mod router;
pub mod service;
pub mod weights;

#[cfg(test)]
mod tests;

pub use assessment::{AssessmentEngine, AssessmentError, RiskPolicy};
pub use domain::{
    ApplicationId, AssetProfile, CreditProfile, DecisionResult, Demographics, EmploymentProfile,
    FinancialProfile, GeoProfile, LoanApplication, LoanApplicationStatus, LoanAssessment,
    LoanDecision, LoanTerms, Recommendation, RiskBreakdown, RiskCategory,
};
pub use explainer::{ExplainerError, ExplanationGenerator, RuleBasedExplainer};
pub use features::{transform, FeatureVector, TransformError, FEATURE_SCHEMA};
pub use model::{GradientBoostedModel, ModelLoadError};
pub use repository::{
    AdminOverride, ApplicationRecord, ApplicationStatusView, LoanApplicationRepository,
    RepositoryError,
};
pub use router::{loan_router, PredictionView};
pub use service::{LoanService, LoanServiceError};
pub use weights::{
    default_weights, FeatureWeight, InvalidWeightError, WeightSnapshot, WeightStore,
};
