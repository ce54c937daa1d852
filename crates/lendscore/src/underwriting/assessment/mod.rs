//! Risk assessment pipeline: transform, score, compose, decide, explain
//! factors — in that order, with no I/O past construction.

pub(crate) mod decision;
pub(crate) mod factors;
mod policy;
pub(crate) mod risk;

pub use policy::RiskPolicy;
pub use risk::MODEL_SCORE_FEATURE;

use std::sync::Arc;

use crate::underwriting::domain::{LoanApplication, LoanAssessment};
use crate::underwriting::features::{self, FeatureVector, TransformError};
use crate::underwriting::model::GradientBoostedModel;
use crate::underwriting::weights::{InvalidWeightError, WeightSnapshot, WeightStore};

/// Errors terminating a single assessment. Transform failures are the
/// caller's input to fix; an incomplete assessment is an internal defect
/// that must be logged, never papered over with a guessed decision.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("assessment incomplete: missing upstream value '{missing}'")]
    Incomplete { missing: String },
}

/// Injectable context owning the loaded model, the weight store, and the
/// decision policy. Safe to share across concurrent requests: scoring only
/// reads, and weight updates swap snapshots without blocking readers.
pub struct AssessmentEngine {
    model: Arc<GradientBoostedModel>,
    weights: Arc<WeightStore>,
    policy: RiskPolicy,
}

impl AssessmentEngine {
    pub fn new(model: Arc<GradientBoostedModel>, weights: Arc<WeightStore>, policy: RiskPolicy) -> Self {
        Self {
            model,
            weights,
            policy,
        }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Current admin weight snapshot.
    pub fn weight_snapshot(&self) -> WeightSnapshot {
        self.weights.snapshot()
    }

    /// Replace a single admin weight; readers mid-assessment keep the
    /// snapshot they started with.
    pub fn update_weight(
        &self,
        feature_name: &str,
        weight: f64,
        description: Option<String>,
    ) -> Result<(), InvalidWeightError> {
        self.weights.update(feature_name, weight, description)
    }

    /// Encode an application without scoring it. Exposed for callers that
    /// only need the vector (batch tooling, debugging endpoints).
    pub fn transform(
        &self,
        application: &LoanApplication,
    ) -> Result<FeatureVector, TransformError> {
        features::transform(application)
    }

    /// Raw model score for an already-transformed vector.
    pub fn raw_score(&self, vector: &FeatureVector) -> f64 {
        self.model.score(vector)
    }

    /// Full pipeline for one application. Deterministic for a fixed weight
    /// snapshot: identical input yields an identical assessment.
    pub fn assess(&self, application: &LoanApplication) -> Result<LoanAssessment, AssessmentError> {
        let vector = features::transform(application)?;
        let raw = self.model.score(&vector);
        let weights = self.weights.snapshot();
        let breakdown = risk::compose(&vector, raw, &weights, &self.policy);
        let decision = decision::decide(application, &vector, &breakdown, &self.policy)?;

        Ok(LoanAssessment {
            breakdown,
            decision,
        })
    }
}
