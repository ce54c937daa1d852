//! Explanation capability invoked after a decision exists.
//!
//! The numeric pipeline never depends on the prose, so the trait sits at
//! the service boundary: an LLM-backed generator can be plugged in by the
//! host process while tests and the default wiring stay fully offline.

use crate::underwriting::domain::{LoanAssessment, LoanApplication, LoanDecision};

/// Failure while producing prose. The service logs it and falls back to a
/// templated summary rather than failing the assessment.
#[derive(Debug, thiserror::Error)]
pub enum ExplainerError {
    #[error("explanation backend unavailable: {0}")]
    Unavailable(String),
}

/// Turns a structured assessment into a human-readable justification.
pub trait ExplanationGenerator: Send + Sync {
    fn explain(
        &self,
        application: &LoanApplication,
        assessment: &LoanAssessment,
    ) -> Result<String, ExplainerError>;
}

/// Deterministic template-based generator shipped as the default.
#[derive(Debug, Default, Clone)]
pub struct RuleBasedExplainer;

impl ExplanationGenerator for RuleBasedExplainer {
    fn explain(
        &self,
        _application: &LoanApplication,
        assessment: &LoanAssessment,
    ) -> Result<String, ExplainerError> {
        let decision = &assessment.decision;
        let risk_score = assessment.breakdown.risk_score;

        let mut explanation = match decision.loan_decision {
            LoanDecision::Yes => {
                let mut text = format!("Loan approved with risk score {risk_score}/100.");
                if !decision.key_positive_factors.is_empty() {
                    text.push_str(&format!(
                        " Key strengths: {}.",
                        join_factors(&decision.key_positive_factors, 3)
                    ));
                }
                if !decision.key_risk_factors.is_empty() {
                    text.push_str(&format!(
                        " Areas to monitor: {}.",
                        join_factors(&decision.key_risk_factors, 2)
                    ));
                }
                text
            }
            LoanDecision::No => {
                let mut text = format!("Loan rejected due to high risk score {risk_score}/100.");
                if !decision.key_risk_factors.is_empty() {
                    text.push_str(&format!(
                        " Primary concerns: {}.",
                        join_factors(&decision.key_risk_factors, 3)
                    ));
                }
                text.push_str(" Consider improving the financial profile before reapplying.");
                text
            }
        };

        explanation.push_str(&format!(
            " Recommendation: {}.",
            decision.recommendation.label()
        ));
        Ok(explanation)
    }
}

fn join_factors(factors: &[String], limit: usize) -> String {
    factors
        .iter()
        .take(limit)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}
