use serde::{Deserialize, Serialize};

use crate::underwriting::domain::RiskCategory;

/// Tunable policy constants for composing and acting on the risk score.
///
/// The blend coefficients and band edges are fixed business policy, not
/// values derived at runtime; the defaults below are locked in by the
/// engine's scenario tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Share of the overall score taken from the model's raw score.
    pub model_blend: f64,
    /// Share taken from the credit sub-score.
    pub credit_blend: f64,
    /// Share taken from the income sub-score.
    pub income_blend: f64,
    /// Share taken from the employment sub-score.
    pub employment_blend: f64,
    /// Scores strictly below this are Low risk; this is also the approval
    /// threshold (decision is Yes iff score <= this value).
    pub low_risk_ceiling: f64,
    /// Scores above `low_risk_ceiling` up to and including this are Medium.
    pub medium_risk_ceiling: f64,
    /// Upper edge of the conditionally-approve band, exclusive with the
    /// approval threshold below it.
    pub conditional_ceiling: f64,
    /// Share of total income that may serve EMIs when sizing a suggestion.
    pub emi_cap_share: f64,
    /// Fraction of collateral value credited toward the suggestion.
    pub collateral_uplift_share: f64,
    /// Suggested amount never exceeds the requested amount times this.
    pub suggestion_cap_multiple: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            model_blend: 0.4,
            credit_blend: 0.2,
            income_blend: 0.2,
            employment_blend: 0.2,
            low_risk_ceiling: 30.0,
            medium_risk_ceiling: 60.0,
            conditional_ceiling: 45.0,
            emi_cap_share: 0.4,
            collateral_uplift_share: 0.2,
            suggestion_cap_multiple: 1.5,
        }
    }
}

impl RiskPolicy {
    /// Approval threshold: Yes iff the score is at or below the Low/Medium
    /// band edge.
    pub fn approval_threshold(&self) -> f64 {
        self.low_risk_ceiling
    }

    /// Band assignment. A score sitting exactly on an edge belongs to the
    /// band below it: 30 is Medium, 60 is Medium.
    pub fn categorize(&self, risk_score: f64) -> RiskCategory {
        if risk_score < self.low_risk_ceiling {
            RiskCategory::Low
        } else if risk_score <= self.medium_risk_ceiling {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }
}
