//! Decision engine: hard business rules first, then the score-based policy.

use crate::underwriting::domain::{DecisionResult, LoanApplication, LoanDecision, Recommendation, RiskBreakdown};
use crate::underwriting::features::{FeatureVector, FEATURE_SCHEMA};

use super::factors;
use super::policy::RiskPolicy;
use super::AssessmentError;

/// Fixed confidence reported when a hard rule forced the rejection; the
/// score's distance to a band edge is irrelevant in that case.
const HARD_REJECT_CONFIDENCE: f64 = 0.95;

/// Derived values the decision engine and factor rules read. Everything is
/// pulled from the transformed vector so a truncated vector surfaces as an
/// incomplete assessment instead of a silently defaulted decision.
pub(crate) struct Signals {
    pub(crate) total_income: f64,
    pub(crate) other_emis: f64,
    pub(crate) emi_income_ratio: f64,
    pub(crate) debt_to_income_ratio: f64,
    pub(crate) collateral_value: f64,
    pub(crate) collateral_coverage: f64,
    pub(crate) credit_score: f64,
    pub(crate) avg_payment_delay_days: f64,
    pub(crate) savings_score: f64,
    pub(crate) region_default_rate: f64,
    pub(crate) years_in_current_job: f64,
}

impl Signals {
    pub(crate) fn from_vector(vector: &FeatureVector) -> Result<Self, AssessmentError> {
        if vector.len() != FEATURE_SCHEMA.len() {
            return Err(AssessmentError::Incomplete {
                missing: format!(
                    "feature vector has {} of {} entries",
                    vector.len(),
                    FEATURE_SCHEMA.len()
                ),
            });
        }

        let read = |feature: &'static str| {
            vector.get(feature).ok_or(AssessmentError::Incomplete {
                missing: feature.to_string(),
            })
        };

        Ok(Self {
            total_income: read("total_income")?,
            other_emis: read("other_emis")?,
            emi_income_ratio: read("emi_income_ratio")?,
            debt_to_income_ratio: read("debt_to_income_ratio")?,
            collateral_value: read("collateral_value")?,
            collateral_coverage: read("collateral_coverage")?,
            credit_score: read("credit_score")?,
            avg_payment_delay_days: read("avg_payment_delay_days")?,
            savings_score: read("savings_score")?,
            region_default_rate: read("region_default_rate")?,
            years_in_current_job: read("years_in_current_job")?,
        })
    }
}

struct HardRejectRule {
    label: &'static str,
    triggered: fn(&LoanApplication, &Signals) -> bool,
}

// Finite, documented rule list. These dominate the score: a triggered rule
// forces rejection no matter what the model or composer said.
const HARD_REJECT_RULES: &[HardRejectRule] = &[
    HardRejectRule {
        label: "No credit track record with repeated loan defaults",
        triggered: |application, _| {
            application.credit.credit_history == 0
                && application.credit.loan_default_history >= 2
        },
    },
    HardRejectRule {
        label: "Debt service including the requested EMI exceeds 80% of income",
        triggered: |_, signals| signals.emi_income_ratio > 0.8,
    },
];

pub(crate) fn decide(
    application: &LoanApplication,
    vector: &FeatureVector,
    breakdown: &RiskBreakdown,
    policy: &RiskPolicy,
) -> Result<DecisionResult, AssessmentError> {
    let signals = Signals::from_vector(vector)?;
    let risk_score = f64::from(breakdown.risk_score);
    let threshold = policy.approval_threshold();

    let (key_positive_factors, mut key_risk_factors) =
        factors::extract(application, breakdown, &signals);

    let suggested_loan_amount = suggested_amount(application, &signals, policy);

    if let Some(rule) = HARD_REJECT_RULES
        .iter()
        .find(|rule| (rule.triggered)(application, &signals))
    {
        key_risk_factors.insert(0, rule.label.to_string());
        key_risk_factors.truncate(factors::MAX_FACTORS);
        return Ok(DecisionResult {
            loan_decision: LoanDecision::No,
            recommendation: Recommendation::Reject,
            confidence_score: HARD_REJECT_CONFIDENCE,
            suggested_loan_amount,
            debt_to_income_ratio: signals.debt_to_income_ratio,
            key_risk_factors,
            key_positive_factors,
        });
    }

    let loan_decision = if risk_score <= threshold {
        LoanDecision::Yes
    } else {
        LoanDecision::No
    };
    let recommendation = if risk_score <= threshold {
        Recommendation::Approve
    } else if risk_score <= policy.conditional_ceiling {
        Recommendation::ConditionallyApprove
    } else {
        Recommendation::Reject
    };

    Ok(DecisionResult {
        loan_decision,
        recommendation,
        confidence_score: confidence_from_distance(risk_score, threshold),
        suggested_loan_amount,
        debt_to_income_ratio: signals.debt_to_income_ratio,
        key_risk_factors,
        key_positive_factors,
    })
}

/// Confidence grows linearly with the score's distance from the approval
/// boundary: 0.5 exactly on the boundary, capped at 0.99 at either extreme.
fn confidence_from_distance(risk_score: f64, threshold: f64) -> f64 {
    let span = if risk_score <= threshold {
        threshold
    } else {
        100.0 - threshold
    };
    if span <= 0.0 {
        return 0.5;
    }
    let ratio = ((risk_score - threshold).abs() / span).clamp(0.0, 1.0);
    (0.5 + 0.5 * ratio).min(0.99)
}

/// Size a suggestion from verified income and collateral, independent of
/// the Yes/No outcome. Expressed in thousands like the requested amount,
/// and never more than the policy cap relative to the request.
fn suggested_amount(
    application: &LoanApplication,
    signals: &Signals,
    policy: &RiskPolicy,
) -> f64 {
    let headroom_emi = (signals.total_income * policy.emi_cap_share - signals.other_emis).max(0.0);
    let affordable = headroom_emi * application.terms.loan_amount_term / 1000.0;
    let uplift = signals.collateral_value * policy.collateral_uplift_share / 1000.0;
    let cap = application.terms.loan_amount * policy.suggestion_cap_multiple;
    (affordable + uplift).min(cap).max(0.0).round()
}
