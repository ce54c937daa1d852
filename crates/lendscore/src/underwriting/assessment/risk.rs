//! Risk composer: blends the model's raw score with weighted sub-scores.
//!
//! Each sub-score is a weighted mean over a fixed constituent table. A
//! constituent's contribution is its normalized risk value (0 = benign,
//! 1 = maximally risky) times its base weight times the admin weight for
//! that feature name. The model's raw score joins every table under the
//! reserved name `model_score` so admins can tune its pull as well.

use crate::underwriting::domain::RiskBreakdown;
use crate::underwriting::features::FeatureVector;
use crate::underwriting::weights::WeightSnapshot;

use super::policy::RiskPolicy;

/// Reserved constituent name for the raw model score.
pub const MODEL_SCORE_FEATURE: &str = "model_score";

struct Constituent {
    feature: &'static str,
    base_weight: f64,
    normalize: fn(f64) -> f64,
}

const CREDIT_CONSTITUENTS: &[Constituent] = &[
    Constituent {
        feature: "credit_score",
        base_weight: 3.0,
        normalize: |v| ((850.0 - v) / 550.0).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "credit_history",
        base_weight: 2.5,
        normalize: |v| 1.0 - v.clamp(0.0, 1.0),
    },
    Constituent {
        feature: "loan_default_history",
        base_weight: 2.0,
        normalize: |v| (v / 3.0).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "avg_payment_delay_days",
        base_weight: 1.0,
        normalize: |v| (v / 30.0).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "credit_utilization",
        base_weight: 0.5,
        normalize: |v| v.clamp(0.0, 1.0),
    },
];

const INCOME_CONSTITUENTS: &[Constituent] = &[
    Constituent {
        feature: "emi_income_ratio",
        base_weight: 2.0,
        normalize: |v| (v / 0.8).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "debt_to_income_ratio",
        base_weight: 2.0,
        normalize: |v| v.clamp(0.0, 1.0),
    },
    Constituent {
        feature: "total_income",
        base_weight: 1.5,
        normalize: |v| (1.0 - v / 100_000.0).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "savings_score",
        base_weight: 1.0,
        normalize: |v| (1.0 - v / 25.0).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "bank_balance",
        base_weight: 0.5,
        normalize: |v| (1.0 - v / 500_000.0).clamp(0.0, 1.0),
    },
];

const EMPLOYMENT_CONSTITUENTS: &[Constituent] = &[
    Constituent {
        feature: "employment_type",
        base_weight: 1.5,
        normalize: |v| ((4.0 - v) / 4.0).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "years_in_current_job",
        base_weight: 1.5,
        normalize: |v| (1.0 - v / 10.0).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "employer_category",
        base_weight: 1.0,
        normalize: |v| ((4.0 - v) / 4.0).clamp(0.0, 1.0),
    },
    Constituent {
        feature: "industry",
        base_weight: 0.5,
        normalize: |v| ((6.0 - v) / 6.0).clamp(0.0, 1.0),
    },
];

fn sub_score(
    constituents: &[Constituent],
    vector: &FeatureVector,
    raw_score: f64,
    weights: &WeightSnapshot,
) -> f64 {
    let mut weighted_risk = 0.0;
    let mut total_weight = 0.0;

    for constituent in constituents {
        let value = vector.get(constituent.feature).unwrap_or(0.0);
        let weight = constituent.base_weight * weights.weight_for(constituent.feature);
        weighted_risk += (constituent.normalize)(value) * weight;
        total_weight += weight;
    }

    let model_weight = weights.weight_for(MODEL_SCORE_FEATURE);
    weighted_risk += raw_score.clamp(0.0, 1.0) * model_weight;
    total_weight += model_weight;

    if total_weight <= 0.0 {
        return 0.0;
    }
    (weighted_risk / total_weight * 100.0).clamp(0.0, 100.0)
}

/// Combine the raw model score with the category sub-scores into the full
/// breakdown.
pub fn compose(
    vector: &FeatureVector,
    raw_score: f64,
    weights: &WeightSnapshot,
    policy: &RiskPolicy,
) -> RiskBreakdown {
    let credit = sub_score(CREDIT_CONSTITUENTS, vector, raw_score, weights);
    let income = sub_score(INCOME_CONSTITUENTS, vector, raw_score, weights);
    let employment = sub_score(EMPLOYMENT_CONSTITUENTS, vector, raw_score, weights);

    let blended = policy.model_blend * raw_score.clamp(0.0, 1.0) * 100.0
        + policy.credit_blend * credit
        + policy.income_blend * income
        + policy.employment_blend * employment;
    let risk_score = blended.round().clamp(0.0, 100.0) as u8;

    RiskBreakdown {
        credit_risk_score: credit,
        income_risk_score: income,
        employment_risk_score: employment,
        risk_score,
        risk_category: policy.categorize(f64::from(risk_score)),
    }
}
