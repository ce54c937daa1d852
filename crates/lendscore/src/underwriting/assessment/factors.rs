//! Factor extractor: named predicates explaining what drove the decision.
//!
//! Rules are a fixed, ordered table evaluated uniformly; earlier entries
//! win when more than [`MAX_FACTORS`] match. Labels feed the downstream
//! explanation generator and the API payload verbatim.

use crate::underwriting::domain::{LoanApplication, RiskBreakdown};

use super::decision::Signals;

/// Cap per polarity so explanations stay scannable.
pub(crate) const MAX_FACTORS: usize = 5;

enum Polarity {
    Positive,
    Risk,
}

struct FactorRule {
    label: &'static str,
    polarity: Polarity,
    applies: fn(&LoanApplication, &RiskBreakdown, &Signals) -> bool,
}

const FACTOR_RULES: &[FactorRule] = &[
    FactorRule {
        label: "Excellent credit score",
        polarity: Polarity::Positive,
        applies: |_, _, signals| signals.credit_score >= 750.0,
    },
    FactorRule {
        label: "Consistent credit history with no defaults",
        polarity: Polarity::Positive,
        applies: |application, _, _| {
            application.credit.credit_history == 1
                && application.credit.loan_default_history == 0
        },
    },
    FactorRule {
        label: "Low debt-to-income ratio",
        polarity: Polarity::Positive,
        applies: |_, _, signals| signals.debt_to_income_ratio <= 0.3,
    },
    FactorRule {
        label: "Strong collateral coverage",
        polarity: Polarity::Positive,
        applies: |_, _, signals| signals.collateral_coverage >= 1.0,
    },
    FactorRule {
        label: "Stable employment tenure",
        polarity: Polarity::Positive,
        applies: |_, _, signals| signals.years_in_current_job >= 5.0,
    },
    FactorRule {
        label: "Healthy savings pattern",
        polarity: Polarity::Positive,
        applies: |_, _, signals| signals.savings_score >= 15.0,
    },
    FactorRule {
        label: "Adequate household income",
        polarity: Polarity::Positive,
        applies: |_, _, signals| signals.total_income >= 50_000.0,
    },
    FactorRule {
        label: "No credit history on file",
        polarity: Polarity::Risk,
        applies: |application, _, _| application.credit.credit_history == 0,
    },
    FactorRule {
        label: "Previous loan defaults",
        polarity: Polarity::Risk,
        applies: |application, _, _| application.credit.loan_default_history >= 1,
    },
    FactorRule {
        label: "High debt-to-income ratio",
        polarity: Polarity::Risk,
        applies: |_, _, signals| signals.debt_to_income_ratio > 0.5,
    },
    FactorRule {
        label: "Elevated EMI burden",
        polarity: Polarity::Risk,
        applies: |_, _, signals| signals.emi_income_ratio > 0.4,
    },
    FactorRule {
        label: "Frequent payment delays",
        polarity: Polarity::Risk,
        applies: |_, _, signals| signals.avg_payment_delay_days > 15.0,
    },
    FactorRule {
        label: "No collateral offered",
        polarity: Polarity::Risk,
        applies: |_, _, signals| signals.collateral_value <= 0.0,
    },
    FactorRule {
        label: "Low household income",
        polarity: Polarity::Risk,
        applies: |_, _, signals| signals.total_income < 20_000.0,
    },
    FactorRule {
        label: "High regional default rate",
        polarity: Polarity::Risk,
        applies: |_, _, signals| signals.region_default_rate > 6.0,
    },
    FactorRule {
        label: "Overall risk assessed as high",
        polarity: Polarity::Risk,
        applies: |_, breakdown, _| breakdown.risk_score > 60,
    },
];

/// Evaluate the rule table in declaration order, returning the matched
/// (positive, risk) labels capped at [`MAX_FACTORS`] each.
pub(crate) fn extract(
    application: &LoanApplication,
    breakdown: &RiskBreakdown,
    signals: &Signals,
) -> (Vec<String>, Vec<String>) {
    let mut positive = Vec::new();
    let mut risk = Vec::new();

    for rule in FACTOR_RULES {
        let bucket = match rule.polarity {
            Polarity::Positive => &mut positive,
            Polarity::Risk => &mut risk,
        };
        if bucket.len() >= MAX_FACTORS {
            continue;
        }
        if (rule.applies)(application, breakdown, signals) {
            bucket.push(rule.label.to_string());
        }
    }

    (positive, risk)
}
