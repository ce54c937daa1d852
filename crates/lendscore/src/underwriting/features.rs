//! Feature transformer: turns a raw [`LoanApplication`] into the fixed-order
//! numeric vector the scoring model was trained on.
//!
//! The schema below is a contract with the model artifact. The loader checks
//! the artifact's feature names against [`FEATURE_SCHEMA`] at startup, so a
//! retrained model with a different layout refuses to come up instead of
//! scoring garbage per request.

use serde::Serialize;

use super::domain::LoanApplication;

/// Canonical feature order: 35 encoded input features followed by 13
/// derived features.
pub const FEATURE_SCHEMA: [&str; 48] = [
    "gender",
    "age",
    "married",
    "dependents",
    "children",
    "education",
    "spouse_employed",
    "self_employed",
    "employment_type",
    "years_in_current_job",
    "employer_category",
    "industry",
    "applicant_income",
    "coapplicant_income",
    "monthly_expenses",
    "other_emis",
    "loan_amount",
    "loan_amount_term",
    "requested_interest_rate",
    "loan_purpose",
    "credit_score",
    "credit_history",
    "no_of_credit_cards",
    "loan_default_history",
    "avg_payment_delay_days",
    "has_vehicle",
    "has_life_insurance",
    "property_area",
    "collateral_type",
    "collateral_value",
    "bank_account_type",
    "bank_balance",
    "savings_score",
    "city_tier",
    "region_default_rate",
    "total_income",
    "net_income",
    "emi",
    "total_emi",
    "emi_income_ratio",
    "debt_to_income_ratio",
    "credit_utilization",
    "default_risk_score",
    "income_per_year_experience",
    "savings_capacity",
    "collateral_coverage",
    "age_group",
    "geographic_risk",
];

// Documented substitutes for optional fields, applied before any derived
// computation so the ratios below are always well-defined.
const DEFAULT_MONTHLY_EXPENSES: f64 = 0.0;
const DEFAULT_OTHER_EMIS: f64 = 0.0;
const DEFAULT_INTEREST_RATE: f64 = 10.5;
const DEFAULT_CREDIT_SCORE: f64 = 650.0;
const DEFAULT_PAYMENT_DELAY_DAYS: f64 = 0.0;
const DEFAULT_YEARS_IN_JOB: f64 = 1.0;
const DEFAULT_SAVINGS_SCORE: f64 = 0.0;
const DEFAULT_COLLATERAL_VALUE: f64 = 0.0;
const DEFAULT_BANK_BALANCE: f64 = 0.0;
const DEFAULT_REGION_DEFAULT_RATE: f64 = 5.0;

/// Errors raised while encoding an application.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("unknown value '{value}' for field '{field}'")]
    UnknownCategory { field: &'static str, value: String },
    #[error(
        "total declared income must be positive (applicant {applicant}, co-applicant {coapplicant})"
    )]
    NonPositiveIncome { applicant: f64, coapplicant: f64 },
}

/// Fixed-order numeric encoding of one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Look a feature up by schema name. Returns `None` for names outside
    /// the schema or vectors shorter than the feature's position.
    pub fn get(&self, feature: &str) -> Option<f64> {
        let index = FEATURE_SCHEMA.iter().position(|name| *name == feature)?;
        self.values.get(index).copied()
    }
}

// Ordinal vocabularies, fixed at training time. An unknown value is an
// error rather than a silent default.
const GENDER: &[(&str, f64)] = &[("Male", 1.0), ("Female", 0.0)];
const YES_NO: &[(&str, f64)] = &[("Yes", 1.0), ("No", 0.0)];
const EDUCATION: &[(&str, f64)] = &[("Graduate", 1.0), ("Not Graduate", 0.0)];
const PROPERTY_AREA: &[(&str, f64)] = &[("Urban", 2.0), ("Semiurban", 1.0), ("Rural", 0.0)];
const EMPLOYMENT_TYPE: &[(&str, f64)] = &[
    ("Government", 4.0),
    ("Salaried", 3.0),
    ("Self-Employed", 2.0),
    ("Business Owner", 1.0),
    ("Freelancer", 0.0),
];
const EMPLOYER_CATEGORY: &[(&str, f64)] = &[
    ("A", 4.0),
    ("MNC", 3.0),
    ("B", 2.0),
    ("SME", 1.0),
    ("C", 0.0),
];
const INDUSTRY: &[(&str, f64)] = &[
    ("Finance", 6.0),
    ("IT", 5.0),
    ("Government", 4.0),
    ("Healthcare", 3.0),
    ("Manufacturing", 2.0),
    ("Education", 1.0),
    ("Retail", 0.0),
    ("Others", 0.0),
];
const LOAN_PURPOSE: &[(&str, f64)] = &[
    ("Home", 5.0),
    ("Education", 4.0),
    ("Business", 3.0),
    ("Vehicle", 2.0),
    ("Personal", 1.0),
    ("Medical", 0.0),
    ("Others", 0.0),
];
const BANK_ACCOUNT_TYPE: &[(&str, f64)] = &[
    ("Premium", 3.0),
    ("Current", 2.0),
    ("Savings", 1.0),
    ("Basic", 0.0),
];
const COLLATERAL_TYPE: &[(&str, f64)] = &[
    ("Property", 3.0),
    ("Vehicle", 2.0),
    ("Fixed Deposit", 1.0),
    ("None", 0.0),
];
const CITY_TIER: &[(&str, f64)] = &[("Tier-1", 2.0), ("Tier-2", 1.0), ("Tier-3", 0.0)];

fn encode(
    field: &'static str,
    value: &str,
    vocabulary: &[(&str, f64)],
) -> Result<f64, TransformError> {
    vocabulary
        .iter()
        .find(|(name, _)| *name == value.trim())
        .map(|(_, encoded)| *encoded)
        .ok_or_else(|| TransformError::UnknownCategory {
            field,
            value: value.to_string(),
        })
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn age_group(age: u8) -> f64 {
    match age {
        0..=25 => 0.0,
        26..=35 => 1.0,
        36..=45 => 2.0,
        46..=55 => 3.0,
        _ => 4.0,
    }
}

/// Deterministic, I/O-free encoding of a raw application into the fixed
/// 48-feature vector.
pub fn transform(application: &LoanApplication) -> Result<FeatureVector, TransformError> {
    let demographics = &application.demographics;
    let employment = &application.employment;
    let financials = &application.financials;
    let terms = &application.terms;
    let credit = &application.credit;
    let assets = &application.assets;
    let geography = &application.geography;

    let total_income = financials.applicant_income + financials.coapplicant_income;
    if total_income <= 0.0 {
        return Err(TransformError::NonPositiveIncome {
            applicant: financials.applicant_income,
            coapplicant: financials.coapplicant_income,
        });
    }

    let monthly_expenses = financials.monthly_expenses.unwrap_or(DEFAULT_MONTHLY_EXPENSES);
    let other_emis = financials.other_emis.unwrap_or(DEFAULT_OTHER_EMIS);
    let years_in_job = employment
        .years_in_current_job
        .unwrap_or(DEFAULT_YEARS_IN_JOB);
    let credit_score = credit
        .credit_score
        .map(f64::from)
        .unwrap_or(DEFAULT_CREDIT_SCORE);
    let payment_delay = credit
        .avg_payment_delay_days
        .unwrap_or(DEFAULT_PAYMENT_DELAY_DAYS);
    let collateral_value = assets.collateral_value.unwrap_or(DEFAULT_COLLATERAL_VALUE);
    let bank_balance = assets.bank_balance.unwrap_or(DEFAULT_BANK_BALANCE);
    let savings_score = assets.savings_score.unwrap_or(DEFAULT_SAVINGS_SCORE);
    let region_default_rate = geography
        .region_default_rate
        .unwrap_or(DEFAULT_REGION_DEFAULT_RATE);

    // `loan_amount` arrives in thousands; range validation (positive term,
    // positive amount) happens upstream, so a degenerate term collapses the
    // EMI to zero instead of producing an unbounded value.
    let mut emi = terms.loan_amount * 1000.0 / terms.loan_amount_term;
    if !emi.is_finite() {
        emi = 0.0;
    }
    let total_emi = emi + other_emis;
    let emi_income_ratio = total_emi / total_income;
    let debt_to_income_ratio = (monthly_expenses + other_emis) / total_income;
    let credit_utilization = f64::from(credit.no_of_credit_cards) / 10.0;
    let default_risk_score =
        f64::from(credit.loan_default_history) * 20.0 + payment_delay / 30.0 * 10.0;
    let income_per_year_experience = total_income / (years_in_job + 1.0);
    let savings_capacity = savings_score / 100.0 * total_income;
    let collateral_coverage = collateral_value / (terms.loan_amount * 1000.0 + 1.0);

    let mut values = Vec::with_capacity(FEATURE_SCHEMA.len());

    values.push(encode("gender", &demographics.gender, GENDER)?);
    values.push(f64::from(demographics.age));
    values.push(encode("married", &demographics.married, YES_NO)?);
    values.push(f64::from(demographics.dependents));
    values.push(f64::from(demographics.children));
    values.push(encode("education", &demographics.education, EDUCATION)?);
    values.push(flag(demographics.spouse_employed));

    values.push(encode("self_employed", &employment.self_employed, YES_NO)?);
    values.push(encode(
        "employment_type",
        &employment.employment_type,
        EMPLOYMENT_TYPE,
    )?);
    values.push(years_in_job);
    values.push(encode(
        "employer_category",
        &employment.employer_category,
        EMPLOYER_CATEGORY,
    )?);
    values.push(encode("industry", &employment.industry, INDUSTRY)?);

    values.push(financials.applicant_income);
    values.push(financials.coapplicant_income);
    values.push(monthly_expenses);
    values.push(other_emis);

    values.push(terms.loan_amount);
    values.push(terms.loan_amount_term);
    values.push(
        terms
            .requested_interest_rate
            .unwrap_or(DEFAULT_INTEREST_RATE),
    );
    values.push(encode("loan_purpose", &terms.loan_purpose, LOAN_PURPOSE)?);

    values.push(credit_score);
    values.push(f64::from(credit.credit_history.min(1)));
    values.push(f64::from(credit.no_of_credit_cards));
    values.push(f64::from(credit.loan_default_history));
    values.push(payment_delay);

    values.push(flag(assets.has_vehicle));
    values.push(flag(assets.has_life_insurance));
    values.push(encode("property_area", &assets.property_area, PROPERTY_AREA)?);
    values.push(encode(
        "collateral_type",
        &assets.collateral_type,
        COLLATERAL_TYPE,
    )?);
    values.push(collateral_value);
    values.push(encode(
        "bank_account_type",
        &assets.bank_account_type,
        BANK_ACCOUNT_TYPE,
    )?);
    values.push(bank_balance);
    values.push(savings_score);

    values.push(encode("city_tier", &geography.city_tier, CITY_TIER)?);
    values.push(region_default_rate);

    values.push(total_income);
    values.push(total_income - monthly_expenses);
    values.push(emi);
    values.push(total_emi);
    values.push(emi_income_ratio);
    values.push(debt_to_income_ratio);
    values.push(credit_utilization);
    values.push(default_risk_score);
    values.push(income_per_year_experience);
    values.push(savings_capacity);
    values.push(collateral_coverage);
    values.push(age_group(demographics.age));
    values.push(region_default_rate / 100.0);

    debug_assert_eq!(values.len(), FEATURE_SCHEMA.len());

    Ok(FeatureVector { values })
}
