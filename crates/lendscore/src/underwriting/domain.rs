use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted loan applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Raw application record as received from the intake surface.
///
/// Categorical fields are carried as the applicant-facing strings and only
/// resolved against the encoding vocabulary inside the feature transformer,
/// so an out-of-vocabulary value can be reported back by field name instead
/// of silently corrupting the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub demographics: Demographics,
    pub employment: EmploymentProfile,
    pub financials: FinancialProfile,
    pub terms: LoanTerms,
    pub credit: CreditProfile,
    pub assets: AssetProfile,
    pub geography: GeoProfile,
}

/// Household demographics captured uniformly across applicants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub gender: String,
    pub age: u8,
    pub married: String,
    pub dependents: u8,
    #[serde(default)]
    pub children: u8,
    pub education: String,
    #[serde(default)]
    pub spouse_employed: bool,
}

/// Employment type, tenure, and employer quality signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentProfile {
    pub self_employed: String,
    pub employment_type: String,
    #[serde(default)]
    pub years_in_current_job: Option<f64>,
    pub employer_category: String,
    pub industry: String,
}

/// Declared monthly income and standing obligations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub applicant_income: f64,
    #[serde(default)]
    pub coapplicant_income: f64,
    #[serde(default)]
    pub monthly_expenses: Option<f64>,
    #[serde(default)]
    pub other_emis: Option<f64>,
}

/// Requested loan terms. `loan_amount` is expressed in thousands, matching
/// the unit the scoring model was trained with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_amount: f64,
    pub loan_amount_term: f64,
    #[serde(default)]
    pub requested_interest_rate: Option<f64>,
    pub loan_purpose: String,
}

/// Bureau-style credit profile. `credit_history` is the binary
/// has-a-track-record flag, distinct from the numeric `credit_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditProfile {
    #[serde(default)]
    pub credit_score: Option<u16>,
    pub credit_history: u8,
    #[serde(default)]
    pub no_of_credit_cards: u8,
    #[serde(default)]
    pub loan_default_history: u8,
    #[serde(default)]
    pub avg_payment_delay_days: Option<f64>,
}

/// Assets, banking relationship, and offered collateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    #[serde(default)]
    pub has_vehicle: bool,
    #[serde(default)]
    pub has_life_insurance: bool,
    pub property_area: String,
    pub collateral_type: String,
    #[serde(default)]
    pub collateral_value: Option<f64>,
    pub bank_account_type: String,
    #[serde(default)]
    pub bank_balance: Option<f64>,
    #[serde(default)]
    pub savings_score: Option<f64>,
}

/// Geographic risk context for the applicant's address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoProfile {
    pub city_tier: String,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub region_default_rate: Option<f64>,
}

/// Sub-scores and the blended overall risk score for one application.
///
/// Produced fresh per request and never cached; persistence of the
/// breakdown is the repository's concern, not the composer's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub credit_risk_score: f64,
    pub income_risk_score: f64,
    pub employment_risk_score: f64,
    pub risk_score: u8,
    pub risk_category: RiskCategory,
}

/// Risk band assigned from the overall score. A score sitting exactly on a
/// band edge belongs to the band below it: 30 is Medium, 60 is Medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub const fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

/// Binary outcome communicated to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanDecision {
    Yes,
    No,
}

impl LoanDecision {
    pub const fn label(self) -> &'static str {
        match self {
            LoanDecision::Yes => "Yes",
            LoanDecision::No => "No",
        }
    }
}

/// Richer three-way recommendation for the reviewing officer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Approve,
    #[serde(rename = "Conditionally Approve")]
    ConditionallyApprove,
    Reject,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Approve => "Approve",
            Recommendation::ConditionallyApprove => "Conditionally Approve",
            Recommendation::Reject => "Reject",
        }
    }
}

/// Final decision produced by the decision engine, immutable once created.
/// An admin override is modelled as a separate superseding decision and
/// never mutates this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub loan_decision: LoanDecision,
    pub recommendation: Recommendation,
    pub confidence_score: f64,
    pub suggested_loan_amount: f64,
    pub debt_to_income_ratio: f64,
    pub key_risk_factors: Vec<String>,
    pub key_positive_factors: Vec<String>,
}

/// Full engine output: the risk breakdown alongside the derived decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAssessment {
    pub breakdown: RiskBreakdown,
    pub decision: DecisionResult,
}

/// High level status tracked throughout the application's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanApplicationStatus {
    Received,
    Approved,
    Rejected,
    NeedsReview,
    Overridden,
}

impl LoanApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanApplicationStatus::Received => "received",
            LoanApplicationStatus::Approved => "approved",
            LoanApplicationStatus::Rejected => "rejected",
            LoanApplicationStatus::NeedsReview => "needs_review",
            LoanApplicationStatus::Overridden => "overridden",
        }
    }
}
