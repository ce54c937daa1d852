//! Bulk CSV intake for backtesting and demos.
//!
//! Accepts the column layout of the historical application exports
//! (`Gender`, `Age`, `Married`, …) and maps each row onto a
//! [`LoanApplication`] so the whole file can be pushed through the engine.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{
    AssetProfile, CreditProfile, Demographics, EmploymentProfile, FinancialProfile, GeoProfile,
    LoanApplication, LoanTerms,
};

pub fn parse_applications<R: Read>(reader: R) -> Result<Vec<LoanApplication>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut applications = Vec::new();

    for row in csv_reader.deserialize::<ApplicationRow>() {
        applications.push(row?.into_application());
    }

    Ok(applications)
}

#[derive(Debug, Deserialize)]
struct ApplicationRow {
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "Married")]
    married: String,
    #[serde(rename = "Dependents", deserialize_with = "dependents_count")]
    dependents: u8,
    #[serde(rename = "Children", default)]
    children: u8,
    #[serde(rename = "Education")]
    education: String,
    #[serde(rename = "SpouseEmployed", default, deserialize_with = "loose_bool")]
    spouse_employed: bool,
    #[serde(rename = "Self_Employed")]
    self_employed: String,
    #[serde(rename = "EmploymentType")]
    employment_type: String,
    #[serde(rename = "YearsInCurrentJob", default)]
    years_in_current_job: Option<f64>,
    #[serde(rename = "EmployerCategory")]
    employer_category: String,
    #[serde(rename = "Industry")]
    industry: String,
    #[serde(rename = "ApplicantIncome")]
    applicant_income: f64,
    #[serde(rename = "CoapplicantIncome", default)]
    coapplicant_income: f64,
    #[serde(rename = "MonthlyExpenses", default)]
    monthly_expenses: Option<f64>,
    #[serde(rename = "OtherEMIs", default)]
    other_emis: Option<f64>,
    #[serde(rename = "LoanAmount")]
    loan_amount: f64,
    #[serde(rename = "Loan_Amount_Term")]
    loan_amount_term: f64,
    #[serde(rename = "RequestedInterestRate", default)]
    requested_interest_rate: Option<f64>,
    #[serde(rename = "LoanPurpose")]
    loan_purpose: String,
    #[serde(rename = "CreditScore", default)]
    credit_score: Option<u16>,
    #[serde(rename = "Credit_History")]
    credit_history: u8,
    #[serde(rename = "NoOfCreditCards", default)]
    no_of_credit_cards: u8,
    #[serde(rename = "LoanDefaultHistory", default)]
    loan_default_history: u8,
    #[serde(rename = "AvgPaymentDelayDays", default)]
    avg_payment_delay_days: Option<f64>,
    #[serde(rename = "HasVehicle", default, deserialize_with = "loose_bool")]
    has_vehicle: bool,
    #[serde(rename = "HasLifeInsurance", default, deserialize_with = "loose_bool")]
    has_life_insurance: bool,
    #[serde(rename = "Property_Area")]
    property_area: String,
    #[serde(rename = "CollateralType")]
    collateral_type: String,
    #[serde(rename = "CollateralValue", default)]
    collateral_value: Option<f64>,
    #[serde(rename = "BankAccountType")]
    bank_account_type: String,
    #[serde(rename = "BankBalance", default)]
    bank_balance: Option<f64>,
    #[serde(rename = "SavingsScore", default)]
    savings_score: Option<f64>,
    #[serde(rename = "CityTier")]
    city_tier: String,
    #[serde(rename = "Pincode", default)]
    pincode: Option<String>,
    #[serde(rename = "RegionDefaultRate", default)]
    region_default_rate: Option<f64>,
}

impl ApplicationRow {
    fn into_application(self) -> LoanApplication {
        LoanApplication {
            demographics: Demographics {
                gender: self.gender,
                age: self.age,
                married: self.married,
                dependents: self.dependents,
                children: self.children,
                education: self.education,
                spouse_employed: self.spouse_employed,
            },
            employment: EmploymentProfile {
                self_employed: self.self_employed,
                employment_type: self.employment_type,
                years_in_current_job: self.years_in_current_job,
                employer_category: self.employer_category,
                industry: self.industry,
            },
            financials: FinancialProfile {
                applicant_income: self.applicant_income,
                coapplicant_income: self.coapplicant_income,
                monthly_expenses: self.monthly_expenses,
                other_emis: self.other_emis,
            },
            terms: LoanTerms {
                loan_amount: self.loan_amount,
                loan_amount_term: self.loan_amount_term,
                requested_interest_rate: self.requested_interest_rate,
                loan_purpose: self.loan_purpose,
            },
            credit: CreditProfile {
                credit_score: self.credit_score,
                credit_history: self.credit_history,
                no_of_credit_cards: self.no_of_credit_cards,
                loan_default_history: self.loan_default_history,
                avg_payment_delay_days: self.avg_payment_delay_days,
            },
            assets: AssetProfile {
                has_vehicle: self.has_vehicle,
                has_life_insurance: self.has_life_insurance,
                property_area: self.property_area,
                collateral_type: self.collateral_type,
                collateral_value: self.collateral_value,
                bank_account_type: self.bank_account_type,
                bank_balance: self.bank_balance,
                savings_score: self.savings_score,
            },
            geography: GeoProfile {
                city_tier: self.city_tier,
                pincode: self.pincode,
                region_default_rate: self.region_default_rate,
            },
        }
    }
}

// Exports render dependents as "0".."4" or "3+"; strip the suffix.
fn dependents_count<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim().trim_end_matches('+');
    trimmed.parse::<u8>().map_err(serde::de::Error::custom)
}

// Booleans arrive as True/False, true/false, or 1/0 depending on the
// exporting tool.
fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "" | "false" | "0" | "no" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "unrecognized boolean '{other}'"
        ))),
    }
}
