use clap::Args;
use std::fs::File;
use std::sync::Arc;

use lendscore::error::AppError;
use lendscore::underwriting::batch::parse_applications;
use lendscore::underwriting::{
    AssessmentEngine, AssetProfile, CreditProfile, Demographics, EmploymentProfile,
    FinancialProfile, GeoProfile, GradientBoostedModel, LoanApplication, LoanDecision,
    LoanServiceError, LoanTerms, RiskPolicy, WeightStore,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Path to the serialized scoring model
    #[arg(long, default_value = "data/models/loan_model.json")]
    pub(crate) model: String,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export of applications to score
    pub(crate) file: String,
    /// Path to the serialized scoring model
    #[arg(long, default_value = "data/models/loan_model.json")]
    pub(crate) model: String,
    /// Stop after this many rows
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

fn build_engine(model_path: &str) -> Result<AssessmentEngine, AppError> {
    let model = GradientBoostedModel::from_path(model_path)?;
    Ok(AssessmentEngine::new(
        Arc::new(model),
        Arc::new(WeightStore::with_defaults()),
        RiskPolicy::default(),
    ))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = build_engine(&args.model)?;
    let application = demo_application();
    let assessment = engine
        .assess(&application)
        .map_err(LoanServiceError::from)?;

    println!("== Loan assessment demo ==");
    println!(
        "decision:        {}",
        assessment.decision.loan_decision.label()
    );
    println!(
        "recommendation:  {}",
        assessment.decision.recommendation.label()
    );
    println!(
        "risk score:      {}/100 ({})",
        assessment.breakdown.risk_score,
        assessment.breakdown.risk_category.label()
    );
    println!(
        "sub-scores:      credit {:.1} | income {:.1} | employment {:.1}",
        assessment.breakdown.credit_risk_score,
        assessment.breakdown.income_risk_score,
        assessment.breakdown.employment_risk_score
    );
    println!(
        "confidence:      {:.2}",
        assessment.decision.confidence_score
    );
    println!(
        "suggested:       {:.0}k against {:.0}k requested",
        assessment.decision.suggested_loan_amount, application.terms.loan_amount
    );
    if !assessment.decision.key_positive_factors.is_empty() {
        println!(
            "strengths:       {}",
            assessment.decision.key_positive_factors.join("; ")
        );
    }
    if !assessment.decision.key_risk_factors.is_empty() {
        println!(
            "concerns:        {}",
            assessment.decision.key_risk_factors.join("; ")
        );
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let engine = build_engine(&args.model)?;
    let file = File::open(&args.file)?;
    let applications = parse_applications(file)
        .map_err(|err| AppError::Io(std::io::Error::other(err.to_string())))?;

    let limit = args.limit.unwrap_or(usize::MAX);
    let mut approved = 0usize;
    let mut rejected = 0usize;
    let mut skipped = 0usize;

    for (row, application) in applications.iter().take(limit).enumerate() {
        match engine.assess(application) {
            Ok(assessment) => {
                match assessment.decision.loan_decision {
                    LoanDecision::Yes => approved += 1,
                    LoanDecision::No => rejected += 1,
                }
                println!(
                    "row {:>4}: {:<3} risk {:>3}/100 ({}) {}",
                    row + 1,
                    assessment.decision.loan_decision.label(),
                    assessment.breakdown.risk_score,
                    assessment.breakdown.risk_category.label(),
                    assessment.decision.recommendation.label()
                );
            }
            Err(err) => {
                skipped += 1;
                eprintln!("row {:>4}: skipped ({err})", row + 1);
            }
        }
    }

    println!("scored {} rows: {approved} approved, {rejected} rejected, {skipped} skipped",
        approved + rejected + skipped);
    Ok(())
}

fn demo_application() -> LoanApplication {
    LoanApplication {
        demographics: Demographics {
            gender: "Male".to_string(),
            age: 35,
            married: "Yes".to_string(),
            dependents: 1,
            children: 1,
            education: "Graduate".to_string(),
            spouse_employed: true,
        },
        employment: EmploymentProfile {
            self_employed: "No".to_string(),
            employment_type: "Salaried".to_string(),
            years_in_current_job: Some(6.0),
            employer_category: "MNC".to_string(),
            industry: "IT".to_string(),
        },
        financials: FinancialProfile {
            applicant_income: 75_000.0,
            coapplicant_income: 25_000.0,
            monthly_expenses: Some(45_000.0),
            other_emis: Some(5_000.0),
        },
        terms: LoanTerms {
            loan_amount: 500.0,
            loan_amount_term: 360.0,
            requested_interest_rate: Some(9.0),
            loan_purpose: "Home".to_string(),
        },
        credit: CreditProfile {
            credit_score: Some(760),
            credit_history: 1,
            no_of_credit_cards: 3,
            loan_default_history: 0,
            avg_payment_delay_days: Some(1.5),
        },
        assets: AssetProfile {
            has_vehicle: true,
            has_life_insurance: true,
            property_area: "Urban".to_string(),
            collateral_type: "Property".to_string(),
            collateral_value: Some(850_000.0),
            bank_account_type: "Savings".to_string(),
            bank_balance: Some(320_000.0),
            savings_score: Some(16.0),
        },
        geography: GeoProfile {
            city_tier: "Tier-1".to_string(),
            pincode: Some("560034".to_string()),
            region_default_rate: Some(3.4),
        },
    }
}
