use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::underwriting::assessment::{AssessmentEngine, RiskPolicy};
use crate::underwriting::domain::{
    ApplicationId, AssetProfile, CreditProfile, Demographics, EmploymentProfile, FinancialProfile,
    GeoProfile, LoanApplication, LoanTerms,
};
use crate::underwriting::explainer::RuleBasedExplainer;
use crate::underwriting::features::FEATURE_SCHEMA;
use crate::underwriting::model::GradientBoostedModel;
use crate::underwriting::repository::{
    ApplicationRecord, LoanApplicationRepository, RepositoryError,
};
use crate::underwriting::service::LoanService;
use crate::underwriting::weights::WeightStore;

/// Small fixed artifact mirroring the production layout: four shallow
/// trees over credit score, debt ratio, defaults, and EMI burden.
pub(super) fn model_json() -> String {
    serde_json::json!({
        "version": "2025.1-test",
        "feature_names": FEATURE_SCHEMA.as_slice(),
        "base_score": 0.0,
        "trees": [
            { "nodes": [
                { "kind": "split", "feature": 20, "threshold": 650.0, "left": 1, "right": 2 },
                { "kind": "leaf", "value": 0.9 },
                { "kind": "split", "feature": 20, "threshold": 750.0, "left": 3, "right": 4 },
                { "kind": "leaf", "value": 0.1 },
                { "kind": "leaf", "value": -0.7 }
            ]},
            { "nodes": [
                { "kind": "split", "feature": 40, "threshold": 0.75, "left": 1, "right": 2 },
                { "kind": "leaf", "value": -0.4 },
                { "kind": "leaf", "value": 0.6 }
            ]},
            { "nodes": [
                { "kind": "split", "feature": 23, "threshold": 1.0, "left": 1, "right": 2 },
                { "kind": "leaf", "value": -0.3 },
                { "kind": "leaf", "value": 0.8 }
            ]},
            { "nodes": [
                { "kind": "split", "feature": 39, "threshold": 0.35, "left": 1, "right": 2 },
                { "kind": "leaf", "value": -0.2 },
                { "kind": "leaf", "value": 0.5 }
            ]}
        ]
    })
    .to_string()
}

pub(super) fn model() -> GradientBoostedModel {
    GradientBoostedModel::from_json_str(&model_json()).expect("test model loads")
}

pub(super) fn engine() -> AssessmentEngine {
    engine_with_store(Arc::new(WeightStore::with_defaults()))
}

pub(super) fn engine_with_store(weights: Arc<WeightStore>) -> AssessmentEngine {
    AssessmentEngine::new(Arc::new(model()), weights, RiskPolicy::default())
}

/// Well-qualified salaried applicant with property collateral; lands in
/// the Low band under the default policy.
pub(super) fn strong_application() -> LoanApplication {
    LoanApplication {
        demographics: Demographics {
            gender: "Male".to_string(),
            age: 34,
            married: "Yes".to_string(),
            dependents: 1,
            children: 0,
            education: "Graduate".to_string(),
            spouse_employed: false,
        },
        employment: EmploymentProfile {
            self_employed: "No".to_string(),
            employment_type: "Salaried".to_string(),
            years_in_current_job: Some(5.0),
            employer_category: "B".to_string(),
            industry: "IT".to_string(),
        },
        financials: FinancialProfile {
            applicant_income: 85_000.0,
            coapplicant_income: 0.0,
            monthly_expenses: Some(60_000.0),
            other_emis: Some(0.0),
        },
        terms: LoanTerms {
            loan_amount: 500.0,
            loan_amount_term: 360.0,
            requested_interest_rate: Some(9.5),
            loan_purpose: "Home".to_string(),
        },
        credit: CreditProfile {
            credit_score: Some(750),
            credit_history: 1,
            no_of_credit_cards: 2,
            loan_default_history: 0,
            avg_payment_delay_days: Some(0.0),
        },
        assets: AssetProfile {
            has_vehicle: true,
            has_life_insurance: true,
            property_area: "Urban".to_string(),
            collateral_type: "Property".to_string(),
            collateral_value: Some(900_000.0),
            bank_account_type: "Savings".to_string(),
            bank_balance: Some(300_000.0),
            savings_score: Some(15.0),
        },
        geography: GeoProfile {
            city_tier: "Tier-1".to_string(),
            pincode: Some("560001".to_string()),
            region_default_rate: Some(3.0),
        },
    }
}

/// Mediocre credit and a thin buffer; lands in the conditional band.
pub(super) fn moderate_application() -> LoanApplication {
    let mut application = strong_application();
    application.credit.credit_score = Some(660);
    application.credit.no_of_credit_cards = 3;
    application.credit.avg_payment_delay_days = Some(8.0);
    application.financials.applicant_income = 40_000.0;
    application.financials.monthly_expenses = Some(22_000.0);
    application.financials.other_emis = Some(3_000.0);
    application.terms.loan_amount = 300.0;
    application.terms.loan_amount_term = 120.0;
    application.employment.years_in_current_job = Some(3.0);
    application.employment.industry = "Manufacturing".to_string();
    application.assets.collateral_type = "None".to_string();
    application.assets.collateral_value = Some(0.0);
    application.assets.bank_balance = Some(80_000.0);
    application.assets.savings_score = Some(10.0);
    application
}

/// Weak credit, prior default, freelancing income; lands in the High band.
pub(super) fn weak_application() -> LoanApplication {
    let mut application = strong_application();
    application.credit.credit_score = Some(600);
    application.credit.no_of_credit_cards = 1;
    application.credit.loan_default_history = 1;
    application.credit.avg_payment_delay_days = Some(20.0);
    application.financials.applicant_income = 25_000.0;
    application.financials.monthly_expenses = Some(15_000.0);
    application.financials.other_emis = Some(3_000.0);
    application.terms.loan_amount = 300.0;
    application.terms.loan_amount_term = 120.0;
    application.employment.employment_type = "Freelancer".to_string();
    application.employment.self_employed = "Yes".to_string();
    application.employment.years_in_current_job = Some(1.0);
    application.employment.employer_category = "SME".to_string();
    application.employment.industry = "Retail".to_string();
    application.assets.collateral_type = "None".to_string();
    application.assets.collateral_value = Some(0.0);
    application.assets.bank_balance = Some(20_000.0);
    application.assets.savings_score = Some(5.0);
    application
}

/// No credit track record plus two prior defaults: the hard-reject rule
/// must dominate even with an outsized income.
pub(super) fn hard_reject_application() -> LoanApplication {
    let mut application = strong_application();
    application.credit.credit_history = 0;
    application.credit.credit_score = Some(700);
    application.credit.loan_default_history = 2;
    application.financials.applicant_income = 500_000.0;
    application.financials.monthly_expenses = Some(100_000.0);
    application
}

pub(super) fn build_service() -> (
    LoanService<MemoryRepository, RuleBasedExplainer>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let explainer = Arc::new(RuleBasedExplainer);
    let service = LoanService::new(repository.clone(), explainer, Arc::new(engine()));
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl LoanApplicationRepository for MemoryRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.application_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending_review(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| {
                record.status == crate::underwriting::domain::LoanApplicationStatus::NeedsReview
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl LoanApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending_review(&self, _limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
