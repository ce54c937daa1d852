//! Integration specifications for the loan assessment workflow.
//!
//! Scenarios drive the public service facade and HTTP router end to end so
//! prediction, persistence, and admin overrides are validated without
//! reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use lendscore::underwriting::{
        ApplicationId, ApplicationRecord, AssessmentEngine, AssetProfile, CreditProfile,
        Demographics, EmploymentProfile, FinancialProfile, GeoProfile, GradientBoostedModel,
        LoanApplication, LoanApplicationRepository, LoanService, LoanTerms, RepositoryError,
        RiskPolicy, RuleBasedExplainer, WeightStore, FEATURE_SCHEMA,
    };

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

    pub(super) fn application() -> LoanApplication {
        LoanApplication {
            demographics: Demographics {
                gender: "Female".to_string(),
                age: 38,
                married: "Yes".to_string(),
                dependents: 2,
                children: 2,
                education: "Graduate".to_string(),
                spouse_employed: true,
            },
            employment: EmploymentProfile {
                self_employed: "No".to_string(),
                employment_type: "Government".to_string(),
                years_in_current_job: Some(9.0),
                employer_category: "A".to_string(),
                industry: "Government".to_string(),
            },
            financials: FinancialProfile {
                applicant_income: 70_000.0,
                coapplicant_income: 30_000.0,
                monthly_expenses: Some(40_000.0),
                other_emis: Some(2_000.0),
            },
            terms: LoanTerms {
                loan_amount: 600.0,
                loan_amount_term: 360.0,
                requested_interest_rate: Some(8.9),
                loan_purpose: "Home".to_string(),
            },
            credit: CreditProfile {
                credit_score: Some(780),
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
                collateral_value: Some(1_100_000.0),
                bank_account_type: "Premium".to_string(),
                bank_balance: Some(450_000.0),
                savings_score: Some(20.0),
            },
            geography: GeoProfile {
                city_tier: "Tier-2".to_string(),
                pincode: Some("110032".to_string()),
                region_default_rate: Some(2.5),
            },
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
    }

    impl LoanApplicationRepository for MemoryRepository {
        fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.application_id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.application_id.clone(), record.clone());
            Ok(record)
        }

        fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.insert(record.application_id.clone(), record);
            Ok(())
        }

        fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn pending_review(&self, _limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    pub(super) fn build_service() -> (
        LoanService<MemoryRepository, RuleBasedExplainer>,
        Arc<MemoryRepository>,
    ) {
        let model =
            GradientBoostedModel::from_json_str(&model_json()).expect("test model loads");
        let engine = AssessmentEngine::new(
            Arc::new(model),
            Arc::new(WeightStore::with_defaults()),
            RiskPolicy::default(),
        );
        let repository = Arc::new(MemoryRepository::default());
        let service = LoanService::new(
            repository.clone(),
            Arc::new(RuleBasedExplainer),
            Arc::new(engine),
        );
        (service, repository)
    }
}

mod assessment {
    use super::common::*;
    use lendscore::underwriting::{LoanApplicationStatus, LoanDecision, RiskCategory};

    #[test]
    fn qualified_application_is_approved_end_to_end() {
        let (service, repository) = build_service();

        let record = service.assess(application()).expect("assessment succeeds");

        assert_eq!(record.status, LoanApplicationStatus::Approved);
        let assessment = record.assessment.as_ref().expect("assessment present");
        assert_eq!(assessment.decision.loan_decision, LoanDecision::Yes);
        assert_eq!(assessment.breakdown.risk_category, RiskCategory::Low);
        assert!(record
            .justification
            .as_deref()
            .expect("justification present")
            .contains("approved"));

        use lendscore::underwriting::LoanApplicationRepository;
        let stored = repository
            .fetch(&record.application_id)
            .expect("repo fetch")
            .expect("record present");
        assert_eq!(stored.status, LoanApplicationStatus::Approved);
    }

    #[test]
    fn hard_reject_rule_dominates_through_the_facade() {
        let (service, _) = build_service();
        let mut bad = application();
        bad.credit.credit_history = 0;
        bad.credit.loan_default_history = 2;
        bad.financials.applicant_income = 500_000.0;

        let record = service.assess(bad).expect("assessment succeeds");
        let assessment = record.assessment.as_ref().expect("assessment present");
        assert_eq!(assessment.decision.loan_decision, LoanDecision::No);
        assert_eq!(record.status, LoanApplicationStatus::Rejected);
    }
}

mod routing {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use lendscore::underwriting::loan_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::*;

    async fn read_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn predict_then_override_via_http() {
        let (service, _) = build_service();
        let router = loan_router(Arc::new(service));

        let payload = serde_json::to_value(application()).expect("serialize");
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/loans/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let prediction = read_json(response).await;
        assert_eq!(prediction.get("loan_decision"), Some(&json!("Yes")));
        let application_id = prediction
            .get("application_id")
            .and_then(Value::as_str)
            .expect("application id")
            .to_string();

        let override_payload = json!({ "final_status": "No", "admin_notes": "manual audit" });
        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/v1/loans/{application_id}/admin-decision"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&override_payload).expect("serialize"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body.get("status"), Some(&json!("overridden")));
        assert_eq!(body.get("loan_decision"), Some(&json!("No")));
    }
}
