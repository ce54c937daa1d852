use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLoanRepository};
use crate::routes::with_loan_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use lendscore::config::AppConfig;
use lendscore::error::AppError;
use lendscore::telemetry;
use lendscore::underwriting::{
    AssessmentEngine, GradientBoostedModel, LoanService, RiskPolicy, RuleBasedExplainer,
    WeightStore,
};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    // A process without a usable model must refuse to become ready; the
    // bounded retry loop is the only retry anywhere in the scoring path.
    let model = GradientBoostedModel::load_with_retries(
        &config.model.artifact_path,
        config.model.load_retries,
    )?;
    info!(path = %config.model.artifact_path, "scoring model loaded");

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = AssessmentEngine::new(
        Arc::new(model),
        Arc::new(WeightStore::with_defaults()),
        RiskPolicy::default(),
    );
    let repository = Arc::new(InMemoryLoanRepository::default());
    let explainer = Arc::new(RuleBasedExplainer);
    let service = Arc::new(LoanService::new(repository, explainer, Arc::new(engine)));

    let app = with_loan_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
