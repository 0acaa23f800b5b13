use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProcessRepository};
use crate::routes::with_process_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use procurement_eval::config::AppConfig;
use procurement_eval::error::AppError;
use procurement_eval::telemetry;
use procurement_eval::workflows::procurement::ProcurementEvaluationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryProcessRepository::default());
    let service = Arc::new(ProcurementEvaluationService::new(
        repository,
        config.evaluation.clone(),
    ));

    let app = with_process_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        rup_window_days = config.evaluation.rup_window_days,
        "procurement evaluation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
