use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionRepository, StorageBackends};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_assess::config::AppConfig;
use credit_assess::error::AppError;
use credit_assess::telemetry;
use credit_assess::workflows::assessment::AssessmentService;
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

    let backends = StorageBackends::local(&config.storage);
    let assessment_service = Arc::new(AssessmentService::new(
        Arc::new(InMemorySessionRepository::default()),
        backends.documents,
        backends.writers,
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        storage_root = %config.storage.root.display(),
        "credit assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
