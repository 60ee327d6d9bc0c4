use crate::cli::ServeArgs;
use crate::infra::{load_collaborators, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use merchant_gate::config::AppConfig;
use merchant_gate::eligibility::EligibilityService;
use merchant_gate::error::AppError;
use merchant_gate::telemetry;
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
    if let Some(seed) = args.seed.take() {
        config.directory.seed_path = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (directory, sessions) = load_collaborators(config.directory.seed_path.as_deref())?;
    info!(
        merchants = directory.len(),
        sessions = sessions.len(),
        seed = ?config.directory.seed_path,
        "merchant directory hydrated"
    );
    let service = Arc::new(EligibilityService::new(
        Arc::new(directory),
        Arc::new(sessions),
    ));

    let app = with_operational_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "merchant eligibility gate ready");

    axum::serve(listener, app).await?;
    Ok(())
}
