use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProjectStore};
use crate::routes::with_cockpit_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use handwerk_os::config::AppConfig;
use handwerk_os::error::AppError;
use handwerk_os::telemetry;
use handwerk_os::workflows::cockpit::ProjectCockpitService;
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

    let store = match args.seed.take() {
        Some(path) => {
            info!(path = %path.display(), "loading project snapshots from seed file");
            InMemoryProjectStore::load(&path)?
        }
        None => InMemoryProjectStore::demo(Local::now().date_naive()),
    };
    info!(
        projects = store.project_ids().len(),
        companies = store.company_ids().len(),
        "project store ready"
    );

    let store = Arc::new(store);
    let cockpit_service = Arc::new(ProjectCockpitService::new(
        store.clone(),
        store,
        config.health,
    ));

    let app = with_cockpit_routes(cockpit_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "project cockpit ready");

    axum::serve(listener, app).await?;
    Ok(())
}
