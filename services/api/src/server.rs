use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryActivityRepository};
use crate::routes::with_points_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use faculty_points::config::AppConfig;
use faculty_points::error::AppError;
use faculty_points::points::PointsService;
use faculty_points::telemetry;
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

    let repository = InMemoryActivityRepository::from_seed(&config.seed)?;
    info!(
        researchers = repository.researcher_count(),
        "activity repository seeded"
    );
    let points_service = Arc::new(PointsService::new(
        Arc::new(repository),
        config.scoring.evaluation_config(),
    ));
    let targets = points_service.engine().config();
    info!(
        plan_target = targets.plan_target,
        international_target = targets.international_target,
        "evaluation targets configured"
    );

    let app = with_points_routes(points_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "faculty points service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
