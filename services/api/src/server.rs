use crate::cli::ServeArgs;
use crate::infra::{in_memory_ports, AppState};
use crate::routes::with_scheduling_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use interview_scheduler::config::AppConfig;
use interview_scheduler::error::AppError;
use interview_scheduler::scheduling::SchedulingState;
use interview_scheduler::telemetry;
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

    let (ports, _publisher) = in_memory_ports();
    let scheduling = SchedulingState::new(ports, config.scheduling.reservation_topic.clone());

    let app = with_scheduling_routes(scheduling)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        reservation_topic = %config.scheduling.reservation_topic,
        "interview scheduler ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
