use crate::cli::ServeArgs;
use crate::infra::{default_schedule, AppState, InMemoryDealStore, InMemoryNudgeBoard};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use partner_ops::config::AppConfig;
use partner_ops::error::AppError;
use partner_ops::pipeline::{PartnerPipelineService, TransitionPolicy};
use partner_ops::telemetry;
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

    let store = Arc::new(InMemoryDealStore::default());
    let nudges = Arc::new(InMemoryNudgeBoard::default());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store: store.clone(),
        nudges: nudges.clone(),
        stalled_after_days: config.pipeline.stalled_after_days,
    };

    let policy = if config.pipeline.forward_only_stages {
        TransitionPolicy::ForwardOnly
    } else {
        TransitionPolicy::Unrestricted
    };
    let service = Arc::new(PartnerPipelineService::new(
        store,
        nudges,
        default_schedule(),
        policy,
    ));

    let app = with_pipeline_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "partner pipeline service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
