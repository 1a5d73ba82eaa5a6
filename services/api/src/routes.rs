use crate::infra::{deserialize_optional_date, AppState, InMemoryDealStore, InMemoryNudgeBoard};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{NaiveDate, Utc};
use partner_ops::pipeline::{
    pipeline_router, DealFilter, FunnelInsights, FunnelReport, FunnelSummary, NudgeId,
    PartnerPipelineService,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FunnelRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) stalled_after_days: Option<i64>,
    #[serde(default)]
    pub(crate) filter: Option<DealFilter>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunnelResponse {
    pub(crate) generated_at: chrono::DateTime<Utc>,
    pub(crate) stalled_after_days: i64,
    #[serde(flatten)]
    pub(crate) summary: FunnelSummary,
    pub(crate) insights: FunnelInsights,
}

pub(crate) fn with_pipeline_routes(
    service: Arc<PartnerPipelineService<InMemoryDealStore, InMemoryNudgeBoard>>,
) -> axum::Router {
    pipeline_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/pipeline/funnel",
            axum::routing::post(funnel_endpoint),
        )
        .route(
            "/api/v1/partners/nudges",
            axum::routing::get(nudges_endpoint),
        )
        .route(
            "/api/v1/partners/nudges/:nudge_id",
            axum::routing::delete(dismiss_nudge_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn funnel_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<FunnelRequest>,
) -> impl IntoResponse {
    use partner_ops::pipeline::DealStore;

    let filter = payload.filter.unwrap_or_default();
    let book = match state.store.search(&filter) {
        Ok(book) => book,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    let generated_at = payload
        .today
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now);
    let stalled_after_days = payload
        .stalled_after_days
        .unwrap_or(state.stalled_after_days);

    let report = FunnelReport::build(&book, generated_at, stalled_after_days);
    let summary = report.summary();
    let insights = summary.insights();

    let response = FunnelResponse {
        generated_at,
        stalled_after_days,
        summary,
        insights,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn nudges_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.nudges.list()))
}

pub(crate) async fn dismiss_nudge_endpoint(
    Extension(state): Extension<AppState>,
    Path(nudge_id): Path<String>,
) -> impl IntoResponse {
    let id = NudgeId(nudge_id);
    if state.nudges.dismiss(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        let payload = json!({ "error": format!("nudge {} not found", id.0) });
        (StatusCode::NOT_FOUND, Json(payload)).into_response()
    }
}
