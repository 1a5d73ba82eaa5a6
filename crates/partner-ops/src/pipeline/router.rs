use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{DealId, PartnerKind, Product, Stage, Vertical};
use super::intake::LeadSubmission;
use super::repository::{DealStatusView, DealStore, NudgePublisher, StoreError};
use super::service::{PartnerPipelineService, PipelineServiceError};

/// Router builder exposing lead intake, stage moves, and the commission
/// calculator. The HTTP layer owns the clock; the rules engine stays pure.
pub fn pipeline_router<R, N>(service: Arc<PartnerPipelineService<R, N>>) -> Router
where
    R: DealStore + 'static,
    N: NudgePublisher + 'static,
{
    Router::new()
        .route("/api/v1/partners/leads", post(submit_handler::<R, N>))
        .route(
            "/api/v1/partners/leads/:deal_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/partners/leads/:deal_id/stage",
            post(advance_handler::<R, N>),
        )
        .route("/api/v1/commission/quote", post(quote_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitLeadRequest {
    #[serde(flatten)]
    pub(crate) submission: LeadSubmission,
    pub(crate) partner: String,
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<PartnerPipelineService<R, N>>>,
    axum::Json(request): axum::Json<SubmitLeadRequest>,
) -> Response
where
    R: DealStore + 'static,
    N: NudgePublisher + 'static,
{
    match service.submit_lead(request.submission, &request.partner, Utc::now()) {
        Ok(deal) => {
            let view = DealStatusView::of(&deal);
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(PipelineServiceError::Validation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(PipelineServiceError::Store(StoreError::Conflict)) => {
            let payload = json!({ "error": "deal already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<PartnerPipelineService<R, N>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealStore + 'static,
    N: NudgePublisher + 'static,
{
    let id = DealId(deal_id);
    match service.get(&id) {
        Ok(deal) => {
            let view = DealStatusView::of(&deal);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(PipelineServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({ "error": format!("deal {} not found", id.0) });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdvanceStageRequest {
    pub(crate) stage: Stage,
    pub(crate) actor: String,
}

pub(crate) async fn advance_handler<R, N>(
    State(service): State<Arc<PartnerPipelineService<R, N>>>,
    Path(deal_id): Path<String>,
    axum::Json(request): axum::Json<AdvanceStageRequest>,
) -> Response
where
    R: DealStore + 'static,
    N: NudgePublisher + 'static,
{
    let id = DealId(deal_id);
    match service.advance_stage(&id, request.stage, &request.actor, Utc::now()) {
        Ok(advance) => (StatusCode::OK, axum::Json(advance)).into_response(),
        Err(PipelineServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({ "error": format!("deal {} not found", id.0) });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(PipelineServiceError::Transition(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteRequest {
    pub(crate) partner_kind: PartnerKind,
    pub(crate) monthly_gmv: i64,
    pub(crate) product: Product,
    pub(crate) vertical: Vertical,
}

pub(crate) async fn quote_handler<R, N>(
    State(service): State<Arc<PartnerPipelineService<R, N>>>,
    axum::Json(request): axum::Json<QuoteRequest>,
) -> Response
where
    R: DealStore + 'static,
    N: NudgePublisher + 'static,
{
    if request.monthly_gmv < 0 {
        let payload = json!({
            "error": format!("monthly GMV cannot be negative (got {})", request.monthly_gmv),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    let result = service.engine().quote(
        request.partner_kind,
        request.monthly_gmv as u64,
        request.product,
        request.vertical,
    );
    (StatusCode::OK, axum::Json(result)).into_response()
}
