use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use super::common::*;

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn submit_payload() -> Value {
    json!({
        "brand_name": "Aurora Threads",
        "partner_kind": "referral",
        "monthly_gmv": 500_000,
        "product": "checkout",
        "vertical": "fashion",
        "notes": "Met at the commerce summit",
        "partner": "Nova Partners",
    })
}

#[tokio::test]
async fn submit_endpoint_accepts_a_valid_lead() {
    let (service, _store, _nudges) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request("POST", "/api/v1/partners/leads", submit_payload()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["stage"], "prospecting");
    assert_eq!(body["brand_name"], "Aurora Threads");
    assert!(body["deal_id"].is_string());
}

#[tokio::test]
async fn submit_endpoint_rejects_negative_gmv() {
    let (service, _store, _nudges) = build_service();
    let router = router_with_service(service);

    let mut payload = submit_payload();
    payload["monthly_gmv"] = json!(-10);

    let response = router
        .oneshot(json_request("POST", "/api/v1/partners/leads", payload))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message present")
        .contains("negative"));
}

#[tokio::test]
async fn status_endpoint_returns_404_for_unknown_deals() {
    let (service, _store, _nudges) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/partners/leads/deal-999999")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn advance_endpoint_moves_the_stage_and_reports_the_nudge() {
    let (service, _store, nudges) = build_service();
    let router = router_with_service(service);

    let submit_response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/partners/leads", submit_payload()))
        .await
        .expect("router responds");
    let submitted = read_json_body(submit_response).await;
    let deal_id = submitted["deal_id"]
        .as_str()
        .expect("deal id present")
        .to_owned();

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/partners/leads/{deal_id}/stage"),
            json!({ "stage": "business_agreement_shared", "actor": "Nova Partners" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["deal"]["stage"], "business_agreement_shared");
    assert!(body["nudge"].is_object());
    assert_eq!(nudges.events().len(), 1);
}

#[tokio::test]
async fn quote_endpoint_runs_the_calculator() {
    let (service, _store, _nudges) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/commission/quote",
            json!({
                "partner_kind": "referral",
                "monthly_gmv": 500_000,
                "product": "checkout",
                "vertical": "fashion",
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let amount = body["amount"].as_f64().expect("amount present");
    assert!((amount - 23_000.0).abs() < 1e-6);
    assert_eq!(body["breakdown"][0]["label"], "monthly GMV");
}

#[tokio::test]
async fn quote_endpoint_rejects_negative_gmv() {
    let (service, _store, _nudges) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/commission/quote",
            json!({
                "partner_kind": "reseller",
                "monthly_gmv": -1,
                "product": "checkout",
                "vertical": "fashion",
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
