//! Edge admission integration tests.
//!
//! Exercises the admission layer against a real axum router (with stub
//! handlers standing in for the proxy) to verify the HTTP contract:
//! rate-limit metadata on every response, `429` with `Retry-After` on
//! rejection, and per-path policy selection.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use axum::{routing::get, routing::post, Json, Router};
use axum_test::TestServer;
use http::{HeaderName, HeaderValue, StatusCode};
use olympia_gateway::middleware::{
    admission_layer, AdmissionControl, LIMIT_HEADER, REMAINING_HEADER, RESET_HEADER,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn ok() -> Json<Value> {
    Json(json!({ "ok": true }))
}

fn test_router(auth_max: u32, api_max: u32) -> Router {
    let control = Arc::new(AdmissionControl::new(
        auth_max,
        Duration::from_secs(60),
        api_max,
        Duration::from_secs(60),
    ));
    Router::new()
        .route("/auth/token", post(ok))
        .route("/tickets/1", get(ok))
        .layer(admission_layer(control))
}

fn header<'a>(response: &'a axum_test::TestResponse, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn admitted_responses_carry_rate_limit_headers() {
    let server = TestServer::new(test_router(5, 60)).unwrap();

    let response = server.get("/tickets/1").await;
    response.assert_status_ok();
    assert_eq!(header(&response, LIMIT_HEADER), "60");
    assert_eq!(header(&response, REMAINING_HEADER), "59");
    assert_eq!(header(&response, RESET_HEADER), "60");
}

#[tokio::test]
async fn over_limit_requests_get_429_with_retry_after() {
    let server = TestServer::new(test_router(5, 2)).unwrap();

    server.get("/tickets/1").await.assert_status_ok();
    server.get("/tickets/1").await.assert_status_ok();

    let rejected = server.get("/tickets/1").await;
    rejected.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = header(&rejected, "retry-after").parse().unwrap();
    assert!(retry_after > 0);
    assert_eq!(header(&rejected, REMAINING_HEADER), "0");

    let body: Value = rejected.json();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Too many requests"));
}

#[tokio::test]
async fn auth_endpoints_use_strict_policy() {
    // One auth attempt allowed, plenty of general traffic.
    let server = TestServer::new(test_router(1, 100)).unwrap();

    server.post("/auth/token").await.assert_status_ok();

    let rejected = server.post("/auth/token").await;
    rejected.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = rejected.json();
    assert!(body["detail"].as_str().unwrap().contains("login attempts"));

    // General traffic is unaffected by the exhausted auth policy.
    server.get("/tickets/1").await.assert_status_ok();
}

#[tokio::test]
async fn distinct_client_ips_have_independent_budgets() {
    let server = TestServer::new(test_router(5, 1)).unwrap();
    let forwarded_for = HeaderName::from_static("x-forwarded-for");

    server
        .get("/tickets/1")
        .add_header(forwarded_for.clone(), HeaderValue::from_static("203.0.113.1"))
        .await
        .assert_status_ok();
    server
        .get("/tickets/1")
        .add_header(forwarded_for.clone(), HeaderValue::from_static("203.0.113.1"))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    // A different client still has budget.
    server
        .get("/tickets/1")
        .add_header(forwarded_for, HeaderValue::from_static("203.0.113.2"))
        .await
        .assert_status_ok();
}
