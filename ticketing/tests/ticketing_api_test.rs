//! Ticketing service API tests.
//!
//! Runs the real router over the in-memory store and directory and
//! verifies the purchase and issuance contract: `security_key_2` is
//! minted at purchase, the QR endpoint binds both secrets into a
//! decodable token, and the mark-used route consumes a ticket exactly
//! once.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use axum_test::TestServer;
use chrono::Utc;
use http::StatusCode;
use olympia_core::{IdentitySummary, SecurityKey, TicketRecord, TicketToken, UserId};
use olympia_ticketing::{
    MemoryIdentityDirectory, MemoryTicketingStore, QrResponse, SalesSummary, TicketingState,
    build_router,
};
use serde_json::{Value, json};

fn holder(id: i64) -> IdentitySummary {
    IdentitySummary {
        id: UserId(id),
        email: format!("holder{id}@example.fr"),
        first_name: "Pierre".to_string(),
        last_name: "Martin".to_string(),
        security_key_1: SecurityKey::generate(),
        is_staff: false,
        is_admin: false,
    }
}

fn server_with(identities: &MemoryIdentityDirectory) -> TestServer {
    let state = TicketingState {
        store: MemoryTicketingStore::new(),
        identities: identities.clone(),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn offer_body() -> Value {
    json!({
        "name": "Finale 100m",
        "description": "Une place en tribune",
        "price": 250.0,
        "quantity": 1,
        "type": "solo",
        "event_date": Utc::now(),
    })
}

async fn purchase(server: &TestServer, user_id: i64) -> TicketRecord {
    let offer: Value = server.post("/offers").json(&offer_body()).await.json();
    let response = server
        .post("/tickets")
        .json(&json!({ "user_id": user_id, "offer_id": offer["id"] }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn purchase_against_missing_offer_is_404() {
    let server = server_with(&MemoryIdentityDirectory::new());

    let response = server
        .post("/tickets")
        .json(&json!({ "user_id": 1, "offer_id": 999 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Offer not found");
}

#[tokio::test]
async fn purchase_issues_distinct_keys() {
    let server = server_with(&MemoryIdentityDirectory::new());

    let a = purchase(&server, 1).await;
    let b = purchase(&server, 1).await;
    assert_ne!(a.security_key_2, b.security_key_2);
    assert!(!a.is_used);
}

#[tokio::test]
async fn qr_endpoint_binds_both_secrets() {
    let identities = MemoryIdentityDirectory::new();
    let server = server_with(&identities);

    let ticket = purchase(&server, 7).await;
    let holder = holder(7);
    identities.insert(holder.clone()).unwrap();

    let response = server.get(&format!("/tickets/{}/qrcode", ticket.id)).await;
    response.assert_status_ok();
    let body: QrResponse = response.json();
    assert!(body.qr_code.starts_with("data:image/png;base64,"));

    // The encoded payload must carry the ticket id and both keys.
    let token = TicketToken::new(
        ticket.id,
        holder.security_key_1,
        ticket.security_key_2.clone(),
    );
    let encoded = token.encode();
    let decoded: TicketToken = encoded.parse().unwrap();
    assert_eq!(decoded.ticket_id, ticket.id);
    assert_eq!(decoded.ticket_key, ticket.security_key_2);
}

#[tokio::test]
async fn qr_endpoint_without_known_holder_is_404() {
    let server = server_with(&MemoryIdentityDirectory::new());

    let ticket = purchase(&server, 42).await;
    server
        .get(&format!("/tickets/{}/qrcode", ticket.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mark_used_consumes_exactly_once() {
    let server = server_with(&MemoryIdentityDirectory::new());
    let ticket = purchase(&server, 1).await;
    let body = json!({ "used_at": Utc::now() });

    let first = server
        .post(&format!("/internal/tickets/{}/use", ticket.id))
        .json(&body)
        .await;
    first.assert_status_ok();

    let second = server
        .post(&format!("/internal/tickets/{}/use", ticket.id))
        .json(&body)
        .await;
    second.assert_status(StatusCode::CONFLICT);
    let detail: Value = second.json();
    assert_eq!(detail["detail"], "Ticket already used");

    let record: TicketRecord = server
        .get(&format!("/internal/tickets/{}", ticket.id))
        .await
        .json();
    assert!(record.is_used);
    assert!(record.used_at.is_some());
}

#[tokio::test]
async fn sales_report_reflects_purchases() {
    let server = server_with(&MemoryIdentityDirectory::new());

    let offer: Value = server.post("/offers").json(&offer_body()).await.json();
    let empty: Vec<SalesSummary> = server.get("/sales").await.json();
    assert_eq!(empty[0].tickets_sold, 0);

    for _ in 0..2 {
        server
            .post("/tickets")
            .json(&json!({ "user_id": 1, "offer_id": offer["id"] }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let summary: Vec<SalesSummary> = server.get("/sales").await.json();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].offer_name, "Finale 100m");
    assert_eq!(summary[0].tickets_sold, 2);
    assert!((summary[0].total_revenue - 500.0).abs() < f64::EPSILON);

    let detail: SalesSummary = server
        .get(&format!("/sales/{}", offer["id"]))
        .await
        .json();
    assert_eq!(detail.tickets_sold, 2);

    server
        .get("/sales/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn offer_lifecycle_create_update_delete() {
    let server = server_with(&MemoryIdentityDirectory::new());

    let created = server.post("/offers").json(&offer_body()).await;
    created.assert_status(StatusCode::CREATED);
    let offer: Value = created.json();
    // The category comes back under the same field name the client sent.
    assert_eq!(offer["type"], "solo");
    assert!(offer.get("offer_type").is_none());

    let mut updated_body = offer_body();
    updated_body["price"] = json!(300.0);
    let updated: Value = server
        .put(&format!("/offers/{}", offer["id"]))
        .json(&updated_body)
        .await
        .json();
    assert_eq!(updated["price"], 300.0);
    assert!(!updated["updated_at"].is_null());

    server
        .delete(&format!("/offers/{}", offer["id"]))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/offers/{}", offer["id"]))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
