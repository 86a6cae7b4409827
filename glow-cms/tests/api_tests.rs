//! Integration tests for glow-cms API endpoints
//!
//! Tests cover:
//! - Digital-layout listing, creation, and atomic batch replace
//! - Card/magazine event ingestion with best-effort skipping
//! - Dashboard aggregation with date-range tokens and fallback
//! - Condensed-card section sync
//! - Health endpoint

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use glow_cms::{build_router, AppState};
use serde_json::{json, Value};

/// Test helper: router over a fresh in-memory database
async fn setup_app() -> axum::Router {
    let pool = glow_common::db::connect_memory()
        .await
        .expect("Should open in-memory database");
    build_router(AppState::new(pool))
}

/// Test helper: GET request
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: POST request with a JSON body
fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: issue a request against a clone of the app
async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    use tower::util::ServiceExt;
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = extract_json(response.into_body()).await;
    (status, body)
}

fn recent_timestamp() -> String {
    (chrono::Utc::now() - chrono::Duration::hours(1)).to_rfc3339()
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "glow-cms");
    assert!(body["version"].is_string());
}

// =============================================================================
// Digital Layouts
// =============================================================================

#[tokio::test]
async fn test_list_layouts_empty_issue() {
    let app = setup_app().await;
    let (status, body) = send(&app, get("/digital-layouts?issueId=issue-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_layouts_requires_issue_id() {
    let app = setup_app().await;
    let (status, body) = send(&app, get("/digital-layouts")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_layout() {
    let app = setup_app().await;
    let request = post_json(
        "/digital-layouts",
        json!({
            "issueId": "issue-1",
            "template": "cover",
            "objects": [
                { "type": "text", "content": "Spring Edit", "x": 10.0, "y": 20.0 }
            ]
        }),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["template"], "cover");
    assert!(body["data"][0]["id"].is_string());

    let (_, listed) = send(&app, get("/digital-layouts?issueId=issue-1")).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_layout_missing_template_is_rejected() {
    let app = setup_app().await;
    let request = post_json("/digital-layouts", json!({ "issueId": "issue-1" }));
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_batch_replace_round_trips_in_order() {
    let app = setup_app().await;
    let request = post_json(
        "/digital-layouts/batch",
        json!({
            "issueId": "issue-1",
            "layouts": [
                { "template": "cover" },
                { "template": "spread" },
                { "template": "back" }
            ]
        }),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, listed) = send(&app, get("/digital-layouts?issueId=issue-1")).await;
    let templates: Vec<&str> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["template"].as_str().unwrap())
        .collect();
    assert_eq!(templates, vec!["cover", "spread", "back"]);
}

#[tokio::test]
async fn test_batch_submission_order_wins_over_client_position_fields() {
    let app = setup_app().await;
    // Stray position fields in the payload are ignored; the submitted
    // order is the stored order
    let request = post_json(
        "/digital-layouts/batch",
        json!({
            "issueId": "issue-1",
            "layouts": [
                { "template": "first", "position": 5 },
                { "template": "second", "position": 2 }
            ]
        }),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let returned: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["template"].as_str().unwrap())
        .collect();
    assert_eq!(returned, vec!["first", "second"]);

    let (_, listed) = send(&app, get("/digital-layouts?issueId=issue-1")).await;
    let stored: Vec<&str> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["template"].as_str().unwrap())
        .collect();
    assert_eq!(stored, returned);
}

#[tokio::test]
async fn test_batch_replace_with_empty_set_clears_issue() {
    let app = setup_app().await;
    let seed = post_json(
        "/digital-layouts/batch",
        json!({
            "issueId": "issue-1",
            "layouts": [
                { "template": "a" }, { "template": "b" }, { "template": "c" },
                { "template": "d" }, { "template": "e" }
            ]
        }),
    );
    send(&app, seed).await;

    let clear = post_json(
        "/digital-layouts/batch",
        json!({ "issueId": "issue-1", "layouts": [] }),
    );
    let (status, _) = send(&app, clear).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, get("/digital-layouts?issueId=issue-1")).await;
    assert_eq!(listed["data"], json!([]));
}

#[tokio::test]
async fn test_failed_batch_validation_keeps_previous_set() {
    let app = setup_app().await;
    let seed = post_json(
        "/digital-layouts/batch",
        json!({
            "issueId": "issue-1",
            "layouts": [{ "template": "cover" }, { "template": "spread" }]
        }),
    );
    send(&app, seed).await;
    let (_, before) = send(&app, get("/digital-layouts?issueId=issue-1")).await;

    // Duplicate explicit ids fail validation for the whole batch
    let bad = post_json(
        "/digital-layouts/batch",
        json!({
            "issueId": "issue-1",
            "layouts": [
                { "id": "dup", "template": "x" },
                { "id": "dup", "template": "y" }
            ]
        }),
    );
    let (status, body) = send(&app, bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, after) = send(&app, get("/digital-layouts?issueId=issue-1")).await;
    assert_eq!(before["data"], after["data"]);
}

// =============================================================================
// Analytics: ingestion
// =============================================================================

#[tokio::test]
async fn test_card_event_ingestion_counts_only_valid_events() {
    let app = setup_app().await;
    let request = post_json(
        "/analytics/card-events",
        json!({
            "events": [
                { "cardId": "abc", "eventType": "view", "occurredAt": recent_timestamp() },
                { "cardId": "abc", "eventType": "view" },
                { "cardId": "abc", "eventType": "share", "occurredAt": recent_timestamp() }
            ]
        }),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_oversized_event_batch_is_rejected() {
    let app = setup_app().await;
    let events: Vec<Value> = (0..101)
        .map(|_| json!({ "cardId": "abc", "eventType": "view", "occurredAt": recent_timestamp() }))
        .collect();
    let (status, body) = send(
        &app,
        post_json("/analytics/card-events", json!({ "events": events })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

// =============================================================================
// Analytics: dashboards
// =============================================================================

#[tokio::test]
async fn test_card_dashboard_reflects_recent_views() {
    let app = setup_app().await;
    let ingest = post_json(
        "/analytics/card-events",
        json!({
            "events": [
                { "cardId": "abc", "eventType": "view", "occurredAt": recent_timestamp() },
                { "cardId": "abc", "eventType": "view", "occurredAt": recent_timestamp() },
                { "cardId": "abc", "eventType": "view", "occurredAt": recent_timestamp() }
            ]
        }),
    );
    let (_, ingested) = send(&app, ingest).await;
    assert_eq!(ingested["count"], 3);

    let (status, body) = send(&app, get("/analytics/card-dashboard?dateRange=7d")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["cardId"], "abc");
    assert_eq!(body["data"][0]["views"], 3);
}

#[tokio::test]
async fn test_dashboard_with_unknown_range_token_uses_default() {
    let app = setup_app().await;
    let (status, body) = send(&app, get("/analytics/card-dashboard?dateRange=bogus")).await;

    // Falls back to 30d instead of erroring
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_magazine_dashboard_groups_by_page() {
    let app = setup_app().await;
    let ingest = post_json(
        "/analytics/magazine-events",
        json!({
            "events": [
                { "issueId": "issue-1", "pageId": "p1", "eventType": "pageView",
                  "occurredAt": recent_timestamp(), "durationMs": 3000 },
                { "issueId": "issue-1", "pageId": "p1", "eventType": "pageView",
                  "occurredAt": recent_timestamp(), "durationMs": 5000 },
                { "issueId": "issue-1", "pageId": "p2", "eventType": "linkClick",
                  "occurredAt": recent_timestamp() }
            ]
        }),
    );
    let (_, ingested) = send(&app, ingest).await;
    assert_eq!(ingested["count"], 3);

    let (status, body) = send(
        &app,
        get("/analytics/magazine-dashboard/issue-1/pages?dateRange=30d"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let pages = body["data"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["pageId"], "p1");
    assert_eq!(pages[0]["pageViews"], 2);
    assert_eq!(pages[0]["avgDwellMs"], 4000.0);
    assert_eq!(pages[1]["pageId"], "p2");
    assert_eq!(pages[1]["linkClicks"], 1);
}

#[tokio::test]
async fn test_magazine_dashboard_for_quiet_issue_is_empty() {
    let app = setup_app().await;
    let (status, body) = send(
        &app,
        get("/analytics/magazine-dashboard/issue-9/pages?dateRange=all"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

// =============================================================================
// Condensed-card section sync
// =============================================================================

#[tokio::test]
async fn test_condensed_sync_materializes_missing_entries() {
    let app = setup_app().await;
    let request = post_json(
        "/cards/condensed-sync",
        json!({
            "sections": [
                { "id": "about", "title": "About" },
                { "id": "services", "title": "Services" }
            ],
            "entries": [
                { "sectionId": "about", "position": 0, "hidden": true }
            ]
        }),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Existing customized entry untouched
    assert_eq!(entries[0], json!({ "sectionId": "about", "position": 0, "hidden": true }));
    // New entry appended with default positioning
    assert_eq!(entries[1]["sectionId"], "services");
    assert_eq!(entries[1]["position"], 1);
    assert_eq!(entries[1]["hidden"], false);
}

#[tokio::test]
async fn test_condensed_sync_is_idempotent_over_the_wire() {
    let app = setup_app().await;
    let sections = json!([
        { "id": "about", "title": "About" },
        { "id": "gallery", "title": "Gallery" }
    ]);

    let first = post_json(
        "/cards/condensed-sync",
        json!({ "sections": sections.clone(), "entries": [] }),
    );
    let (_, first_body) = send(&app, first).await;
    let merged = first_body["data"].clone();

    let second = post_json(
        "/cards/condensed-sync",
        json!({ "sections": sections, "entries": merged }),
    );
    let (_, second_body) = send(&app, second).await;

    assert_eq!(second_body["data"], first_body["data"]);
}
