//! API Integration Tests for the Whamageddon Backend
//!
//! Drives the HTTP surface end to end: group creation, joining, defeat
//! reports, and the change feed notifications other tabs rely on.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::{Service, ServiceExt};

use whamageddon_backend::api;
use whamageddon_backend::infrastructure::app_state::AppState;

/// Helper to create a test application, returning the state so tests can
/// observe the change feed directly (the "second tab").
async fn create_test_app() -> (Router, Arc<AppState>) {
    // Set test environment
    std::env::set_var("DATABASE_URL", "sqlite::memory:");

    let state = AppState::new().await.expect("Failed to create app state");
    let state = Arc::new(state);

    let app = Router::new()
        .nest("/api", api::routes::create_api_router(state.clone()))
        .with_state(state.clone());

    (app, state)
}

/// Helper to make a POST request with JSON body
async fn post_json(app: &mut Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = ServiceExt::<Request<Body>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request
async fn get(app: &mut Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = ServiceExt::<Request<Body>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Create a group and return its slug
async fn create_group(app: &mut Router, name: &str) -> String {
    let (status, body) = post_json(app, "/api/groups", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED);
    body["group"]["slug"].as_str().unwrap().to_string()
}

/// Join a group and return the new player's id
async fn join(app: &mut Router, slug: &str, name: &str) -> String {
    let (status, body) = post_json(
        app,
        &format!("/api/groups/{}/players", slug),
        json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["player"]["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (mut app, _state) = create_test_app().await;

    let (status, body) = get(&mut app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ============================================================================
// Group Creation
// ============================================================================

#[tokio::test]
async fn test_create_group_derives_slug() {
    let (mut app, _state) = create_test_app().await;

    let (status, body) = post_json(
        &mut app,
        "/api/groups",
        json!({ "name": "Accounts Payable" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["group"]["name"], "Accounts Payable");

    let slug = body["group"]["slug"].as_str().unwrap();
    let (base, suffix) = slug.rsplit_once('-').unwrap();
    assert_eq!(base, "accounts-payable");
    let suffix: u32 = suffix.parse().expect("numeric suffix");
    assert!(suffix < 1000);
}

#[tokio::test]
async fn test_create_group_missing_name() {
    let (mut app, _state) = create_test_app().await;

    let (status, body) = post_json(&mut app, "/api/groups", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_GROUP_NAME");

    let (status, body) = post_json(&mut app, "/api/groups", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_GROUP_NAME");
}

#[tokio::test]
async fn test_new_group_has_empty_roster() {
    let (mut app, _state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;

    let (status, body) = get(&mut app, &format!("/api/groups/{}", slug)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groupName"], "Accounts Payable");
    assert_eq!(body["players"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_slug_loads_without_a_group() {
    let (mut app, _state) = create_test_app().await;

    // Not an error state: the name stays unset and the list is empty.
    let (status, body) = get(&mut app, "/api/groups/no-such-group-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groupName"], Value::Null);
    assert_eq!(body["players"].as_array().unwrap().len(), 0);
}

// ============================================================================
// Joining
// ============================================================================

#[tokio::test]
async fn test_join_creates_surviving_player() {
    let (mut app, _state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;

    let (status, body) = post_json(
        &mut app,
        &format!("/api/groups/{}/players", slug),
        json!({ "name": "Alex" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["player"]["name"], "Alex");
    assert_eq!(body["player"]["status"], "alive");
    assert_eq!(body["player"]["whammedAt"], Value::Null);

    let (_, roster) = get(&mut app, &format!("/api/groups/{}", slug)).await;
    let players = roster["players"].as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["status"], "alive");
}

#[tokio::test]
async fn test_join_unknown_group() {
    let (mut app, _state) = create_test_app().await;

    let (status, body) = post_json(
        &mut app,
        "/api/groups/no-such-group-1/players",
        json!({ "name": "Alex" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GROUP_NOT_FOUND");
}

#[tokio::test]
async fn test_join_missing_name() {
    let (mut app, _state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;

    let (status, body) =
        post_json(&mut app, &format!("/api/groups/{}/players", slug), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_PLAYER_NAME");
}

// ============================================================================
// Defeat Reports
// ============================================================================

#[tokio::test]
async fn test_report_defeat_moves_player_to_fallen() {
    let (mut app, _state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;
    let player_id = join(&mut app, &slug, "Alex").await;

    let (status, body) =
        post_json(&mut app, &format!("/api/players/{}/whammed", player_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    assert_eq!(body["player"]["status"], "whammed");
    assert!(body["player"]["whammedAt"].is_string());

    let (_, roster) = get(&mut app, &format!("/api/groups/{}", slug)).await;
    let players = roster["players"].as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["status"], "whammed");
}

#[tokio::test]
async fn test_report_defeat_is_first_write_wins() {
    let (mut app, _state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;
    let player_id = join(&mut app, &slug, "Alex").await;

    let (_, first) =
        post_json(&mut app, &format!("/api/players/{}/whammed", player_id), json!({})).await;
    assert_eq!(first["changed"], true);

    let (status, second) =
        post_json(&mut app, &format!("/api/players/{}/whammed", player_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["changed"], false);
    // The repeat report must not move the elimination time.
    assert_eq!(second["player"]["whammedAt"], first["player"]["whammedAt"]);
}

#[tokio::test]
async fn test_report_defeat_unknown_player() {
    let (mut app, _state) = create_test_app().await;

    let (status, body) =
        post_json(&mut app, "/api/players/no-such-player/whammed", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PLAYER_NOT_FOUND");
}

#[tokio::test]
async fn test_roster_lists_survivors_before_fallen() {
    let (mut app, _state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;
    let whammed_id = join(&mut app, &slug, "Alex").await;
    join(&mut app, &slug, "Sam").await;

    post_json(&mut app, &format!("/api/players/{}/whammed", whammed_id), json!({})).await;

    let (_, roster) = get(&mut app, &format!("/api/groups/{}", slug)).await;
    let players = roster["players"].as_array().unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0]["name"], "Sam");
    assert_eq!(players[0]["status"], "alive");
    assert_eq!(players[1]["name"], "Alex");
    assert_eq!(players[1]["status"], "whammed");
}

// ============================================================================
// Change Feed
// ============================================================================

#[tokio::test]
async fn test_writes_notify_the_other_tab() {
    let (mut app, state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;

    // Tab B holds a subscription and performs no writes of its own.
    let mut tab_b = state.change_feed.subscribe(&slug);

    // Tab A joins...
    let player_id = join(&mut app, &slug, "Alex").await;

    let event = tokio::time::timeout(Duration::from_secs(1), tab_b.recv())
        .await
        .expect("join event should arrive")
        .unwrap();
    assert_eq!(event.group_slug, slug);
    assert_eq!(event.player_id, player_id);

    // ...and later reports defeat.
    post_json(&mut app, &format!("/api/players/{}/whammed", player_id), json!({})).await;

    let event = tokio::time::timeout(Duration::from_secs(1), tab_b.recv())
        .await
        .expect("defeat event should arrive")
        .unwrap();
    assert_eq!(event.player_id, player_id);
}

#[tokio::test]
async fn test_sse_stream_carries_change_events() {
    use futures::StreamExt;

    let (mut app, _state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;

    // Open the group's event stream like a second tab would.
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/groups/{}/events", slug))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body().into_data_stream();

    let first = tokio::time::timeout(Duration::from_secs(1), body.next())
        .await
        .expect("initial event should arrive")
        .unwrap()
        .unwrap();
    assert!(String::from_utf8_lossy(&first).contains("event: connected"));

    let player_id = join(&mut app, &slug, "Alex").await;

    let frame = tokio::time::timeout(Duration::from_secs(1), body.next())
        .await
        .expect("change event should arrive")
        .unwrap()
        .unwrap();
    let frame = String::from_utf8_lossy(&frame);
    assert!(frame.contains("event: change"));
    assert!(frame.contains(&player_id));
}

#[tokio::test]
async fn test_repeat_defeat_reports_publish_nothing() {
    let (mut app, state) = create_test_app().await;

    let slug = create_group(&mut app, "Accounts Payable").await;
    let player_id = join(&mut app, &slug, "Alex").await;

    post_json(&mut app, &format!("/api/players/{}/whammed", player_id), json!({})).await;

    let mut tab_b = state.change_feed.subscribe(&slug);
    post_json(&mut app, &format!("/api/players/{}/whammed", player_id), json!({})).await;

    // Nothing changed, so nothing is broadcast.
    let result = tokio::time::timeout(Duration::from_millis(200), tab_b.recv()).await;
    assert!(result.is_err(), "no event expected for a no-op report");
}
