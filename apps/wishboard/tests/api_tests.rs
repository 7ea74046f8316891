//! Integration tests for the Wishboard HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await in auth tests - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Mutex;
use wishboard::api::{
    AckResponse, AnalyticsResponse, AppState, HealthResponse, ListResponse, RequestResponse,
    WishlistItemResponse, WishlistListResponse, create_router,
};
use wishboard_core::{Identity, NewRequest, Registry, Status, UserPriority};

/// Mutex to serialize tests since router creation reads env vars.
static AUTH_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Guard wrapper that holds the mutex and ensures cleanup on drop.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
        unsafe {
            std::env::remove_var("WISHBOARD_API_KEY");
            std::env::remove_var("WISHBOARD_RATE_LIMIT");
        }
    }
}

/// Create a test server with a fresh in-memory registry and no enrichment.
/// Returns a guard that must be kept alive during the test.
fn create_test_server() -> (TestServer, TestGuard) {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::remove_var("WISHBOARD_API_KEY") };
    let state = AppState::new(Registry::new(), None);
    let router = create_router(state);
    (
        TestServer::new(router).unwrap(),
        TestGuard { _guard: guard },
    )
}

fn submit_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "a description",
        "app_id": "app-1",
        "app_name": "Demo",
    })
}

async fn submit_one(server: &TestServer, title: &str) -> u64 {
    let response = server.post("/requests").json(&submit_body(title)).await;
    response.assert_status(StatusCode::CREATED);
    let body: RequestResponse = response.json();
    body.request.unwrap().id.0
}

fn user_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_static("u-1"),
    )
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert!(!health.enrichment, "no enricher configured");
}

// =============================================================================
// SUBMISSION TESTS
// =============================================================================

#[tokio::test]
async fn test_submit_offline_starts_submitted() {
    let (server, _guard) = create_test_server();

    let response = server.post("/requests").json(&submit_body("Add dark mode")).await;

    response.assert_status(StatusCode::CREATED);
    let body: RequestResponse = response.json();
    let request = body.request.unwrap();
    assert_eq!(request.status, Status::Submitted);
    assert_eq!(request.submitted_by, "guest");
}

#[tokio::test]
async fn test_submit_with_identity_headers() {
    let (server, _guard) = create_test_server();

    let (name, value) = user_header();
    let response = server
        .post("/requests")
        .add_header(name, value)
        .add_header(
            HeaderName::from_static("x-user-name"),
            HeaderValue::from_static("Alice"),
        )
        .add_header(
            HeaderName::from_static("x-user-role"),
            HeaderValue::from_static("internal"),
        )
        .json(&submit_body("Add dark mode"))
        .await;

    let body: RequestResponse = response.json();
    let request = body.request.unwrap();
    assert_eq!(request.submitted_by, "u-1");
    assert_eq!(request.submitter_name, "Alice");
}

#[tokio::test]
async fn test_submit_blank_title_rejected() {
    let (server, _guard) = create_test_server();

    let response = server.post("/requests").json(&submit_body("   ")).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: RequestResponse = response.json();
    assert!(!body.success);
    assert!(body.error.unwrap().contains("title"));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (server, _guard) = create_test_server();

    submit_one(&server, "first").await;
    submit_one(&server, "second").await;

    let response = server.get("/requests").await;
    response.assert_status_ok();
    let body: ListResponse = response.json();
    assert_eq!(body.count, 2);
    assert_eq!(body.requests[0].title, "second");
}

#[tokio::test]
async fn test_list_status_filter() {
    let (server, _guard) = create_test_server();

    let id = submit_one(&server, "first").await;
    submit_one(&server, "second").await;

    server
        .post(&format!("/requests/{id}/status"))
        .json(&json!({"status": "approved"}))
        .await
        .assert_status_ok();

    let response = server.get("/requests?status=approved").await;
    response.assert_status_ok();
    let body: ListResponse = response.json();
    assert_eq!(body.count, 1);
    assert_eq!(body.requests[0].title, "first");

    let response = server.get("/requests?status=submitted").await;
    let body: ListResponse = response.json();
    assert_eq!(body.count, 1);
    assert_eq!(body.requests[0].title, "second");
}

// =============================================================================
// LIVE FEED TESTS
// =============================================================================

#[tokio::test]
async fn test_feed_starts_with_stored_listing() {
    // A server opened on an already-populated database must hand new
    // subscribers the stored listing, not an empty first snapshot.
    let mut registry = Registry::new();
    registry
        .submit(
            NewRequest {
                title: "Add dark mode".to_string(),
                description: "a description".to_string(),
                app_id: "app-1".to_string(),
                app_name: "Demo".to_string(),
                user_priority: UserPriority::Medium,
                tester_email: None,
                tags: Vec::new(),
            },
            &Identity::Guest,
            false,
            1,
        )
        .unwrap();

    let state = AppState::new(registry, None);

    let receiver = state.feed.subscribe();
    let snapshot = receiver.borrow();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "Add dark mode");
}

// =============================================================================
// SINGLE REQUEST TESTS
// =============================================================================

#[tokio::test]
async fn test_get_request_by_id() {
    let (server, _guard) = create_test_server();
    let id = submit_one(&server, "Add dark mode").await;

    let response = server.get(&format!("/requests/{id}")).await;
    response.assert_status_ok();
    let body: RequestResponse = response.json();
    assert_eq!(body.request.unwrap().title, "Add dark mode");
}

#[tokio::test]
async fn test_get_missing_request_is_404() {
    let (server, _guard) = create_test_server();

    let response = server.get("/requests/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_request() {
    let (server, _guard) = create_test_server();
    let id = submit_one(&server, "Add dark mode").await;

    let response = server.delete(&format!("/requests/{id}")).await;
    response.assert_status_ok();
    let body: AckResponse = response.json();
    assert!(body.success);

    let response = server.get(&format!("/requests/{id}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// VOTE TESTS
// =============================================================================

#[tokio::test]
async fn test_vote_up_and_saturating_down() {
    let (server, _guard) = create_test_server();
    let id = submit_one(&server, "Add dark mode").await;

    let response = server
        .post(&format!("/requests/{id}/vote"))
        .json(&json!({}))
        .await;
    response.assert_status_ok();
    let body: RequestResponse = response.json();
    assert_eq!(body.request.unwrap().votes, 1);

    // Two downvotes: count saturates at zero.
    for _ in 0..2 {
        let response = server
            .post(&format!("/requests/{id}/vote"))
            .json(&json!({"upvote": false}))
            .await;
        response.assert_status_ok();
    }
    let response = server.get(&format!("/requests/{id}")).await;
    let body: RequestResponse = response.json();
    assert_eq!(body.request.unwrap().votes, 0);
}

// =============================================================================
// WORKFLOW TESTS
// =============================================================================

#[tokio::test]
async fn test_transition_forward_and_conflict_backward() {
    let (server, _guard) = create_test_server();
    let id = submit_one(&server, "Add dark mode").await;

    let response = server
        .post(&format!("/requests/{id}/status"))
        .json(&json!({"status": "approved"}))
        .await;
    response.assert_status_ok();
    let body: RequestResponse = response.json();
    assert_eq!(body.request.unwrap().status, Status::Approved);

    // Backward move is rejected with 409.
    let response = server
        .post(&format!("/requests/{id}/status"))
        .json(&json!({"status": "analyzing"}))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_completion_records_timestamp() {
    let (server, _guard) = create_test_server();
    let id = submit_one(&server, "Add dark mode").await;

    let response = server
        .post(&format!("/requests/{id}/status"))
        .json(&json!({"status": "completed"}))
        .await;
    response.assert_status_ok();
    let request = response.json::<RequestResponse>().request.unwrap();
    assert_eq!(request.status, Status::Completed);
    assert!(request.actual_completion_ms.is_some());

    // Terminal: no further transitions.
    let response = server
        .post(&format!("/requests/{id}/status"))
        .json(&json!({"status": "in-progress"}))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

// =============================================================================
// COMMENT TESTS
// =============================================================================

#[tokio::test]
async fn test_comments_append() {
    let (server, _guard) = create_test_server();
    let id = submit_one(&server, "Add dark mode").await;

    let (name, value) = user_header();
    let response = server
        .post(&format!("/requests/{id}/comments"))
        .add_header(name, value)
        .json(&json!({"content": "please prioritize"}))
        .await;
    response.assert_status_ok();
    let request = response.json::<RequestResponse>().request.unwrap();
    assert_eq!(request.comments.len(), 1);
    assert_eq!(request.comments[0].user_id, "u-1");
    assert!(!request.comments[0].is_internal);
}

#[tokio::test]
async fn test_empty_comment_rejected() {
    let (server, _guard) = create_test_server();
    let id = submit_one(&server, "Add dark mode").await;

    let response = server
        .post(&format!("/requests/{id}/comments"))
        .json(&json!({"content": "  "}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// ANALYTICS TESTS
// =============================================================================

#[tokio::test]
async fn test_analytics_counts_statuses() {
    let (server, _guard) = create_test_server();
    submit_one(&server, "one").await;
    submit_one(&server, "two").await;

    let response = server.get("/analytics").await;
    response.assert_status_ok();
    let body: AnalyticsResponse = response.json();
    let summary = body.summary.unwrap();
    assert_eq!(summary.total_requests, 2);
    assert_eq!(summary.by_status.get(&Status::Submitted).copied(), Some(2));
}

// =============================================================================
// WISHLIST TESTS
// =============================================================================

#[tokio::test]
async fn test_wishlist_roundtrip() {
    let (server, _guard) = create_test_server();

    let (name, value) = user_header();
    let response = server
        .post("/wishlist")
        .add_header(name, value)
        .json(&json!({
            "product_name": "Desk lamp",
            "description": "Warm light",
            "is_public": true,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let item = response.json::<WishlistItemResponse>().item.unwrap();
    assert_eq!(item.owner, "u-1");

    // Owner listing via query parameter.
    let response = server.get("/wishlist?owner=u-1").await;
    response.assert_status_ok();
    let body: WishlistListResponse = response.json();
    assert_eq!(body.count, 1);

    // Public listing sees it too.
    let response = server.get("/wishlists/public").await;
    let body: WishlistListResponse = response.json();
    assert_eq!(body.count, 1);

    // Delete, then the owner listing is empty.
    let response = server.delete(&format!("/wishlist/{}", item.id.0)).await;
    response.assert_status_ok();
    let response = server.get("/wishlist?owner=u-1").await;
    let body: WishlistListResponse = response.json();
    assert_eq!(body.count, 0);
}

#[tokio::test]
async fn test_wishlist_owner_defaults_to_caller() {
    let (server, _guard) = create_test_server();

    let (name, value) = user_header();
    server
        .post("/wishlist")
        .add_header(name, value)
        .json(&json!({"product_name": "Desk lamp"}))
        .await
        .assert_status(StatusCode::CREATED);

    // Guest caller without ?owner= sees the guest list, not u-1's.
    let response = server.get("/wishlist").await;
    let body: WishlistListResponse = response.json();
    assert_eq!(body.count, 0);

    let (name, value) = user_header();
    let response = server.get("/wishlist").add_header(name, value).await;
    let body: WishlistListResponse = response.json();
    assert_eq!(body.count, 1);
}

#[tokio::test]
async fn test_wishlist_delete_missing_is_404() {
    let (server, _guard) = create_test_server();

    let response = server.delete("/wishlist/42").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// AUTHENTICATION TESTS
// =============================================================================

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("WISHBOARD_API_KEY", "secret-key") };
    let _cleanup = TestGuard { _guard: guard };

    let state = AppState::new(Registry::new(), None);
    let server = TestServer::new(create_router(state)).unwrap();

    // Health stays open for load balancer checks.
    server.get("/health").await.assert_status_ok();

    // Everything else requires the key.
    server
        .get("/requests")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/requests")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer secret-key"),
        )
        .await;
    response.assert_status_ok();

    // Wrong key is rejected.
    server
        .get("/requests")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer wrong-key"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// =============================================================================
// RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_replies_with_error_envelope() {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe {
        std::env::remove_var("WISHBOARD_API_KEY");
        std::env::set_var("WISHBOARD_RATE_LIMIT", "2");
    }
    let _cleanup = TestGuard { _guard: guard };

    let state = AppState::new(Registry::new(), None);
    let server = TestServer::new(create_router(state)).unwrap();

    // The burst allowance covers the first two requests.
    server.get("/health").await.assert_status_ok();
    server.get("/health").await.assert_status_ok();

    let response = server.get("/health").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: AckResponse = response.json();
    assert!(!body.success);
    assert!(body.error.unwrap().contains("rate limit"));
}
