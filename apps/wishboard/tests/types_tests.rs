//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use wishboard::api::{
    HealthResponse, ListResponse, RequestResponse, SubmitRequest, TransitionRequest, VoteRequest,
    WishlistCreateRequest,
};
use wishboard_core::{Status, UserPriority};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse::new(true);

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"enrichment\":true"));
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"ok","version":"0.4.2","enrichment":false}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.version, "0.4.2");
    assert!(!health.enrichment);
}

// =============================================================================
// SUBMIT REQUEST TESTS
// =============================================================================

#[test]
fn test_submit_request_minimal_body() {
    let json = r#"{
        "title": "Add dark mode",
        "description": "Dim the UI at night",
        "app_id": "app-1",
        "app_name": "Demo"
    }"#;
    let body: SubmitRequest = serde_json::from_str(json).unwrap();

    assert_eq!(body.title, "Add dark mode");
    assert_eq!(body.priority, UserPriority::Medium);
    assert!(body.tester_email.is_none());
    assert!(body.tags.is_empty());
}

#[test]
fn test_submit_request_priority_is_kebab_case() {
    let json = r#"{
        "title": "t",
        "description": "d",
        "app_id": "a",
        "app_name": "A",
        "priority": "critical"
    }"#;
    let body: SubmitRequest = serde_json::from_str(json).unwrap();
    assert_eq!(body.priority, UserPriority::Critical);

    // Pascal-case labels are rejected.
    let bad = r#"{"title":"t","description":"d","app_id":"a","app_name":"A","priority":"Critical"}"#;
    assert!(serde_json::from_str::<SubmitRequest>(bad).is_err());
}

// =============================================================================
// MUTATION BODY TESTS
// =============================================================================

#[test]
fn test_vote_request_default_is_upvote() {
    let vote: VoteRequest = serde_json::from_str("{}").unwrap();
    assert!(vote.upvote);
}

#[test]
fn test_transition_request_uses_kebab_case_statuses() {
    let body: TransitionRequest = serde_json::from_str(r#"{"status":"in-progress"}"#).unwrap();
    assert_eq!(body.status, Status::InProgress);

    assert!(serde_json::from_str::<TransitionRequest>(r#"{"status":"InProgress"}"#).is_err());
}

#[test]
fn test_wishlist_create_defaults() {
    let body: WishlistCreateRequest =
        serde_json::from_str(r#"{"product_name":"Desk lamp"}"#).unwrap();
    assert_eq!(body.product_name, "Desk lamp");
    assert!(body.description.is_empty());
    assert!(!body.is_public);
    assert!(body.image_url.is_none());
}

// =============================================================================
// RESPONSE ENVELOPE TESTS
// =============================================================================

#[test]
fn test_request_response_error_shape() {
    let response = RequestResponse::error("request 7 not found");

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"success\":false"));
    assert!(json.contains("request 7 not found"));

    let parsed: RequestResponse = serde_json::from_str(&json).unwrap();
    assert!(parsed.request.is_none());
    assert_eq!(parsed.error.as_deref(), Some("request 7 not found"));
}

#[test]
fn test_list_response_counts_requests() {
    let response = ListResponse::success(Vec::new());
    assert!(response.success);
    assert_eq!(response.count, 0);

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"count\":0"));
}
