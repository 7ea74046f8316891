//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Mutating handlers republish the live feed before responding, so SSE
//! subscribers observe every change. Submission spawns the enrichment
//! chain as a background task; the HTTP response never waits on the
//! model.

use super::{
    AppState, auth,
    types::{
        AckResponse, AnalyticsResponse, CommentRequest, HealthResponse, ListResponse,
        RequestResponse, SubmitRequest, TransitionRequest, VoteRequest, WishlistCreateRequest,
        WishlistItemResponse, WishlistListResponse, error_status,
    },
};
use crate::feed;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_stream::{Stream, StreamExt, wrappers::WatchStream};
use wishboard_core::{RequestId, WishlistId};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::new(state.enricher.is_some()))
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Submit a new feature request.
///
/// Returns 201 with the stored record. When an enrichment backend is
/// configured the chain is spawned in the background and the record
/// starts in `analyzing`; otherwise it starts in `submitted`.
pub async fn submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitRequest>,
) -> impl IntoResponse {
    let draft = match body.to_draft() {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(RequestResponse::error(e.to_string())),
            );
        }
    };

    let identity = auth::identity_from_headers(&headers);
    let enrichment_configured = state.enricher.is_some();

    let request = {
        let mut registry = state.registry.write().await;
        match registry.submit(draft, &identity, enrichment_configured, crate::now_ms()) {
            Ok(request) => {
                feed::publish(&state.feed, &registry);
                request
            }
            Err(e) => return (error_status(&e), Json(RequestResponse::error(e.to_string()))),
        }
    };

    if let Some(enricher) = &state.enricher {
        let enricher = Arc::clone(enricher);
        let registry = Arc::clone(&state.registry);
        let sender = state.feed.clone();
        let id = request.id;
        tokio::spawn(async move {
            enricher.enrich(registry, sender, id).await;
        });
    }

    (StatusCode::CREATED, Json(RequestResponse::success(request)))
}

// =============================================================================
// READS
// =============================================================================

/// Filters for the request listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<wishboard_core::Status>,
    pub category: Option<wishboard_core::Category>,
}

/// List all requests, newest first.
///
/// Optional `status` and `category` query parameters filter by equality;
/// category filtering only matches analyzed requests.
pub async fn list_requests_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let registry = state.registry.read().await;
    match registry.list() {
        Ok(requests) => {
            let requests: Vec<_> = requests
                .into_iter()
                .filter(|r| query.status.is_none_or(|s| r.status == s))
                .filter(|r| {
                    query.category.is_none_or(|c| {
                        r.analysis.as_ref().is_some_and(|a| a.category == c)
                    })
                })
                .collect();
            (StatusCode::OK, Json(ListResponse::success(requests)))
        }
        Err(e) => (error_status(&e), Json(ListResponse::error(e.to_string()))),
    }
}

/// Fetch a single request.
pub async fn get_request_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let registry = state.registry.read().await;
    match registry.get(RequestId(id)) {
        Ok(request) => (StatusCode::OK, Json(RequestResponse::success(request))),
        Err(e) => (error_status(&e), Json(RequestResponse::error(e.to_string()))),
    }
}

/// Live feed of the request listing as server-sent events.
///
/// Each event carries the full listing, newest first. Subscribers get
/// the current snapshot immediately and a new event after every change.
pub async fn feed_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(state.feed.subscribe())
        .map(|requests| Event::default().event("requests").json_data(&requests));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Apply an up or down vote.
pub async fn vote_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<VoteRequest>,
) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    match registry.vote(RequestId(id), body.upvote) {
        Ok(request) => {
            feed::publish(&state.feed, &registry);
            (StatusCode::OK, Json(RequestResponse::success(request)))
        }
        Err(e) => (error_status(&e), Json(RequestResponse::error(e.to_string()))),
    }
}

/// Transition a request to a new status.
///
/// Backward and terminal-exit transitions are rejected with 409.
pub async fn transition_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<TransitionRequest>,
) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    match registry.transition(RequestId(id), body.status, crate::now_ms()) {
        Ok(request) => {
            feed::publish(&state.feed, &registry);
            (StatusCode::OK, Json(RequestResponse::success(request)))
        }
        Err(e) => (error_status(&e), Json(RequestResponse::error(e.to_string()))),
    }
}

/// Append a comment to a request.
pub async fn comment_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<CommentRequest>,
) -> impl IntoResponse {
    let identity = auth::identity_from_headers(&headers);
    let mut registry = state.registry.write().await;
    match registry.add_comment(
        RequestId(id),
        &identity,
        body.content,
        body.internal,
        crate::now_ms(),
    ) {
        Ok(request) => {
            feed::publish(&state.feed, &registry);
            (StatusCode::OK, Json(RequestResponse::success(request)))
        }
        Err(e) => (error_status(&e), Json(RequestResponse::error(e.to_string()))),
    }
}

/// Delete a request outright.
pub async fn delete_request_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    match registry.delete(RequestId(id)) {
        Ok(()) => {
            feed::publish(&state.feed, &registry);
            (StatusCode::OK, Json(AckResponse::success()))
        }
        Err(e) => (error_status(&e), Json(AckResponse::error(e.to_string()))),
    }
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// Aggregate analytics over all requests.
pub async fn analytics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;
    match registry.analytics() {
        Ok(summary) => (StatusCode::OK, Json(AnalyticsResponse::success(summary))),
        Err(e) => (
            error_status(&e),
            Json(AnalyticsResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// WISHLIST
// =============================================================================

/// Owner filter for wishlist listings.
#[derive(Debug, Deserialize)]
pub struct WishlistQuery {
    pub owner: Option<String>,
}

/// Add a wishlist item owned by the caller.
pub async fn wishlist_create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<WishlistCreateRequest>,
) -> impl IntoResponse {
    let identity = auth::identity_from_headers(&headers);
    let mut registry = state.registry.write().await;
    match registry.add_wishlist_item(
        identity.user_id(),
        body.product_name,
        body.description,
        body.image_url,
        body.original_url,
        body.is_public,
        crate::now_ms(),
    ) {
        Ok(item) => (StatusCode::CREATED, Json(WishlistItemResponse::success(item))),
        Err(e) => (
            error_status(&e),
            Json(WishlistItemResponse::error(e.to_string())),
        ),
    }
}

/// List wishlist items for an owner.
///
/// The `owner` query parameter defaults to the caller's identity.
pub async fn wishlist_list_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WishlistQuery>,
) -> impl IntoResponse {
    let identity = auth::identity_from_headers(&headers);
    let owner = query
        .owner
        .unwrap_or_else(|| identity.user_id().to_string());

    let registry = state.registry.read().await;
    match registry.wishlist_for_owner(&owner) {
        Ok(items) => (StatusCode::OK, Json(WishlistListResponse::success(items))),
        Err(e) => (
            error_status(&e),
            Json(WishlistListResponse::error(e.to_string())),
        ),
    }
}

/// Remove a wishlist item.
pub async fn wishlist_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    match registry.remove_wishlist_item(WishlistId(id)) {
        Ok(()) => (StatusCode::OK, Json(AckResponse::success())),
        Err(e) => (error_status(&e), Json(AckResponse::error(e.to_string()))),
    }
}

/// List all public wishlist items.
pub async fn public_wishlist_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;
    match registry.public_wishlist() {
        Ok(items) => (StatusCode::OK, Json(WishlistListResponse::success(items))),
        Err(e) => (
            error_status(&e),
            Json(WishlistListResponse::error(e.to_string())),
        ),
    }
}
