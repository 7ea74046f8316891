//! # Wishboard HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Health check
//! - `POST /requests` - Submit a feature request
//! - `GET  /requests` - List requests, newest first
//! - `GET  /requests/feed` - Live listing as server-sent events
//! - `GET  /requests/{id}` - Fetch one request
//! - `POST /requests/{id}/vote` - Up/down vote
//! - `POST /requests/{id}/status` - Status transition
//! - `POST /requests/{id}/comments` - Append a comment
//! - `DELETE /requests/{id}` - Delete a request
//! - `GET  /analytics` - Aggregate analytics
//! - `POST /wishlist` - Add a wishlist item
//! - `GET  /wishlist` - List wishlist items (`?owner=`, default caller)
//! - `DELETE /wishlist/{id}` - Remove a wishlist item
//! - `GET  /wishlists/public` - All public wishlist items
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `WISHBOARD_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `WISHBOARD_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `WISHBOARD_API_KEY`: If set, requires Bearer token authentication

pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod types;

pub use auth::{get_api_key_from_env, identity_from_headers};
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    AckResponse, AnalyticsResponse, CommentRequest, HealthResponse, ListResponse, RequestResponse,
    SubmitRequest, TransitionRequest, VoteRequest, WishlistCreateRequest, WishlistItemResponse,
    WishlistListResponse,
};

use crate::enrich::Enricher;
use crate::feed::{self, FeedSender};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wishboard_core::{Registry, WishboardError};

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The request registry.
    pub registry: Arc<RwLock<Registry>>,
    /// Live feed publisher.
    pub feed: FeedSender,
    /// Enrichment chain, absent in offline mode.
    pub enricher: Option<Arc<Enricher>>,
}

impl AppState {
    /// Create new app state around a registry.
    ///
    /// Seeds the feed with the registry's current listing, so the first
    /// SSE event carries stored requests rather than an empty snapshot.
    #[must_use]
    pub fn new(registry: Registry, enricher: Option<Enricher>) -> Self {
        let (sender, _receiver) = feed::channel();
        feed::publish(&sender, &registry);
        Self {
            registry: Arc::new(RwLock::new(registry)),
            feed: sender,
            enricher: enricher.map(Arc::new),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `WISHBOARD_CORS_ORIGINS`:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("WISHBOARD_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (WISHBOARD_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in WISHBOARD_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No WISHBOARD_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Body limit - 2 MiB cap on request bodies
/// 4. Rate Limiting - protects against DoS (if enabled)
/// 5. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set WISHBOARD_API_KEY environment variable to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/requests",
            post(handlers::submit_handler).get(handlers::list_requests_handler),
        )
        .route("/requests/feed", get(handlers::feed_handler))
        .route(
            "/requests/{id}",
            get(handlers::get_request_handler).delete(handlers::delete_request_handler),
        )
        .route("/requests/{id}/vote", post(handlers::vote_handler))
        .route("/requests/{id}/status", post(handlers::transition_handler))
        .route("/requests/{id}/comments", post(handlers::comment_handler))
        .route("/analytics", get(handlers::analytics_handler))
        .route(
            "/wishlist",
            post(handlers::wishlist_create_handler).get(handlers::wishlist_list_handler),
        )
        .route("/wishlist/{id}", delete(handlers::wishlist_delete_handler))
        .route("/wishlists/public", get(handlers::public_wishlist_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply body limit, CORS and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(
    addr: &str,
    registry: Registry,
    enricher: Option<Enricher>,
) -> Result<(), WishboardError> {
    let state = AppState::new(registry, enricher);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| WishboardError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Wishboard HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| WishboardError::IoError(format!("Server error: {}", e)))
}
