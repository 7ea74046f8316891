//! # Authentication Module
//!
//! API key authentication and caller identity for the Wishboard HTTP API.
//!
//! ## Configuration
//!
//! - `WISHBOARD_API_KEY`: if set, all requests except `/health` require
//!   this key via `Authorization: Bearer <key>` (or the raw key).
//!
//! ## Identity
//!
//! Caller identity is carried in trusted headers set by the fronting
//! proxy: `x-user-id`, `x-user-name`, `x-user-role`. Requests without an
//! id header act as the guest identity; identity extraction never fails.

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use wishboard_core::{Identity, SubmitterRole};

// =============================================================================
// API KEY AUTHENTICATION
// =============================================================================

/// Get API key from environment variable.
///
/// Returns `Some(key)` if `WISHBOARD_API_KEY` is set and non-empty,
/// `None` otherwise (disabling authentication).
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("WISHBOARD_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// API key authentication middleware.
///
/// If `WISHBOARD_API_KEY` is set:
/// - `/health` is always allowed (for load balancer health checks)
/// - all other endpoints require the key in the Authorization header
///
/// If `WISHBOARD_API_KEY` is not set, all requests are allowed.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = get_api_key_from_env() else {
        return Ok(next.run(request).await);
    };

    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) => {
            // Support both "Bearer <key>" and raw "<key>" formats
            let provided_key = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

            // Constant-time comparison to prevent timing attacks.
            // Pad both keys to the same length so ct_eq always runs over
            // the same number of bytes, preventing length-leaking side channels.
            let provided_bytes = provided_key.as_bytes();
            let expected_bytes = expected.as_bytes();

            let max_len = provided_bytes.len().max(expected_bytes.len());
            let mut padded_provided = vec![0u8; max_len];
            let mut padded_expected = vec![0u8; max_len];
            padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
            padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

            let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
            let is_valid = bytes_match && provided_bytes.len() == expected_bytes.len();

            if is_valid {
                Ok(next.run(request).await)
            } else {
                tracing::warn!(
                    event = "auth_failure",
                    reason = "invalid_api_key",
                    "Authentication failed: invalid API key"
                );
                Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
            }
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                "Missing Authorization header"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

// =============================================================================
// CALLER IDENTITY
// =============================================================================

/// Extract the caller identity from proxy-set headers.
///
/// A missing or empty `x-user-id` yields the guest identity. An
/// unparseable role falls back to `community`. Never fails.
#[must_use]
pub fn identity_from_headers(headers: &HeaderMap) -> Identity {
    let id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let Some(id) = id else {
        return Identity::Guest;
    };

    let name = headers
        .get("x-user-name")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(id)
        .to_string();

    let role = headers
        .get("x-user-role")
        .and_then(|v| v.to_str().ok())
        .map_or(SubmitterRole::Community, parse_role);

    Identity::User {
        id: id.to_string(),
        name,
        role,
    }
}

fn parse_role(value: &str) -> SubmitterRole {
    match value.trim().to_ascii_lowercase().as_str() {
        "internal" => SubmitterRole::Internal,
        "external" => SubmitterRole::External,
        "enterprise" => SubmitterRole::Enterprise,
        _ => SubmitterRole::Community,
    }
}

// =============================================================================
// TESTS
// =============================================================================
