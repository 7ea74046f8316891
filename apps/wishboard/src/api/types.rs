//! # API Request/Response Types
//!
//! JSON structures for the HTTP API.
//!
//! Request bodies are validated at the boundary before they reach the
//! registry, so oversized payloads are rejected without touching storage.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use wishboard_core::{
    AnalyticsSummary, FeatureRequest, NewRequest, UserPriority, WishboardError, WishlistItem,
    primitives::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH},
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Map a core error onto an HTTP status code.
#[must_use]
pub fn error_status(err: &WishboardError) -> StatusCode {
    match err {
        WishboardError::Validation(_) => StatusCode::BAD_REQUEST,
        WishboardError::RequestNotFound(_) | WishboardError::WishlistItemNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        WishboardError::InvalidTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether an enrichment backend is configured.
    pub enrichment: bool,
}

impl HealthResponse {
    #[must_use]
    pub fn new(enrichment: bool) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enrichment,
        }
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Feature request submission body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub title: String,
    pub description: String,
    pub app_id: String,
    pub app_name: String,
    #[serde(default)]
    pub priority: UserPriority,
    #[serde(default)]
    pub tester_email: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SubmitRequest {
    /// Convert to a draft, validating fields.
    ///
    /// Rejects empty or oversized titles and descriptions at the API
    /// boundary, before data reaches the registry.
    pub fn to_draft(&self) -> Result<NewRequest, WishboardError> {
        if self.title.trim().is_empty() {
            return Err(WishboardError::Validation("title is empty".to_string()));
        }
        if self.title.len() > MAX_TITLE_LENGTH {
            return Err(WishboardError::Validation(format!(
                "title length {} exceeds maximum {} bytes",
                self.title.len(),
                MAX_TITLE_LENGTH
            )));
        }
        if self.description.trim().is_empty() {
            return Err(WishboardError::Validation(
                "description is empty".to_string(),
            ));
        }
        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(WishboardError::Validation(format!(
                "description length {} exceeds maximum {} bytes",
                self.description.len(),
                MAX_DESCRIPTION_LENGTH
            )));
        }

        Ok(NewRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            app_id: self.app_id.clone(),
            app_name: self.app_name.clone(),
            user_priority: self.priority,
            tester_email: self.tester_email.clone(),
            tags: self.tags.clone(),
        })
    }
}

// =============================================================================
// REQUEST RESPONSES
// =============================================================================

/// Response carrying a single feature request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestResponse {
    pub success: bool,
    pub request: Option<FeatureRequest>,
    pub error: Option<String>,
}

impl RequestResponse {
    #[must_use]
    pub fn success(request: FeatureRequest) -> Self {
        Self {
            success: true,
            request: Some(request),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            request: None,
            error: Some(msg.into()),
        }
    }
}

/// Response carrying the full request listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub success: bool,
    pub requests: Vec<FeatureRequest>,
    pub count: usize,
    pub error: Option<String>,
}

impl ListResponse {
    #[must_use]
    pub fn success(requests: Vec<FeatureRequest>) -> Self {
        Self {
            success: true,
            count: requests.len(),
            requests,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            requests: Vec::new(),
            count: 0,
            error: Some(msg.into()),
        }
    }
}

/// Bare acknowledgement for deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl AckResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// MUTATION BODIES
// =============================================================================

/// Vote body. `upvote: false` removes a vote; the count never goes
/// negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    #[serde(default = "default_true")]
    pub upvote: bool,
}

fn default_true() -> bool {
    true
}

/// Status transition body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: wishboard_core::Status,
}

/// Comment body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
    /// Internal comments are visible to operators only.
    #[serde(default)]
    pub internal: bool,
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// Analytics summary response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub summary: Option<AnalyticsSummary>,
    pub error: Option<String>,
}

impl AnalyticsResponse {
    #[must_use]
    pub fn success(summary: AnalyticsSummary) -> Self {
        Self {
            success: true,
            summary: Some(summary),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            summary: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// WISHLIST
// =============================================================================

/// Wishlist item creation body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistCreateRequest {
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Response carrying a single wishlist item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItemResponse {
    pub success: bool,
    pub item: Option<WishlistItem>,
    pub error: Option<String>,
}

impl WishlistItemResponse {
    #[must_use]
    pub fn success(item: WishlistItem) -> Self {
        Self {
            success: true,
            item: Some(item),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            item: None,
            error: Some(msg.into()),
        }
    }
}

/// Response carrying a wishlist listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistListResponse {
    pub success: bool,
    pub items: Vec<WishlistItem>,
    pub count: usize,
    pub error: Option<String>,
}

impl WishlistListResponse {
    #[must_use]
    pub fn success(items: Vec<WishlistItem>) -> Self {
        Self {
            success: true,
            count: items.len(),
            items,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            items: Vec::new(),
            count: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
