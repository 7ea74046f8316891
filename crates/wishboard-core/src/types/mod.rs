//! # Core Type Definitions
//!
//! This module contains all core types for the Wishboard request engine:
//! - Record identifiers (`RequestId`, `WishlistId`)
//! - The feature request record and its enrichment sub-records
//!   (`Analysis`, `PriorityScore`, `EffortEstimate`, `BusinessImpact`)
//! - Workflow and classification enums (`Status`, `UserPriority`,
//!   `SubmitterRole`, `Category`, `Sentiment`)
//! - Caller identity (`Identity`)
//! - Error types (`WishboardError`)
//!
//! ## Enrichment Guarantees
//!
//! Every enrichment sub-record on a `FeatureRequest` is optional. A record
//! with zero, partial, or full enrichment is equally valid; consumers must
//! never assume the sub-records are populated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

/// Unique identifier for a feature request.
/// Dense u64 assigned by the store at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

/// Unique identifier for a wishlist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WishlistId(pub u64);

// =============================================================================
// WORKFLOW & CLASSIFICATION ENUMS
// =============================================================================

/// Lifecycle status of a feature request.
///
/// The workflow is strictly forward; see the `workflow` module for the
/// transition rules. `Rejected` and `Completed` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Newly created, not yet enriched (offline path).
    #[default]
    Submitted,
    /// Enrichment chain is in flight.
    Analyzing,
    /// First enrichment stage completed.
    Reviewed,
    /// Accepted by an operator.
    Approved,
    /// Declined by an operator. Terminal.
    Rejected,
    /// Work has started.
    InProgress,
    /// Work is done. Terminal.
    Completed,
}

/// Priority label chosen by the submitter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum UserPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl UserPriority {
    /// Base score used when priority scoring falls back to the submitter's
    /// own label: low/medium/high/critical map to 3/5/7/9.
    #[must_use]
    pub const fn base_score(self) -> f64 {
        match self {
            Self::Low => 3.0,
            Self::Medium => 5.0,
            Self::High => 7.0,
            Self::Critical => 9.0,
        }
    }
}

/// Relationship of the submitter to the product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitterRole {
    Internal,
    External,
    Enterprise,
    #[default]
    Community,
}

/// Request category assigned during analysis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    Enhancement,
    BugFix,
    NewFeature,
    UiUx,
    Performance,
    Integration,
}

/// Submitter sentiment detected during analysis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Sentiment {
    Frustrated,
    #[default]
    Neutral,
    Excited,
}

// =============================================================================
// ENRICHMENT SUB-RECORDS
// =============================================================================

/// Stage 1 enrichment: categorization and text analysis.
///
/// Produced exactly once per request; never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub category: Category,
    /// Implementation complexity, 1 to 5.
    pub complexity: u8,
    /// How clearly the request is stated, 1 to 10.
    pub clarity: u8,
    pub sentiment: Sentiment,
    pub keywords: Vec<String>,
    /// Model confidence, 0.0 to 1.0.
    pub confidence: f64,
    /// Ids of existing requests flagged as likely duplicates.
    pub similar_requests: Vec<RequestId>,
    pub suggestions: Vec<String>,
    pub analyzed_at_ms: u64,
}

/// Stage 2 enrichment: weighted priority dimensions.
///
/// All dimensions are clamped to [1.0, 10.0] at construction; see the
/// `scoring` module for the overall formula and fallback values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    pub overall: f64,
    pub business_impact: f64,
    pub user_demand: f64,
    pub strategic_alignment: f64,
    pub implementation_feasibility: f64,
    pub calculated_at_ms: u64,
}

/// Stage 3 enrichment: effort estimate in hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffortEstimate {
    pub total_hours: u32,
    pub frontend_hours: u32,
    pub backend_hours: u32,
    pub design_hours: u32,
    pub qa_hours: u32,
    pub risk_factors: Vec<String>,
    pub dependencies: Vec<String>,
    pub team_members: Vec<String>,
    pub estimated_at_ms: u64,
}

/// Stage 4 enrichment: business impact dimensions, each 1 to 10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessImpact {
    pub retention: f64,
    pub revenue: f64,
    pub competitive_advantage: f64,
    pub ux_improvement: f64,
    pub operational_efficiency: f64,
    pub assessed_at_ms: u64,
}

// =============================================================================
// COMMENT
// =============================================================================

/// A discussion comment attached to a feature request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub user_id: String,
    pub user_name: String,
    pub user_role: SubmitterRole,
    pub content: String,
    pub created_at_ms: u64,
    /// Internal comments are visible to operators only.
    pub is_internal: bool,
}

// =============================================================================
// FEATURE REQUEST
// =============================================================================

/// A feature request record.
///
/// The four enrichment sub-records are populated independently by the
/// enrichment chain; each may be absent at any point in the lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRequest {
    pub id: RequestId,
    pub title: String,
    pub description: String,
    pub submitted_by: String,
    pub submitter_name: String,
    pub submitter_role: SubmitterRole,
    pub app_id: String,
    pub app_name: String,
    pub status: Status,
    pub user_priority: UserPriority,
    pub created_at_ms: u64,
    #[serde(default)]
    pub tester_email: Option<String>,
    /// Vote count. Never goes below zero; see `Registry::vote`.
    pub votes: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub watchers: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub analysis: Option<Analysis>,
    #[serde(default)]
    pub priority_score: Option<PriorityScore>,
    #[serde(default)]
    pub effort_estimate: Option<EffortEstimate>,
    #[serde(default)]
    pub business_impact: Option<BusinessImpact>,
    /// Set when the request transitions to `Completed`.
    #[serde(default)]
    pub actual_completion_ms: Option<u64>,
}

impl FeatureRequest {
    /// True once all four enrichment sub-records are present.
    #[must_use]
    pub fn is_fully_enriched(&self) -> bool {
        self.analysis.is_some()
            && self.priority_score.is_some()
            && self.effort_estimate.is_some()
            && self.business_impact.is_some()
    }
}

// =============================================================================
// WISHLIST ITEM
// =============================================================================

/// A saved product in a user's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: WishlistId,
    pub owner: String,
    pub product_name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    pub is_public: bool,
    pub created_at_ms: u64,
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// Aggregate view over all stored requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalyticsSummary {
    pub total_requests: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_status: BTreeMap<Status, usize>,
    /// Mean overall priority across requests that have a priority score.
    /// Zero when no request has been scored.
    pub average_priority: f64,
    /// Up to five request ids, highest overall priority first.
    pub top_requests: Vec<RequestId>,
}

// =============================================================================
// IDENTITY
// =============================================================================

/// The caller identity attached to a mutating operation.
///
/// Derived deterministically from request headers; absence of identity
/// headers yields `Guest`. Identity resolution never fails and never blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Identity {
    User {
        id: String,
        name: String,
        role: SubmitterRole,
    },
    #[default]
    Guest,
}

impl Identity {
    /// The user id, or "guest" for anonymous callers.
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::User { id, .. } => id,
            Self::Guest => "guest",
        }
    }

    /// The display name, or "Guest" for anonymous callers.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::User { name, .. } => name,
            Self::Guest => "Guest",
        }
    }

    /// The submitter role. Guests count as community members.
    #[must_use]
    pub fn role(&self) -> SubmitterRole {
        match self {
            Self::User { role, .. } => *role,
            Self::Guest => SubmitterRole::Community,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Wishboard engine.
///
/// - No silent failures
/// - Use `Result<T, WishboardError>` for fallible operations
/// - The engine should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum WishboardError {
    /// Input failed validation (empty or oversized fields).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested feature request does not exist.
    #[error("Request not found: {0:?}")]
    RequestNotFound(RequestId),

    /// The requested wishlist item does not exist.
    #[error("Wishlist item not found: {0:?}")]
    WishlistItemNotFound(WishlistId),

    /// The requested status change violates the workflow.
    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition { from: Status, to: Status },

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&Status::InProgress).expect("serialize");
        assert_eq!(json, "\"in-progress\"");

        let back: Status = serde_json::from_str("\"in-progress\"").expect("deserialize");
        assert_eq!(back, Status::InProgress);
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::BugFix).expect("serialize");
        assert_eq!(json, "\"bug-fix\"");
        let json = serde_json::to_string(&Category::UiUx).expect("serialize");
        assert_eq!(json, "\"ui-ux\"");
        let json = serde_json::to_string(&Category::NewFeature).expect("serialize");
        assert_eq!(json, "\"new-feature\"");
    }

    #[test]
    fn user_priority_base_scores() {
        assert_eq!(UserPriority::Low.base_score(), 3.0);
        assert_eq!(UserPriority::Medium.base_score(), 5.0);
        assert_eq!(UserPriority::High.base_score(), 7.0);
        assert_eq!(UserPriority::Critical.base_score(), 9.0);
    }

    #[test]
    fn guest_identity_defaults() {
        let guest = Identity::Guest;
        assert_eq!(guest.user_id(), "guest");
        assert_eq!(guest.display_name(), "Guest");
        assert_eq!(guest.role(), SubmitterRole::Community);
    }

    #[test]
    fn user_identity_fields() {
        let user = Identity::User {
            id: "u-1".to_string(),
            name: "Alice".to_string(),
            role: SubmitterRole::Enterprise,
        };
        assert_eq!(user.user_id(), "u-1");
        assert_eq!(user.display_name(), "Alice");
        assert_eq!(user.role(), SubmitterRole::Enterprise);
    }

    #[test]
    fn request_without_enrichment_roundtrips() {
        let request = FeatureRequest {
            id: RequestId(1),
            title: "Add dark mode".to_string(),
            description: "The app is too bright at night".to_string(),
            submitted_by: "u-1".to_string(),
            submitter_name: "Alice".to_string(),
            submitter_role: SubmitterRole::External,
            app_id: "app-1".to_string(),
            app_name: "Demo".to_string(),
            status: Status::Submitted,
            user_priority: UserPriority::Medium,
            created_at_ms: 1_700_000_000_000,
            tester_email: None,
            votes: 0,
            tags: Vec::new(),
            watchers: Vec::new(),
            comments: Vec::new(),
            analysis: None,
            priority_score: None,
            effort_estimate: None,
            business_impact: None,
            actual_completion_ms: None,
        };

        let json = serde_json::to_string(&request).expect("serialize");
        let back: FeatureRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, request);
        assert!(!back.is_fully_enriched());
    }
}
