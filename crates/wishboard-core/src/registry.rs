//! # Registry Module
//!
//! The high-level request registry combining validation, workflow and
//! storage.
//!
//! ## Storage Backends
//!
//! Registry supports two storage backends:
//! - `InMemory`: Uses `MemStore` (fast, volatile)
//! - `Persistent`: Uses `RedbStore` for disk-backed ACID storage
//!
//! ## Determinism
//!
//! The registry carries no clock. Every mutating operation takes the
//! current time as a `now_ms` parameter, so the engine stays deterministic
//! and directly testable.

use crate::primitives::{
    MAX_COMMENTS_PER_REQUEST, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, TOP_REQUESTS_COUNT,
};
use crate::store::{MemStore, RedbStore, RequestStore};
use crate::types::{
    Analysis, AnalyticsSummary, BusinessImpact, Comment, EffortEstimate, FeatureRequest, Identity,
    PriorityScore, RequestId, Status, UserPriority, WishboardError, WishlistId, WishlistItem,
};
use crate::workflow;
use std::path::Path;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for a Registry.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemStore::new())
    }
}

// NOTE: StorageBackend does NOT implement Clone.
// RedbStore (database handle) cannot be safely cloned.

impl StorageBackend {
    fn store(&self) -> &dyn RequestStore {
        match self {
            Self::InMemory(store) => store,
            Self::Persistent(store) => store,
        }
    }

    fn store_mut(&mut self) -> &mut dyn RequestStore {
        match self {
            Self::InMemory(store) => store,
            Self::Persistent(store) => store,
        }
    }
}

// =============================================================================
// SUBMISSION DRAFT
// =============================================================================

/// A validated-on-submit draft of a new feature request.
#[derive(Debug, Clone, Default)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub app_id: String,
    pub app_name: String,
    pub user_priority: UserPriority,
    pub tester_email: Option<String>,
    pub tags: Vec<String>,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// The request registry.
///
/// Provides the high-level interface for submitting, reading, voting on
/// and transitioning feature requests, merging enrichment results, and
/// managing wishlist items.
#[derive(Debug, Default)]
pub struct Registry {
    backend: StorageBackend,
}

impl Registry {
    /// Create a new registry with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with persistent redb storage.
    ///
    /// Opens or creates a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, WishboardError> {
        let store = RedbStore::open(path)?;
        Ok(Self {
            backend: StorageBackend::Persistent(store),
        })
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Submit a new feature request.
    ///
    /// Validates the title and description against the innate limits. The
    /// record starts in `Analyzing` when an enrichment backend is
    /// configured, otherwise in `Submitted` (the offline path).
    pub fn submit(
        &mut self,
        draft: NewRequest,
        identity: &Identity,
        enrichment_configured: bool,
        now_ms: u64,
    ) -> Result<FeatureRequest, WishboardError> {
        validate_text(&draft.title, &draft.description)?;

        let status = if enrichment_configured {
            Status::Analyzing
        } else {
            Status::Submitted
        };

        let request = FeatureRequest {
            id: RequestId(0), // assigned by the store
            title: draft.title,
            description: draft.description,
            submitted_by: identity.user_id().to_string(),
            submitter_name: identity.display_name().to_string(),
            submitter_role: identity.role(),
            app_id: draft.app_id,
            app_name: draft.app_name,
            status,
            user_priority: draft.user_priority,
            created_at_ms: now_ms,
            tester_email: draft.tester_email,
            votes: 0,
            tags: draft.tags,
            watchers: Vec::new(),
            comments: Vec::new(),
            analysis: None,
            priority_score: None,
            effort_estimate: None,
            business_impact: None,
            actual_completion_ms: None,
        };

        let id = self.backend.store_mut().insert_request(request)?;
        self.get(id)
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Fetch a request, failing with `RequestNotFound` when absent.
    pub fn get(&self, id: RequestId) -> Result<FeatureRequest, WishboardError> {
        self.backend
            .store()
            .get_request(id)?
            .ok_or(WishboardError::RequestNotFound(id))
    }

    /// All requests, newest first.
    pub fn list(&self) -> Result<Vec<FeatureRequest>, WishboardError> {
        self.backend.store().list_requests()
    }

    /// Number of stored requests.
    pub fn count(&self) -> Result<usize, WishboardError> {
        self.backend.store().request_count()
    }

    // =========================================================================
    // VOTES & COMMENTS
    // =========================================================================

    /// Apply an up or down vote. The count saturates at zero and never
    /// goes negative, regardless of the vote sequence.
    pub fn vote(&mut self, id: RequestId, upvote: bool) -> Result<FeatureRequest, WishboardError> {
        let mut request = self.get(id)?;
        request.votes = if upvote {
            request.votes.saturating_add(1)
        } else {
            request.votes.saturating_sub(1)
        };
        self.backend.store_mut().update_request(&request)?;
        Ok(request)
    }

    /// Append a comment to a request.
    pub fn add_comment(
        &mut self,
        id: RequestId,
        identity: &Identity,
        content: String,
        is_internal: bool,
        now_ms: u64,
    ) -> Result<FeatureRequest, WishboardError> {
        if content.trim().is_empty() {
            return Err(WishboardError::Validation("comment is empty".to_string()));
        }

        let mut request = self.get(id)?;
        if request.comments.len() >= MAX_COMMENTS_PER_REQUEST {
            return Err(WishboardError::Validation(
                "comment limit reached".to_string(),
            ));
        }

        let comment_id = request.comments.last().map_or(0, |c| c.id.saturating_add(1));
        request.comments.push(Comment {
            id: comment_id,
            user_id: identity.user_id().to_string(),
            user_name: identity.display_name().to_string(),
            user_role: identity.role(),
            content,
            created_at_ms: now_ms,
            is_internal,
        });
        self.backend.store_mut().update_request(&request)?;
        Ok(request)
    }

    // =========================================================================
    // WORKFLOW
    // =========================================================================

    /// Transition a request to a new status.
    ///
    /// Only strictly-forward transitions are accepted; terminal states
    /// admit no exits. Transitioning to `Completed` records the actual
    /// completion time.
    pub fn transition(
        &mut self,
        id: RequestId,
        to: Status,
        now_ms: u64,
    ) -> Result<FeatureRequest, WishboardError> {
        let mut request = self.get(id)?;
        workflow::check_transition(request.status, to)?;

        request.status = to;
        if to == Status::Completed {
            request.actual_completion_ms = Some(now_ms);
        }
        self.backend.store_mut().update_request(&request)?;
        Ok(request)
    }

    /// Delete a request outright.
    pub fn delete(&mut self, id: RequestId) -> Result<(), WishboardError> {
        if self.backend.store_mut().delete_request(id)? {
            Ok(())
        } else {
            Err(WishboardError::RequestNotFound(id))
        }
    }

    // =========================================================================
    // ENRICHMENT MERGES
    // =========================================================================
    //
    // Each setter overwrites exactly one field group (last-write-wins) and
    // leaves the rest of the record untouched, so partial enrichment
    // progress survives later failures.

    /// Attach or replace the stage 1 analysis.
    pub fn set_analysis(
        &mut self,
        id: RequestId,
        analysis: Analysis,
    ) -> Result<FeatureRequest, WishboardError> {
        let mut request = self.get(id)?;
        request.analysis = Some(analysis);
        self.backend.store_mut().update_request(&request)?;
        Ok(request)
    }

    /// Attach or replace the stage 2 priority score.
    pub fn set_priority_score(
        &mut self,
        id: RequestId,
        score: PriorityScore,
    ) -> Result<FeatureRequest, WishboardError> {
        let mut request = self.get(id)?;
        request.priority_score = Some(score);
        self.backend.store_mut().update_request(&request)?;
        Ok(request)
    }

    /// Attach or replace the stage 3 effort estimate.
    pub fn set_effort_estimate(
        &mut self,
        id: RequestId,
        effort: EffortEstimate,
    ) -> Result<FeatureRequest, WishboardError> {
        let mut request = self.get(id)?;
        request.effort_estimate = Some(effort);
        self.backend.store_mut().update_request(&request)?;
        Ok(request)
    }

    /// Attach or replace the stage 4 business impact.
    pub fn set_business_impact(
        &mut self,
        id: RequestId,
        impact: BusinessImpact,
    ) -> Result<FeatureRequest, WishboardError> {
        let mut request = self.get(id)?;
        request.business_impact = Some(impact);
        self.backend.store_mut().update_request(&request)?;
        Ok(request)
    }

    // =========================================================================
    // ANALYTICS
    // =========================================================================

    /// Aggregate view over all stored requests.
    pub fn analytics(&self) -> Result<AnalyticsSummary, WishboardError> {
        let requests = self.list()?;

        let mut summary = AnalyticsSummary {
            total_requests: requests.len(),
            ..AnalyticsSummary::default()
        };

        let mut scored: Vec<(RequestId, f64)> = Vec::new();
        for request in &requests {
            *summary.by_status.entry(request.status).or_insert(0) += 1;
            if let Some(analysis) = &request.analysis {
                *summary.by_category.entry(analysis.category).or_insert(0) += 1;
            }
            if let Some(score) = &request.priority_score {
                scored.push((request.id, score.overall));
            }
        }

        if !scored.is_empty() {
            let sum: f64 = scored.iter().map(|(_, s)| s).sum();
            summary.average_priority = sum / scored.len() as f64;
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        summary.top_requests = scored
            .into_iter()
            .take(TOP_REQUESTS_COUNT)
            .map(|(id, _)| id)
            .collect();

        Ok(summary)
    }

    // =========================================================================
    // WISHLIST
    // =========================================================================

    /// Add a wishlist item for an owner.
    pub fn add_wishlist_item(
        &mut self,
        owner: &str,
        product_name: String,
        description: String,
        image_url: Option<String>,
        original_url: Option<String>,
        is_public: bool,
        now_ms: u64,
    ) -> Result<WishlistItem, WishboardError> {
        if product_name.trim().is_empty() {
            return Err(WishboardError::Validation(
                "product name is empty".to_string(),
            ));
        }
        if product_name.len() > MAX_TITLE_LENGTH {
            return Err(WishboardError::Validation(format!(
                "product name exceeds {MAX_TITLE_LENGTH} bytes"
            )));
        }

        let item = WishlistItem {
            id: WishlistId(0), // assigned by the store
            owner: owner.to_string(),
            product_name,
            description,
            image_url,
            original_url,
            is_public,
            created_at_ms: now_ms,
        };

        let id = self.backend.store_mut().insert_wishlist_item(item)?;
        self.backend
            .store()
            .get_wishlist_item(id)?
            .ok_or(WishboardError::WishlistItemNotFound(id))
    }

    /// Remove a wishlist item.
    pub fn remove_wishlist_item(&mut self, id: WishlistId) -> Result<(), WishboardError> {
        if self.backend.store_mut().delete_wishlist_item(id)? {
            Ok(())
        } else {
            Err(WishboardError::WishlistItemNotFound(id))
        }
    }

    /// All wishlist items for one owner, newest first.
    pub fn wishlist_for_owner(&self, owner: &str) -> Result<Vec<WishlistItem>, WishboardError> {
        self.backend.store().list_wishlist_by_owner(owner)
    }

    /// All public wishlist items, newest first.
    pub fn public_wishlist(&self) -> Result<Vec<WishlistItem>, WishboardError> {
        self.backend.store().list_public_wishlist()
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

fn validate_text(title: &str, description: &str) -> Result<(), WishboardError> {
    if title.trim().is_empty() {
        return Err(WishboardError::Validation("title is empty".to_string()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(WishboardError::Validation(format!(
            "title exceeds {MAX_TITLE_LENGTH} bytes"
        )));
    }
    if description.trim().is_empty() {
        return Err(WishboardError::Validation(
            "description is empty".to_string(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(WishboardError::Validation(format!(
            "description exceeds {MAX_DESCRIPTION_LENGTH} bytes"
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
