//! # Request Storage
//!
//! Storage backends for feature requests and wishlist items.
//!
//! The `RequestStore` trait abstracts over two backends:
//! - `MemStore`: in-memory BTreeMaps (fast, volatile)
//! - `RedbStore`: disk-backed ACID storage using redb
//!
//! Listings are always returned newest first (creation time descending,
//! id descending on ties) so every consumer sees the same order.

pub mod redb_store;

pub use redb_store::RedbStore;

use crate::types::{FeatureRequest, RequestId, WishboardError, WishlistId, WishlistItem};
use std::collections::BTreeMap;

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Common interface over request storage backends.
pub trait RequestStore {
    /// Insert a new request. The store assigns the id; the id on the
    /// passed record is ignored. Returns the assigned id.
    fn insert_request(&mut self, request: FeatureRequest) -> Result<RequestId, WishboardError>;

    /// Fetch a single request.
    fn get_request(&self, id: RequestId) -> Result<Option<FeatureRequest>, WishboardError>;

    /// Overwrite an existing request record.
    fn update_request(&mut self, request: &FeatureRequest) -> Result<(), WishboardError>;

    /// Delete a request. Returns `true` when a record was removed.
    fn delete_request(&mut self, id: RequestId) -> Result<bool, WishboardError>;

    /// All requests, newest first.
    fn list_requests(&self) -> Result<Vec<FeatureRequest>, WishboardError>;

    /// Number of stored requests.
    fn request_count(&self) -> Result<usize, WishboardError>;

    /// Insert a wishlist item. The store assigns the id.
    fn insert_wishlist_item(&mut self, item: WishlistItem) -> Result<WishlistId, WishboardError>;

    /// Fetch a single wishlist item.
    fn get_wishlist_item(&self, id: WishlistId) -> Result<Option<WishlistItem>, WishboardError>;

    /// Delete a wishlist item. Returns `true` when a record was removed.
    fn delete_wishlist_item(&mut self, id: WishlistId) -> Result<bool, WishboardError>;

    /// All wishlist items belonging to one owner, newest first.
    fn list_wishlist_by_owner(&self, owner: &str) -> Result<Vec<WishlistItem>, WishboardError>;

    /// All wishlist items marked public, newest first.
    fn list_public_wishlist(&self) -> Result<Vec<WishlistItem>, WishboardError>;
}

/// Sort records newest first: creation time descending, id descending.
pub(crate) fn sort_newest_first(requests: &mut [FeatureRequest]) {
    requests.sort_by(|a, b| {
        b.created_at_ms
            .cmp(&a.created_at_ms)
            .then(b.id.cmp(&a.id))
    });
}

pub(crate) fn sort_items_newest_first(items: &mut [WishlistItem]) {
    items.sort_by(|a, b| {
        b.created_at_ms
            .cmp(&a.created_at_ms)
            .then(b.id.cmp(&a.id))
    });
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// In-memory request store.
///
/// Uses BTreeMaps for deterministic iteration. All data is lost when the
/// store is dropped; use `RedbStore` for persistence.
#[derive(Debug, Default)]
pub struct MemStore {
    requests: BTreeMap<u64, FeatureRequest>,
    wishlist: BTreeMap<u64, WishlistItem>,
    next_request_id: u64,
    next_wishlist_id: u64,
}

impl MemStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequestStore for MemStore {
    fn insert_request(&mut self, mut request: FeatureRequest) -> Result<RequestId, WishboardError> {
        let id = RequestId(self.next_request_id);
        self.next_request_id = self.next_request_id.saturating_add(1);
        request.id = id;
        self.requests.insert(id.0, request);
        Ok(id)
    }

    fn get_request(&self, id: RequestId) -> Result<Option<FeatureRequest>, WishboardError> {
        Ok(self.requests.get(&id.0).cloned())
    }

    fn update_request(&mut self, request: &FeatureRequest) -> Result<(), WishboardError> {
        if !self.requests.contains_key(&request.id.0) {
            return Err(WishboardError::RequestNotFound(request.id));
        }
        self.requests.insert(request.id.0, request.clone());
        Ok(())
    }

    fn delete_request(&mut self, id: RequestId) -> Result<bool, WishboardError> {
        Ok(self.requests.remove(&id.0).is_some())
    }

    fn list_requests(&self) -> Result<Vec<FeatureRequest>, WishboardError> {
        let mut requests: Vec<_> = self.requests.values().cloned().collect();
        sort_newest_first(&mut requests);
        Ok(requests)
    }

    fn request_count(&self) -> Result<usize, WishboardError> {
        Ok(self.requests.len())
    }

    fn insert_wishlist_item(
        &mut self,
        mut item: WishlistItem,
    ) -> Result<WishlistId, WishboardError> {
        let id = WishlistId(self.next_wishlist_id);
        self.next_wishlist_id = self.next_wishlist_id.saturating_add(1);
        item.id = id;
        self.wishlist.insert(id.0, item);
        Ok(id)
    }

    fn get_wishlist_item(&self, id: WishlistId) -> Result<Option<WishlistItem>, WishboardError> {
        Ok(self.wishlist.get(&id.0).cloned())
    }

    fn delete_wishlist_item(&mut self, id: WishlistId) -> Result<bool, WishboardError> {
        Ok(self.wishlist.remove(&id.0).is_some())
    }

    fn list_wishlist_by_owner(&self, owner: &str) -> Result<Vec<WishlistItem>, WishboardError> {
        let mut items: Vec<_> = self
            .wishlist
            .values()
            .filter(|item| item.owner == owner)
            .cloned()
            .collect();
        sort_items_newest_first(&mut items);
        Ok(items)
    }

    fn list_public_wishlist(&self) -> Result<Vec<WishlistItem>, WishboardError> {
        let mut items: Vec<_> = self
            .wishlist
            .values()
            .filter(|item| item.is_public)
            .cloned()
            .collect();
        sort_items_newest_first(&mut items);
        Ok(items)
    }
}

// =============================================================================
// TESTS
// =============================================================================
