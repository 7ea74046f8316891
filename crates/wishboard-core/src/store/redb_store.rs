//! # redb-backed Request Storage
//!
//! A disk-backed request store using the redb embedded database:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Records are serialized with postcard. Wishlist items are keyed by
//! `(owner_hash, id)` so per-owner listings are a single range query; a
//! secondary index maps item ids back to their owner hash.

use crate::store::{RequestStore, sort_items_newest_first, sort_newest_first};
use crate::types::{FeatureRequest, RequestId, WishboardError, WishlistId, WishlistItem};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Table for requests: RequestId(u64) -> serialized FeatureRequest bytes
const REQUESTS: TableDefinition<u64, &[u8]> = TableDefinition::new("requests");

/// Table for wishlist items: (owner_hash, item_id) -> serialized bytes
/// The owner hash prefix enables range queries per owner.
const WISHLIST: TableDefinition<(u64, u64), &[u8]> = TableDefinition::new("wishlist");

/// Table mapping wishlist item id -> owner_hash (for lookup by id).
const WISHLIST_OWNERS: TableDefinition<u64, u64> = TableDefinition::new("wishlist_owners");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

fn owner_hash(owner: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    owner.hash(&mut hasher);
    hasher.finish()
}

/// A disk-backed request store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
    /// Next available request id.
    next_request_id: u64,
    /// Next available wishlist item id.
    next_wishlist_id: u64,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("next_request_id", &self.next_request_id)
            .field("next_wishlist_id", &self.next_wishlist_id)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a request database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WishboardError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| WishboardError::IoError(e.to_string()))?;

        // Initialize tables if they don't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(REQUESTS)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(WISHLIST)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(WISHLIST_OWNERS)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(METADATA)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
        }

        // Load metadata
        let read_txn = db
            .begin_read()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let meta_table = read_txn
            .open_table(METADATA)
            .map_err(|e| WishboardError::IoError(e.to_string()))?;

        let next_request_id = meta_table
            .get("next_request_id")
            .map_err(|e| WishboardError::IoError(e.to_string()))?
            .map(|v| v.value())
            .unwrap_or(0);
        let next_wishlist_id = meta_table
            .get("next_wishlist_id")
            .map_err(|e| WishboardError::IoError(e.to_string()))?
            .map(|v| v.value())
            .unwrap_or(0);

        Ok(Self {
            db,
            next_request_id,
            next_wishlist_id,
        })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), WishboardError> {
        self.db
            .compact()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        Ok(())
    }
}

// =============================================================================
// REQUESTSTORE TRAIT IMPLEMENTATION
// =============================================================================

impl RequestStore for RedbStore {
    fn insert_request(&mut self, mut request: FeatureRequest) -> Result<RequestId, WishboardError> {
        let id = RequestId(self.next_request_id);
        let next = self.next_request_id.saturating_add(1);
        request.id = id;

        let bytes = postcard::to_allocvec(&request)
            .map_err(|e| WishboardError::SerializationError(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        {
            let mut requests_table = write_txn
                .open_table(REQUESTS)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            requests_table
                .insert(id.0, bytes.as_slice())
                .map_err(|e| WishboardError::IoError(e.to_string()))?;

            let mut meta_table = write_txn
                .open_table(METADATA)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            meta_table
                .insert("next_request_id", next)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;

        // Update in-memory state only after successful commit.
        self.next_request_id = next;
        Ok(id)
    }

    fn get_request(&self, id: RequestId) -> Result<Option<FeatureRequest>, WishboardError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let requests_table = read_txn
            .open_table(REQUESTS)
            .map_err(|e| WishboardError::IoError(e.to_string()))?;

        match requests_table
            .get(id.0)
            .map_err(|e| WishboardError::IoError(e.to_string()))?
        {
            Some(data) => {
                let request: FeatureRequest = postcard::from_bytes(data.value())
                    .map_err(|e| WishboardError::DeserializationError(e.to_string()))?;
                Ok(Some(request))
            }
            None => Ok(None),
        }
    }

    fn update_request(&mut self, request: &FeatureRequest) -> Result<(), WishboardError> {
        let bytes = postcard::to_allocvec(request)
            .map_err(|e| WishboardError::SerializationError(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        {
            let mut requests_table = write_txn
                .open_table(REQUESTS)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;

            let exists = requests_table
                .get(request.id.0)
                .map_err(|e| WishboardError::IoError(e.to_string()))?
                .is_some();
            if !exists {
                return Err(WishboardError::RequestNotFound(request.id));
            }

            requests_table
                .insert(request.id.0, bytes.as_slice())
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        Ok(())
    }

    fn delete_request(&mut self, id: RequestId) -> Result<bool, WishboardError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let removed = {
            let mut requests_table = write_txn
                .open_table(REQUESTS)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            requests_table
                .remove(id.0)
                .map_err(|e| WishboardError::IoError(e.to_string()))?
                .is_some()
        };
        write_txn
            .commit()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        Ok(removed)
    }

    fn list_requests(&self) -> Result<Vec<FeatureRequest>, WishboardError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let requests_table = read_txn
            .open_table(REQUESTS)
            .map_err(|e| WishboardError::IoError(e.to_string()))?;

        let mut requests = Vec::new();
        for entry in requests_table
            .iter()
            .map_err(|e| WishboardError::IoError(e.to_string()))?
        {
            let (_, data) = entry.map_err(|e| WishboardError::IoError(e.to_string()))?;
            let request: FeatureRequest = postcard::from_bytes(data.value())
                .map_err(|e| WishboardError::DeserializationError(e.to_string()))?;
            requests.push(request);
        }
        sort_newest_first(&mut requests);
        Ok(requests)
    }

    fn request_count(&self) -> Result<usize, WishboardError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let requests_table = read_txn
            .open_table(REQUESTS)
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let count = requests_table
            .len()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        Ok(count as usize)
    }

    fn insert_wishlist_item(
        &mut self,
        mut item: WishlistItem,
    ) -> Result<WishlistId, WishboardError> {
        let id = WishlistId(self.next_wishlist_id);
        let next = self.next_wishlist_id.saturating_add(1);
        item.id = id;
        let hash = owner_hash(&item.owner);

        let bytes = postcard::to_allocvec(&item)
            .map_err(|e| WishboardError::SerializationError(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        {
            let mut wishlist_table = write_txn
                .open_table(WISHLIST)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            wishlist_table
                .insert((hash, id.0), bytes.as_slice())
                .map_err(|e| WishboardError::IoError(e.to_string()))?;

            let mut owners_table = write_txn
                .open_table(WISHLIST_OWNERS)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            owners_table
                .insert(id.0, hash)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;

            let mut meta_table = write_txn
                .open_table(METADATA)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            meta_table
                .insert("next_wishlist_id", next)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;

        self.next_wishlist_id = next;
        Ok(id)
    }

    fn get_wishlist_item(&self, id: WishlistId) -> Result<Option<WishlistItem>, WishboardError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let owners_table = read_txn
            .open_table(WISHLIST_OWNERS)
            .map_err(|e| WishboardError::IoError(e.to_string()))?;

        let Some(hash) = owners_table
            .get(id.0)
            .map_err(|e| WishboardError::IoError(e.to_string()))?
            .map(|v| v.value())
        else {
            return Ok(None);
        };

        let wishlist_table = read_txn
            .open_table(WISHLIST)
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        match wishlist_table
            .get((hash, id.0))
            .map_err(|e| WishboardError::IoError(e.to_string()))?
        {
            Some(data) => {
                let item: WishlistItem = postcard::from_bytes(data.value())
                    .map_err(|e| WishboardError::DeserializationError(e.to_string()))?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn delete_wishlist_item(&mut self, id: WishlistId) -> Result<bool, WishboardError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let removed = {
            let mut owners_table = write_txn
                .open_table(WISHLIST_OWNERS)
                .map_err(|e| WishboardError::IoError(e.to_string()))?;
            let hash = owners_table
                .remove(id.0)
                .map_err(|e| WishboardError::IoError(e.to_string()))?
                .map(|v| v.value());

            match hash {
                Some(hash) => {
                    let mut wishlist_table = write_txn
                        .open_table(WISHLIST)
                        .map_err(|e| WishboardError::IoError(e.to_string()))?;
                    wishlist_table
                        .remove((hash, id.0))
                        .map_err(|e| WishboardError::IoError(e.to_string()))?
                        .is_some()
                }
                None => false,
            }
        };
        write_txn
            .commit()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        Ok(removed)
    }

    fn list_wishlist_by_owner(&self, owner: &str) -> Result<Vec<WishlistItem>, WishboardError> {
        let hash = owner_hash(owner);
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let wishlist_table = read_txn
            .open_table(WISHLIST)
            .map_err(|e| WishboardError::IoError(e.to_string()))?;

        let mut items = Vec::new();
        for entry in wishlist_table
            .range((hash, 0u64)..=(hash, u64::MAX))
            .map_err(|e| WishboardError::IoError(e.to_string()))?
        {
            let (_, data) = entry.map_err(|e| WishboardError::IoError(e.to_string()))?;
            let item: WishlistItem = postcard::from_bytes(data.value())
                .map_err(|e| WishboardError::DeserializationError(e.to_string()))?;
            // Hash collisions are possible; filter on the stored owner.
            if item.owner == owner {
                items.push(item);
            }
        }
        sort_items_newest_first(&mut items);
        Ok(items)
    }

    fn list_public_wishlist(&self) -> Result<Vec<WishlistItem>, WishboardError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| WishboardError::IoError(e.to_string()))?;
        let wishlist_table = read_txn
            .open_table(WISHLIST)
            .map_err(|e| WishboardError::IoError(e.to_string()))?;

        let mut items = Vec::new();
        for entry in wishlist_table
            .iter()
            .map_err(|e| WishboardError::IoError(e.to_string()))?
        {
            let (_, data) = entry.map_err(|e| WishboardError::IoError(e.to_string()))?;
            let item: WishlistItem = postcard::from_bytes(data.value())
                .map_err(|e| WishboardError::DeserializationError(e.to_string()))?;
            if item.is_public {
                items.push(item);
            }
        }
        sort_items_newest_first(&mut items);
        Ok(items)
    }
}
