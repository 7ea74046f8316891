//! # wishboard-core
//!
//! The feature-request engine for Wishboard - THE LOGIC.
//!
//! This crate implements the synchronous core of the tracker: request
//! records and their enrichment sub-records, the strictly-forward status
//! workflow, keyword-based duplicate detection, priority scoring with
//! deterministic fallbacks, strict decoding of model replies, and the
//! storage layer.
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Has NO async, NO network dependencies (pure Rust)
//! - Carries no clock: callers supply timestamps explicitly
//! - Never panics; all errors are recoverable `WishboardError`s
//!
//! Network orchestration (the HTTP API, the remote model client and the
//! enrichment chain) lives in the `wishboard` application crate.

// =============================================================================
// MODULES
// =============================================================================

pub mod decode;
pub mod keywords;
pub mod primitives;
pub mod registry;
pub mod scoring;
pub mod store;
pub mod types;
pub mod workflow;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Analysis, AnalyticsSummary, BusinessImpact, Category, Comment, EffortEstimate, FeatureRequest,
    Identity, PriorityScore, RequestId, Sentiment, Status, SubmitterRole, UserPriority,
    WishboardError, WishlistId, WishlistItem,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use decode::{
    decode_analysis, decode_effort, decode_impact, decode_priority, strip_code_fences,
};
pub use keywords::{detect_duplicates, extract_keywords, overlap_ratio};
pub use registry::{NewRequest, Registry, StorageBackend};
pub use scoring::{
    adjust_demand, clamp_score, fallback_analysis, fallback_effort, fallback_impact,
    fallback_priority, overall_score,
};
pub use store::{MemStore, RedbStore, RequestStore};
pub use workflow::{can_transition, check_transition, is_terminal};
