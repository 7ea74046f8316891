//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Wishboard engine.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Validation limits protect the store from malformed or hostile input;
//! the scoring and dedup constants define the documented enrichment
//! arithmetic.

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for request titles.
///
/// Titles longer than this are rejected at submission.
pub const MAX_TITLE_LENGTH: usize = 256;

/// Maximum length for request descriptions.
///
/// Descriptions longer than this (64KB) are rejected at submission.
/// This prevents memory exhaustion from malicious or malformed input.
pub const MAX_DESCRIPTION_LENGTH: usize = 65536;

/// Maximum number of comments kept on a single request.
pub const MAX_COMMENTS_PER_REQUEST: usize = 1000;

// =============================================================================
// DUPLICATE DETECTION
// =============================================================================

/// Two requests are flagged as duplicates when their significant-token
/// overlap ratio strictly exceeds this threshold.
pub const DUPLICATE_THRESHOLD: f64 = 0.6;

/// Tokens must be strictly longer than this to count as significant.
pub const MIN_KEYWORD_LENGTH: usize = 3;

/// Common words excluded from keyword extraction.
pub const STOPWORDS: &[&str] = &[
    "this", "that", "with", "have", "will", "from", "they", "been", "were", "said", "each",
    "which", "their", "time", "would", "there", "could", "other",
];

// =============================================================================
// PRIORITY SCORING WEIGHTS
// =============================================================================

/// Weight of the business impact dimension in the overall score.
pub const WEIGHT_BUSINESS_IMPACT: f64 = 0.4;

/// Weight of the (demand-factor adjusted) user demand dimension.
pub const WEIGHT_USER_DEMAND: f64 = 0.25;

/// Weight of the strategic alignment dimension.
pub const WEIGHT_STRATEGIC_ALIGNMENT: f64 = 0.2;

/// Weight of the implementation feasibility dimension.
pub const WEIGHT_FEASIBILITY: f64 = 0.15;

// =============================================================================
// SCORE RANGES
// =============================================================================

/// Lower bound for every priority and impact dimension.
pub const SCORE_MIN: f64 = 1.0;

/// Upper bound for every priority and impact dimension.
pub const SCORE_MAX: f64 = 10.0;

// =============================================================================
// FALLBACK CONSTANTS
// =============================================================================

/// Analysis confidence reported when the remote model is unavailable.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Analysis complexity reported when the remote model is unavailable.
pub const FALLBACK_COMPLEXITY: u8 = 3;

/// Analysis clarity reported when the remote model is unavailable.
pub const FALLBACK_CLARITY: u8 = 5;

/// Hours of effort assumed per point of complexity in the effort fallback.
pub const HOURS_PER_COMPLEXITY_POINT: u32 = 8;

/// Business impact assigned to every dimension in the impact fallback.
pub const FALLBACK_IMPACT: f64 = 5.0;

/// Number of request ids reported in the analytics top list.
pub const TOP_REQUESTS_COUNT: usize = 5;
