//! # Enrichment Scoring
//!
//! Priority arithmetic and the deterministic fallback constructors.
//!
//! Every enrichment stage has a documented degraded result that is used
//! whenever the remote model fails. The fallbacks are total functions of
//! the request itself, so a full outage still yields a fully-populated,
//! predictable record.
//!
//! The overall priority is always computed locally from the four
//! dimensions; a remote "overall" value is never trusted.

use crate::keywords::extract_keywords;
use crate::primitives::{
    FALLBACK_CLARITY, FALLBACK_COMPLEXITY, FALLBACK_CONFIDENCE, FALLBACK_IMPACT,
    HOURS_PER_COMPLEXITY_POINT, SCORE_MAX, SCORE_MIN, WEIGHT_BUSINESS_IMPACT, WEIGHT_FEASIBILITY,
    WEIGHT_STRATEGIC_ALIGNMENT, WEIGHT_USER_DEMAND,
};
use crate::types::{
    Analysis, BusinessImpact, Category, EffortEstimate, PriorityScore, Sentiment, UserPriority,
};

/// Suggestions attached to a fallback analysis.
pub const FALLBACK_SUGGESTIONS: [&str; 2] = [
    "Consider providing more specific details about the expected behavior",
    "Include use cases or examples to clarify the request",
];

// =============================================================================
// SCORE ARITHMETIC
// =============================================================================

/// Clamp a dimension to the valid score range [1.0, 10.0].
///
/// Non-finite values collapse to the lower bound.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(SCORE_MIN, SCORE_MAX)
    } else {
        SCORE_MIN
    }
}

/// Scale user demand by the configured demand factor, capped at 10.
#[must_use]
pub fn adjust_demand(demand: f64, factor: f64) -> f64 {
    (demand * factor).min(SCORE_MAX)
}

/// The weighted overall priority.
///
/// `overall = 0.4 * business + 0.25 * demand + 0.2 * strategic
///          + 0.15 * feasibility`
///
/// Inputs are expected to be clamped already; the caller owns the demand
/// factor adjustment.
#[must_use]
pub fn overall_score(business: f64, demand: f64, strategic: f64, feasibility: f64) -> f64 {
    WEIGHT_BUSINESS_IMPACT * business
        + WEIGHT_USER_DEMAND * demand
        + WEIGHT_STRATEGIC_ALIGNMENT * strategic
        + WEIGHT_FEASIBILITY * feasibility
}

impl PriorityScore {
    /// Build a score from remote dimensions.
    ///
    /// Each dimension is clamped to [1, 10], user demand is scaled by the
    /// demand factor (and re-clamped), and the overall value is computed
    /// locally.
    #[must_use]
    pub fn from_dimensions(
        business_impact: f64,
        user_demand: f64,
        strategic_alignment: f64,
        implementation_feasibility: f64,
        demand_factor: f64,
        calculated_at_ms: u64,
    ) -> Self {
        let business_impact = clamp_score(business_impact);
        let user_demand = clamp_score(adjust_demand(clamp_score(user_demand), demand_factor));
        let strategic_alignment = clamp_score(strategic_alignment);
        let implementation_feasibility = clamp_score(implementation_feasibility);

        Self {
            overall: overall_score(
                business_impact,
                user_demand,
                strategic_alignment,
                implementation_feasibility,
            ),
            business_impact,
            user_demand,
            strategic_alignment,
            implementation_feasibility,
            calculated_at_ms,
        }
    }
}

// =============================================================================
// FALLBACK CONSTRUCTORS
// =============================================================================

/// Stage 1 fallback: fixed classification plus locally extracted keywords.
#[must_use]
pub fn fallback_analysis(title: &str, description: &str, analyzed_at_ms: u64) -> Analysis {
    Analysis {
        category: Category::Enhancement,
        complexity: FALLBACK_COMPLEXITY,
        clarity: FALLBACK_CLARITY,
        sentiment: Sentiment::Neutral,
        keywords: extract_keywords(&format!("{title} {description}")),
        confidence: FALLBACK_CONFIDENCE,
        similar_requests: Vec::new(),
        suggestions: FALLBACK_SUGGESTIONS.iter().map(ToString::to_string).collect(),
        analyzed_at_ms,
    }
}

/// Stage 2 fallback: static mapping from the submitter's priority label.
///
/// Business, demand and strategic dimensions all take the label's base
/// score (3/5/7/9); feasibility is derived from complexity. The overall
/// value mirrors the base score directly.
#[must_use]
pub fn fallback_priority(
    user_priority: UserPriority,
    complexity: u8,
    demand_factor: f64,
    calculated_at_ms: u64,
) -> PriorityScore {
    let base = user_priority.base_score();
    let feasibility = (SCORE_MAX - f64::from(complexity)).max(SCORE_MIN);

    PriorityScore {
        overall: base,
        business_impact: base,
        user_demand: clamp_score(adjust_demand(base, demand_factor)),
        strategic_alignment: base,
        implementation_feasibility: feasibility,
        calculated_at_ms,
    }
}

/// Stage 3 fallback: hours derived from complexity, split 40/40/10/10
/// across frontend/backend/design/qa, with fixed placeholders.
#[must_use]
pub fn fallback_effort(complexity: u8, estimated_at_ms: u64) -> EffortEstimate {
    let total = u32::from(complexity.max(1)) * HOURS_PER_COMPLEXITY_POINT;

    EffortEstimate {
        total_hours: total,
        frontend_hours: total * 4 / 10,
        backend_hours: total * 4 / 10,
        design_hours: total / 10,
        qa_hours: total / 10,
        risk_factors: vec!["Complexity may be higher than estimated".to_string()],
        dependencies: vec!["Requirements clarification needed".to_string()],
        team_members: vec![
            "Frontend Developer".to_string(),
            "Backend Developer".to_string(),
        ],
        estimated_at_ms,
    }
}

/// Stage 4 fallback: every impact dimension sits at the midpoint.
#[must_use]
pub fn fallback_impact(assessed_at_ms: u64) -> BusinessImpact {
    BusinessImpact {
        retention: FALLBACK_IMPACT,
        revenue: FALLBACK_IMPACT,
        competitive_advantage: FALLBACK_IMPACT,
        ux_improvement: FALLBACK_IMPACT,
        operational_efficiency: FALLBACK_IMPACT,
        assessed_at_ms,
    }
}

// =============================================================================
// TESTS
// =============================================================================
