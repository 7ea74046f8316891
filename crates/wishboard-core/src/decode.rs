//! # Model Reply Decoding
//!
//! Strict decoding of untrusted model output into enrichment sub-records.
//!
//! The remote model returns free text that should contain a JSON object,
//! often wrapped in markdown code fences. Decoding:
//! 1. strips leading/trailing fences (with an optional `json` tag),
//! 2. parses the payload with serde, failing on missing or mistyped fields,
//! 3. clamps every numeric field to its documented range.
//!
//! A decode failure is never fatal; callers replace it with the matching
//! fallback from the `scoring` module.

use crate::scoring::clamp_score;
use crate::types::{
    Analysis, BusinessImpact, Category, EffortEstimate, PriorityScore, Sentiment, WishboardError,
};
use serde::Deserialize;

// =============================================================================
// FENCE STRIPPING
// =============================================================================

/// Strip markdown code fences around a model reply.
///
/// Handles ```` ```json ````, bare ```` ``` ````, and replies without any
/// fence. Interior content is untouched.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn parse<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, WishboardError> {
    serde_json::from_str(strip_code_fences(text))
        .map_err(|e| WishboardError::DeserializationError(e.to_string()))
}

// =============================================================================
// REPLY SHAPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct AnalysisReply {
    category: Category,
    complexity: f64,
    clarity: f64,
    sentiment: Sentiment,
    #[serde(default)]
    keywords: Vec<String>,
    confidence: f64,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PriorityReply {
    business_impact: f64,
    user_demand: f64,
    strategic_alignment: f64,
    implementation_feasibility: f64,
}

#[derive(Debug, Deserialize)]
struct EffortReply {
    #[serde(default)]
    total_hours: Option<u32>,
    frontend_hours: u32,
    backend_hours: u32,
    design_hours: u32,
    qa_hours: u32,
    #[serde(default)]
    risk_factors: Vec<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    team_members: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ImpactReply {
    retention: f64,
    revenue: f64,
    competitive_advantage: f64,
    ux_improvement: f64,
    operational_efficiency: f64,
}

// =============================================================================
// DECODERS
// =============================================================================

/// Decode a categorization reply.
///
/// Clamps complexity to [1, 5], clarity to [1, 10] and confidence to
/// [0, 1]. The similar-request list starts empty; duplicate detection
/// fills it in locally.
pub fn decode_analysis(text: &str, analyzed_at_ms: u64) -> Result<Analysis, WishboardError> {
    let reply: AnalysisReply = parse(text)?;

    Ok(Analysis {
        category: reply.category,
        complexity: clamp_u8(reply.complexity, 1, 5),
        clarity: clamp_u8(reply.clarity, 1, 10),
        sentiment: reply.sentiment,
        keywords: reply.keywords,
        confidence: if reply.confidence.is_finite() {
            reply.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        },
        similar_requests: Vec::new(),
        suggestions: reply.suggestions,
        analyzed_at_ms,
    })
}

/// Decode a priority scoring reply.
///
/// The four dimensions are clamped and the overall value is recomputed
/// locally; any "overall" the model volunteers is ignored.
pub fn decode_priority(
    text: &str,
    demand_factor: f64,
    calculated_at_ms: u64,
) -> Result<PriorityScore, WishboardError> {
    let reply: PriorityReply = parse(text)?;

    Ok(PriorityScore::from_dimensions(
        reply.business_impact,
        reply.user_demand,
        reply.strategic_alignment,
        reply.implementation_feasibility,
        demand_factor,
        calculated_at_ms,
    ))
}

/// Decode an effort estimation reply.
///
/// A missing total defaults to complexity x 8 hours; an empty team
/// defaults to a single generic developer.
pub fn decode_effort(
    text: &str,
    complexity: u8,
    estimated_at_ms: u64,
) -> Result<EffortEstimate, WishboardError> {
    let reply: EffortReply = parse(text)?;

    let total_hours = reply
        .total_hours
        .unwrap_or(u32::from(complexity.max(1)) * crate::primitives::HOURS_PER_COMPLEXITY_POINT);
    let team_members = if reply.team_members.is_empty() {
        vec!["Developer".to_string()]
    } else {
        reply.team_members
    };

    Ok(EffortEstimate {
        total_hours,
        frontend_hours: reply.frontend_hours,
        backend_hours: reply.backend_hours,
        design_hours: reply.design_hours,
        qa_hours: reply.qa_hours,
        risk_factors: reply.risk_factors,
        dependencies: reply.dependencies,
        team_members,
        estimated_at_ms,
    })
}

/// Decode a business impact reply, clamping all five dimensions to [1, 10].
pub fn decode_impact(text: &str, assessed_at_ms: u64) -> Result<BusinessImpact, WishboardError> {
    let reply: ImpactReply = parse(text)?;

    Ok(BusinessImpact {
        retention: clamp_score(reply.retention),
        revenue: clamp_score(reply.revenue),
        competitive_advantage: clamp_score(reply.competitive_advantage),
        ux_improvement: clamp_score(reply.ux_improvement),
        operational_efficiency: clamp_score(reply.operational_efficiency),
        assessed_at_ms,
    })
}

fn clamp_u8(value: f64, min: u8, max: u8) -> u8 {
    if value.is_finite() {
        value.clamp(f64::from(min), f64::from(max)) as u8
    } else {
        min
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn leaves_unfenced_text() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn decode_analysis_clamps_ranges() {
        let text = r#"{
            "category": "new-feature",
            "complexity": 9,
            "clarity": -2,
            "sentiment": "excited",
            "keywords": ["export"],
            "confidence": 1.7,
            "suggestions": ["Split into smaller tasks"]
        }"#;

        let analysis = decode_analysis(text, 42).expect("decode");
        assert_eq!(analysis.category, Category::NewFeature);
        assert_eq!(analysis.complexity, 5);
        assert_eq!(analysis.clarity, 1);
        assert_eq!(analysis.sentiment, Sentiment::Excited);
        assert_eq!(analysis.confidence, 1.0);
        assert_eq!(analysis.analyzed_at_ms, 42);
        assert!(analysis.similar_requests.is_empty());
    }

    #[test]
    fn decode_analysis_rejects_missing_fields() {
        let text = r#"{"category": "enhancement"}"#;
        assert!(decode_analysis(text, 0).is_err());
    }

    #[test]
    fn decode_analysis_rejects_unknown_category() {
        let text = r#"{
            "category": "miracle",
            "complexity": 3,
            "clarity": 5,
            "sentiment": "neutral",
            "confidence": 0.5
        }"#;
        assert!(decode_analysis(text, 0).is_err());
    }

    #[test]
    fn decode_priority_recomputes_overall() {
        let text = r#"```json
        {
            "business_impact": 8,
            "user_demand": 6,
            "strategic_alignment": 4,
            "implementation_feasibility": 2,
            "overall": 999
        }
        ```"#;

        let score = decode_priority(text, 1.0, 0).expect("decode");
        let expected = 0.4 * 8.0 + 0.25 * 6.0 + 0.2 * 4.0 + 0.15 * 2.0;
        assert!((score.overall - expected).abs() < 1e-9);
    }

    #[test]
    fn decode_effort_defaults() {
        let text = r#"{
            "frontend_hours": 10,
            "backend_hours": 20,
            "design_hours": 4,
            "qa_hours": 6
        }"#;

        let effort = decode_effort(text, 4, 0).expect("decode");
        assert_eq!(effort.total_hours, 32);
        assert_eq!(effort.team_members, vec!["Developer"]);
        assert!(effort.risk_factors.is_empty());
    }

    #[test]
    fn decode_effort_explicit_total() {
        let text = r#"{
            "total_hours": 50,
            "frontend_hours": 10,
            "backend_hours": 30,
            "design_hours": 5,
            "qa_hours": 5,
            "team_members": ["Backend Developer"]
        }"#;

        let effort = decode_effort(text, 4, 0).expect("decode");
        assert_eq!(effort.total_hours, 50);
        assert_eq!(effort.team_members, vec!["Backend Developer"]);
    }

    #[test]
    fn decode_impact_clamps() {
        let text = r#"{
            "retention": 12,
            "revenue": 0,
            "competitive_advantage": 7,
            "ux_improvement": 5.5,
            "operational_efficiency": -1
        }"#;

        let impact = decode_impact(text, 9).expect("decode");
        assert_eq!(impact.retention, 10.0);
        assert_eq!(impact.revenue, 1.0);
        assert_eq!(impact.competitive_advantage, 7.0);
        assert_eq!(impact.ux_improvement, 5.5);
        assert_eq!(impact.operational_efficiency, 1.0);
        assert_eq!(impact.assessed_at_ms, 9);
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(decode_priority("the model apologizes", 1.0, 0).is_err());
        assert!(decode_impact("```json\nnot json\n```", 0).is_err());
    }
}
