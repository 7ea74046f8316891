//! # Enrichment Prompts
//!
//! Prompt builders for the four enrichment stages.
//!
//! Every prompt demands a bare JSON object whose field names match the
//! strict decoders in `wishboard_core::decode`. Replies that drift from
//! the shape fail decoding and trigger the deterministic fallback.

use wishboard_core::FeatureRequest;

/// Stage 1: categorization and text analysis.
#[must_use]
pub fn analysis_prompt(request: &FeatureRequest) -> String {
    format!(
        r#"You are analyzing a software feature request. Reply with ONLY a JSON object, no prose, no markdown fences.

Feature request:
Title: {title}
Description: {description}
Submitter priority: {priority:?}

Required JSON shape:
{{
  "category": "enhancement" | "bug-fix" | "new-feature" | "ui-ux" | "performance" | "integration",
  "complexity": <integer 1-5>,
  "clarity": <integer 1-10>,
  "sentiment": "frustrated" | "neutral" | "excited",
  "keywords": [<up to 8 lowercase keywords>],
  "confidence": <number 0-1>,
  "suggestions": [<up to 3 short suggestions for improving the request>]
}}"#,
        title = request.title,
        description = request.description,
        priority = request.user_priority,
    )
}

/// Stage 2: priority scoring across four dimensions.
#[must_use]
pub fn priority_prompt(request: &FeatureRequest) -> String {
    let category = request
        .analysis
        .as_ref()
        .map_or("unknown".to_string(), |a| format!("{:?}", a.category));

    format!(
        r#"Score this feature request on four dimensions, each from 1 to 10. Reply with ONLY a JSON object, no prose, no markdown fences.

Feature request:
Title: {title}
Description: {description}
Category: {category}
Votes: {votes}
Submitter priority: {priority:?}

Required JSON shape:
{{
  "business_impact": <number 1-10>,
  "user_demand": <number 1-10>,
  "strategic_alignment": <number 1-10>,
  "implementation_feasibility": <number 1-10>
}}"#,
        title = request.title,
        description = request.description,
        votes = request.votes,
        priority = request.user_priority,
    )
}

/// Stage 3: effort estimation in hours.
#[must_use]
pub fn effort_prompt(request: &FeatureRequest, complexity: u8) -> String {
    format!(
        r#"Estimate the engineering effort for this feature request. Reply with ONLY a JSON object, no prose, no markdown fences.

Feature request:
Title: {title}
Description: {description}
Complexity (1-5): {complexity}

Required JSON shape:
{{
  "total_hours": <integer>,
  "frontend_hours": <integer>,
  "backend_hours": <integer>,
  "design_hours": <integer>,
  "qa_hours": <integer>,
  "risk_factors": [<short risk descriptions>],
  "dependencies": [<external dependencies>],
  "team_members": [<roles needed, e.g. "Backend Developer">]
}}"#,
        title = request.title,
        description = request.description,
    )
}

/// Stage 4: business impact assessment.
#[must_use]
pub fn impact_prompt(request: &FeatureRequest) -> String {
    format!(
        r#"Assess the business impact of this feature request on five dimensions, each from 1 to 10. Reply with ONLY a JSON object, no prose, no markdown fences.

Feature request:
Title: {title}
Description: {description}
Votes: {votes}

Required JSON shape:
{{
  "retention": <number 1-10>,
  "revenue": <number 1-10>,
  "competitive_advantage": <number 1-10>,
  "ux_improvement": <number 1-10>,
  "operational_efficiency": <number 1-10>
}}"#,
        title = request.title,
        description = request.description,
        votes = request.votes,
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wishboard_core::{Identity, NewRequest, Registry, UserPriority};

    fn sample() -> FeatureRequest {
        let mut registry = Registry::new();
        registry
            .submit(
                NewRequest {
                    title: "Add CSV export".to_string(),
                    description: "Export the report table to CSV".to_string(),
                    app_id: "app-1".to_string(),
                    app_name: "Reports".to_string(),
                    user_priority: UserPriority::High,
                    tester_email: None,
                    tags: Vec::new(),
                },
                &Identity::Guest,
                false,
                0,
            )
            .unwrap_or_else(|_| unreachable!("valid draft"))
    }

    #[test]
    fn prompts_name_every_decoded_field() {
        let request = sample();

        let analysis = analysis_prompt(&request);
        for field in ["category", "complexity", "clarity", "sentiment", "confidence"] {
            assert!(analysis.contains(field), "missing {field}");
        }

        let priority = priority_prompt(&request);
        for field in [
            "business_impact",
            "user_demand",
            "strategic_alignment",
            "implementation_feasibility",
        ] {
            assert!(priority.contains(field), "missing {field}");
        }

        let effort = effort_prompt(&request, 3);
        for field in ["total_hours", "frontend_hours", "qa_hours", "team_members"] {
            assert!(effort.contains(field), "missing {field}");
        }

        let impact = impact_prompt(&request);
        for field in ["retention", "revenue", "operational_efficiency"] {
            assert!(impact.contains(field), "missing {field}");
        }
    }

    #[test]
    fn prompts_embed_request_text() {
        let request = sample();
        assert!(analysis_prompt(&request).contains("Add CSV export"));
        assert!(priority_prompt(&request).contains("Export the report table"));
    }
}
