//! # Keyword Extraction & Duplicate Detection
//!
//! Local text analysis used by the enrichment chain.
//!
//! - Keyword extraction is a fixed tokenizer: lowercase, strip punctuation,
//!   keep words longer than `MIN_KEYWORD_LENGTH` that are not stopwords.
//! - Duplicate detection compares significant-token sets: two requests are
//!   duplicates when shared tokens divided by the larger token set exceeds
//!   `DUPLICATE_THRESHOLD`.
//!
//! Both operations are pure and run without network access; they are the
//! only enrichment steps that never degrade under remote outage.

use crate::primitives::{DUPLICATE_THRESHOLD, MIN_KEYWORD_LENGTH, STOPWORDS};
use crate::types::{FeatureRequest, RequestId};
use std::collections::BTreeSet;

// =============================================================================
// KEYWORD EXTRACTION
// =============================================================================

/// Extract significant keywords from free text.
///
/// Tokens are lowercased, punctuation is treated as whitespace, and only
/// words strictly longer than `MIN_KEYWORD_LENGTH` that are not in the
/// stopword list survive. Duplicates are removed; first-occurrence order
/// is preserved.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let normalized: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();

    let mut seen = BTreeSet::new();
    let mut keywords = Vec::new();
    for word in normalized.split_whitespace() {
        if word.len() <= MIN_KEYWORD_LENGTH || STOPWORDS.contains(&word) {
            continue;
        }
        if seen.insert(word.to_string()) {
            keywords.push(word.to_string());
        }
    }
    keywords
}

// =============================================================================
// SIMILARITY
// =============================================================================

/// Token-set overlap ratio: shared tokens divided by the larger set.
///
/// Returns 0.0 when either side is empty.
#[must_use]
pub fn overlap_ratio(a: &[String], b: &[String]) -> f64 {
    let set_a: BTreeSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: BTreeSet<&str> = b.iter().map(String::as_str).collect();

    let larger = set_a.len().max(set_b.len());
    if larger == 0 {
        return 0.0;
    }

    let shared = set_a.intersection(&set_b).count();
    shared as f64 / larger as f64
}

/// Check whether an overlap ratio crosses the duplicate threshold.
#[must_use]
pub fn is_duplicate(ratio: f64) -> bool {
    ratio > DUPLICATE_THRESHOLD
}

// =============================================================================
// DUPLICATE DETECTION
// =============================================================================

/// Find likely duplicates of a new request among existing requests.
///
/// Existing requests contribute their stored analysis keywords when
/// present; otherwise their keywords are extracted from title and
/// description on the fly. The new request is always tokenized locally.
#[must_use]
pub fn detect_duplicates(
    title: &str,
    description: &str,
    existing: &[FeatureRequest],
) -> Vec<RequestId> {
    let new_keywords = extract_keywords(&format!("{title} {description}"));
    if new_keywords.is_empty() {
        return Vec::new();
    }

    let mut duplicates = Vec::new();
    for request in existing {
        let stored = request
            .analysis
            .as_ref()
            .filter(|a| !a.keywords.is_empty())
            .map(|a| a.keywords.clone());
        let candidate_keywords = stored.unwrap_or_else(|| {
            extract_keywords(&format!("{} {}", request.title, request.description))
        });

        if is_duplicate(overlap_ratio(&new_keywords, &candidate_keywords)) {
            duplicates.push(request.id);
        }
    }
    duplicates
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Status, SubmitterRole, UserPriority};

    fn make_request(id: u64, title: &str, description: &str) -> FeatureRequest {
        FeatureRequest {
            id: RequestId(id),
            title: title.to_string(),
            description: description.to_string(),
            submitted_by: "u-1".to_string(),
            submitter_name: "Alice".to_string(),
            submitter_role: SubmitterRole::Community,
            app_id: "app-1".to_string(),
            app_name: "Demo".to_string(),
            status: Status::Submitted,
            user_priority: UserPriority::Medium,
            created_at_ms: 0,
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
        }
    }

    #[test]
    fn extraction_drops_short_words_and_stopwords() {
        let keywords = extract_keywords("This will add a dark mode to the app");
        assert_eq!(keywords, vec!["dark", "mode"]);
    }

    #[test]
    fn extraction_strips_punctuation() {
        let keywords = extract_keywords("Export to CSV, please!");
        assert_eq!(keywords, vec!["export", "please"]);
    }

    #[test]
    fn extraction_deduplicates_preserving_order() {
        let keywords = extract_keywords("export export csv export spreadsheet");
        assert_eq!(keywords, vec!["export", "spreadsheet"]);
    }

    #[test]
    fn extraction_empty_text() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("a an to").is_empty());
    }

    #[test]
    fn overlap_ratio_identical_sets() {
        let a = vec!["export".to_string(), "spreadsheet".to_string()];
        assert_eq!(overlap_ratio(&a, &a), 1.0);
    }

    #[test]
    fn overlap_ratio_disjoint_sets() {
        let a = vec!["export".to_string()];
        let b = vec!["login".to_string()];
        assert_eq!(overlap_ratio(&a, &b), 0.0);
    }

    #[test]
    fn overlap_ratio_uses_larger_set() {
        let a = vec!["export".to_string(), "spreadsheet".to_string()];
        let b = vec![
            "export".to_string(),
            "spreadsheet".to_string(),
            "download".to_string(),
            "button".to_string(),
        ];
        assert_eq!(overlap_ratio(&a, &b), 0.5);
    }

    #[test]
    fn overlap_ratio_empty_sides() {
        let a: Vec<String> = Vec::new();
        let b = vec!["export".to_string()];
        assert_eq!(overlap_ratio(&a, &b), 0.0);
        assert_eq!(overlap_ratio(&a, &a), 0.0);
    }

    #[test]
    fn reordered_requests_are_mutual_duplicates() {
        let first = make_request(1, "Export to CSV please", "");
        let second = make_request(2, "Please add CSV export", "");

        let flagged = detect_duplicates(&second.title, &second.description, &[first.clone()]);
        assert_eq!(flagged, vec![RequestId(1)]);

        let flagged = detect_duplicates(&first.title, &first.description, &[second]);
        assert_eq!(flagged, vec![RequestId(2)]);
    }

    #[test]
    fn unrelated_requests_not_flagged() {
        let existing = make_request(1, "Dark mode for the dashboard", "");
        let flagged = detect_duplicates("Export data as CSV", "", &[existing]);
        assert!(flagged.is_empty());
    }

    #[test]
    fn stored_keywords_take_precedence() {
        use crate::types::{Analysis, Category, Sentiment};

        let mut existing = make_request(1, "Totally unrelated title words", "");
        existing.analysis = Some(Analysis {
            category: Category::Enhancement,
            complexity: 3,
            clarity: 5,
            sentiment: Sentiment::Neutral,
            keywords: vec!["export".to_string(), "spreadsheet".to_string()],
            confidence: 0.9,
            similar_requests: Vec::new(),
            suggestions: Vec::new(),
            analyzed_at_ms: 0,
        });

        let flagged = detect_duplicates("Export spreadsheet data", "", &[existing]);
        assert_eq!(flagged, vec![RequestId(1)]);
    }
}
