//! # Enrichment Chain
//!
//! The four-stage enrichment pipeline that runs after a submission:
//!
//! 1. Analysis - categorization, keywords, sentiment
//! 2. Priority - four-dimension score with locally computed overall
//! 3. Effort - hour estimates per discipline
//! 4. Impact - five-dimension business assessment
//!
//! Stages run sequentially. Every model failure (connection, HTTP status,
//! undecodable reply) is replaced by the matching deterministic fallback
//! from `wishboard_core::scoring`, so the chain itself never fails and
//! never rolls back stages that already merged. Duplicate detection runs
//! locally against stored requests; the model is never asked about it.

pub mod prompts;

use crate::feed::{self, FeedSender};
use crate::gemini::GeminiClient;
use std::sync::Arc;
use tokio::sync::RwLock;
use wishboard_core::{
    Analysis, BusinessImpact, EffortEstimate, FeatureRequest, PriorityScore, Registry, RequestId,
    Status, decode_analysis, decode_effort, decode_impact, decode_priority, detect_duplicates,
    fallback_analysis, fallback_effort, fallback_impact, fallback_priority,
};

// =============================================================================
// ENRICHER
// =============================================================================

/// Runs the enrichment chain for submitted requests.
#[derive(Debug)]
pub struct Enricher {
    client: GeminiClient,
    demand_factor: f64,
}

impl Enricher {
    /// Create an enricher from a configured client.
    #[must_use]
    pub fn new(client: GeminiClient, demand_factor: f64) -> Self {
        Self {
            client,
            demand_factor,
        }
    }

    /// Run all four stages for one request.
    ///
    /// Takes the registry lock once per merge so readers stay responsive
    /// while model calls are in flight. A request deleted mid-chain ends
    /// the chain quietly.
    pub async fn enrich(
        &self,
        registry: Arc<RwLock<Registry>>,
        sender: FeedSender,
        id: RequestId,
    ) {
        // Snapshot for prompts and local duplicate detection.
        let (request, others) = {
            let guard = registry.read().await;
            let Ok(request) = guard.get(id) else {
                tracing::warn!(request = id.0, "request vanished before enrichment");
                return;
            };
            let others: Vec<FeatureRequest> = guard
                .list()
                .unwrap_or_default()
                .into_iter()
                .filter(|r| r.id != id)
                .collect();
            (request, others)
        };

        // ---- Stage 1: analysis --------------------------------------------
        let (mut analysis, decoded) = self.stage_analysis(&request).await;
        analysis.similar_requests =
            detect_duplicates(&request.title, &request.description, &others);
        let complexity = analysis.complexity;

        {
            let mut guard = registry.write().await;
            if guard.set_analysis(id, analysis).is_err() {
                tracing::warn!(request = id.0, "request deleted during analysis stage");
                return;
            }
            // A decoded stage 1 moves Analyzing to Reviewed. A fallback
            // leaves the status for an operator; a request already moved
            // forward keeps its status either way.
            if decoded {
                if let Err(e) = guard.transition(id, Status::Reviewed, crate::now_ms()) {
                    tracing::debug!(request = id.0, error = %e, "not transitioning to reviewed");
                }
            }
            feed::publish(&sender, &guard);
        }

        // ---- Stage 2: priority --------------------------------------------
        let snapshot = match registry.read().await.get(id) {
            Ok(r) => r,
            Err(_) => return,
        };
        let score = self.stage_priority(&snapshot, complexity).await;
        if self.merge(&registry, &sender, id, |g| g.set_priority_score(id, score)).await {
            return;
        }

        // ---- Stage 3: effort ----------------------------------------------
        let effort = self.stage_effort(&snapshot, complexity).await;
        if self.merge(&registry, &sender, id, |g| g.set_effort_estimate(id, effort)).await {
            return;
        }

        // ---- Stage 4: impact ----------------------------------------------
        let impact = self.stage_impact(&snapshot).await;
        if self.merge(&registry, &sender, id, |g| g.set_business_impact(id, impact)).await {
            return;
        }

        tracing::info!(request = id.0, "enrichment chain complete");
    }

    /// Apply one merge under the write lock and republish the feed.
    /// Returns `true` when the request is gone and the chain should stop.
    async fn merge<F>(
        &self,
        registry: &Arc<RwLock<Registry>>,
        sender: &FeedSender,
        id: RequestId,
        apply: F,
    ) -> bool
    where
        F: FnOnce(
            &mut Registry,
        ) -> Result<FeatureRequest, wishboard_core::WishboardError>,
    {
        let mut guard = registry.write().await;
        if apply(&mut guard).is_err() {
            tracing::warn!(request = id.0, "request deleted during enrichment");
            return true;
        }
        feed::publish(sender, &guard);
        false
    }

    /// Returns the analysis plus whether it was decoded from the model
    /// (as opposed to the fallback).
    async fn stage_analysis(&self, request: &FeatureRequest) -> (Analysis, bool) {
        let now = crate::now_ms();
        match self.client.generate(&prompts::analysis_prompt(request)).await {
            Ok(text) => match decode_analysis(&text, now) {
                Ok(analysis) => (analysis, true),
                Err(e) => {
                    tracing::warn!(request = request.id.0, error = %e, "analysis reply undecodable, using fallback");
                    (
                        fallback_analysis(&request.title, &request.description, now),
                        false,
                    )
                }
            },
            Err(e) => {
                tracing::warn!(request = request.id.0, error = %e, "analysis call failed, using fallback");
                (
                    fallback_analysis(&request.title, &request.description, now),
                    false,
                )
            }
        }
    }

    async fn stage_priority(&self, request: &FeatureRequest, complexity: u8) -> PriorityScore {
        let now = crate::now_ms();
        match self.client.generate(&prompts::priority_prompt(request)).await {
            Ok(text) => decode_priority(&text, self.demand_factor, now).unwrap_or_else(|e| {
                tracing::warn!(request = request.id.0, error = %e, "priority reply undecodable, using fallback");
                fallback_priority(request.user_priority, complexity, self.demand_factor, now)
            }),
            Err(e) => {
                tracing::warn!(request = request.id.0, error = %e, "priority call failed, using fallback");
                fallback_priority(request.user_priority, complexity, self.demand_factor, now)
            }
        }
    }

    async fn stage_effort(&self, request: &FeatureRequest, complexity: u8) -> EffortEstimate {
        let now = crate::now_ms();
        match self
            .client
            .generate(&prompts::effort_prompt(request, complexity))
            .await
        {
            Ok(text) => decode_effort(&text, complexity, now).unwrap_or_else(|e| {
                tracing::warn!(request = request.id.0, error = %e, "effort reply undecodable, using fallback");
                fallback_effort(complexity, now)
            }),
            Err(e) => {
                tracing::warn!(request = request.id.0, error = %e, "effort call failed, using fallback");
                fallback_effort(complexity, now)
            }
        }
    }

    async fn stage_impact(&self, request: &FeatureRequest) -> BusinessImpact {
        let now = crate::now_ms();
        match self.client.generate(&prompts::impact_prompt(request)).await {
            Ok(text) => decode_impact(&text, now).unwrap_or_else(|e| {
                tracing::warn!(request = request.id.0, error = %e, "impact reply undecodable, using fallback");
                fallback_impact(now)
            }),
            Err(e) => {
                tracing::warn!(request = request.id.0, error = %e, "impact call failed, using fallback");
                fallback_impact(now)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
