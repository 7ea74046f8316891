//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! CLI commands operate directly on the database and never call the
//! model: a request submitted here starts in `submitted` and can be
//! enriched later only through the server path.

use crate::api;
use crate::config::Config;
use crate::enrich::Enricher;
use crate::gemini::GeminiClient;
use std::path::Path;
use wishboard_core::{
    FeatureRequest, Identity, NewRequest, Registry, RequestId, Status, UserPriority,
    WishboardError,
};

/// Open a registry on the selected backend.
fn load_registry(db_path: &Path, backend: &str) -> Result<Registry, WishboardError> {
    match backend {
        "memory" => Ok(Registry::new()),
        "redb" => Registry::with_redb(db_path),
        other => Err(WishboardError::Validation(format!(
            "Unknown backend '{}' (expected \"redb\" or \"memory\")",
            other
        ))),
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &Path,
    backend: &str,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
) -> Result<(), WishboardError> {
    let registry = load_registry(db_path, backend)?;
    let config = Config::load(config_path)?;

    let enricher = config
        .gemini()
        .map(|gemini| Enricher::new(GeminiClient::new(gemini), config.demand_factor));

    println!("Wishboard Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", host);
    println!("  Port:       {}", port);
    println!("  Backend:    {}", backend);
    println!("  Database:   {:?}", db_path);
    println!(
        "  Enrichment: {}",
        if enricher.is_some() {
            config.gemini_model.as_str()
        } else {
            "disabled (no API key)"
        }
    );
    println!();
    println!("Endpoints:");
    println!("  POST   /requests               - Submit a feature request");
    println!("  GET    /requests               - List requests");
    println!("  GET    /requests/feed          - Live feed (SSE)");
    println!("  GET    /requests/{{id}}          - Fetch one request");
    println!("  POST   /requests/{{id}}/vote     - Vote");
    println!("  POST   /requests/{{id}}/status   - Status transition");
    println!("  POST   /requests/{{id}}/comments - Comment");
    println!("  DELETE /requests/{{id}}          - Delete");
    println!("  GET    /analytics              - Aggregate analytics");
    println!("  POST   /wishlist               - Add wishlist item");
    println!("  GET    /wishlist               - List wishlist items");
    println!("  GET    /wishlists/public       - Public wishlist items");
    println!("  GET    /health                 - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, registry, enricher).await
}

// =============================================================================
// SUBMIT COMMAND
// =============================================================================

/// Submit a feature request from the command line.
pub fn cmd_submit(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    title: String,
    description: String,
    app_id: String,
    app_name: String,
    priority: UserPriority,
    tags: Option<String>,
) -> Result<(), WishboardError> {
    let mut registry = load_registry(db_path, backend)?;

    let tags = tags
        .map(|t| {
            t.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let request = registry.submit(
        NewRequest {
            title,
            description,
            app_id,
            app_name,
            user_priority: priority,
            tester_email: None,
            tags,
        },
        &Identity::Guest,
        false,
        crate::now_ms(),
    )?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&request).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Submitted request #{}", request.id.0);
    println!("  Title:    {}", request.title);
    println!("  Status:   {:?}", request.status);
    println!("  Priority: {:?}", request.user_priority);
    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List requests, newest first.
pub fn cmd_list(db_path: &Path, backend: &str, json_mode: bool) -> Result<(), WishboardError> {
    let registry = load_registry(db_path, backend)?;
    let requests = registry.list()?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&requests).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Wishboard Requests ({} total)", requests.len());
    println!("============================");
    for request in &requests {
        println!(
            "#{:<5} {:12} {:>3} votes  {}",
            request.id.0,
            format!("{:?}", request.status).to_lowercase(),
            request.votes,
            request.title
        );
    }
    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show one request in full.
pub fn cmd_show(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    id: u64,
) -> Result<(), WishboardError> {
    let registry = load_registry(db_path, backend)?;
    let request = registry.get(RequestId(id))?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&request).unwrap_or_default()
        );
        return Ok(());
    }

    print_request(&request);
    Ok(())
}

fn print_request(request: &FeatureRequest) {
    println!("Request #{}", request.id.0);
    println!("=========={}", "=".repeat(request.id.0.to_string().len()));
    println!("Title:       {}", request.title);
    println!("Description: {}", request.description);
    println!("Status:      {:?}", request.status);
    println!("Priority:    {:?}", request.user_priority);
    println!("Submitter:   {} ({:?})", request.submitter_name, request.submitter_role);
    println!("App:         {} ({})", request.app_name, request.app_id);
    println!("Votes:       {}", request.votes);
    if !request.tags.is_empty() {
        println!("Tags:        {}", request.tags.join(", "));
    }

    if let Some(analysis) = &request.analysis {
        println!();
        println!("Analysis:");
        println!("  Category:   {:?}", analysis.category);
        println!("  Complexity: {}/5", analysis.complexity);
        println!("  Clarity:    {}/10", analysis.clarity);
        println!("  Sentiment:  {:?}", analysis.sentiment);
        println!("  Confidence: {:.2}", analysis.confidence);
        if !analysis.keywords.is_empty() {
            println!("  Keywords:   {}", analysis.keywords.join(", "));
        }
        if !analysis.similar_requests.is_empty() {
            let ids: Vec<String> = analysis
                .similar_requests
                .iter()
                .map(|r| format!("#{}", r.0))
                .collect();
            println!("  Similar:    {}", ids.join(", "));
        }
    }
    if let Some(score) = &request.priority_score {
        println!();
        println!("Priority Score:");
        println!("  Overall:     {:.1}/10", score.overall);
        println!("  Business:    {:.1}", score.business_impact);
        println!("  Demand:      {:.1}", score.user_demand);
        println!("  Strategic:   {:.1}", score.strategic_alignment);
        println!("  Feasibility: {:.1}", score.implementation_feasibility);
    }
    if let Some(effort) = &request.effort_estimate {
        println!();
        println!("Effort Estimate:");
        println!("  Total:    {} hours", effort.total_hours);
        println!(
            "  Split:    {}fe / {}be / {}design / {}qa",
            effort.frontend_hours, effort.backend_hours, effort.design_hours, effort.qa_hours
        );
    }
    if let Some(impact) = &request.business_impact {
        println!();
        println!("Business Impact:");
        println!("  Retention:  {:.1}", impact.retention);
        println!("  Revenue:    {:.1}", impact.revenue);
        println!("  UX:         {:.1}", impact.ux_improvement);
    }
    if !request.comments.is_empty() {
        println!();
        println!("Comments ({}):", request.comments.len());
        for comment in &request.comments {
            println!("  [{}] {}: {}", comment.id, comment.user_name, comment.content);
        }
    }
}

// =============================================================================
// VOTE COMMAND
// =============================================================================

/// Apply an up or down vote.
pub fn cmd_vote(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    id: u64,
    upvote: bool,
) -> Result<(), WishboardError> {
    let mut registry = load_registry(db_path, backend)?;
    let request = registry.vote(RequestId(id), upvote)?;

    if json_mode {
        let output = serde_json::json!({
            "id": request.id.0,
            "votes": request.votes,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Request #{} now has {} votes", request.id.0, request.votes);
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Transition a request's status.
pub fn cmd_status(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
    id: u64,
    to: Status,
) -> Result<(), WishboardError> {
    let mut registry = load_registry(db_path, backend)?;
    let request = registry.transition(RequestId(id), to, crate::now_ms())?;

    if json_mode {
        let output = serde_json::json!({
            "id": request.id.0,
            "status": request.status,
            "actual_completion_ms": request.actual_completion_ms,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Request #{} moved to {:?}", request.id.0, request.status);
    Ok(())
}

// =============================================================================
// ANALYTICS COMMAND
// =============================================================================

/// Show aggregate analytics.
pub fn cmd_analytics(
    db_path: &Path,
    backend: &str,
    json_mode: bool,
) -> Result<(), WishboardError> {
    let registry = load_registry(db_path, backend)?;
    let summary = registry.analytics()?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Wishboard Analytics");
    println!("===================");
    println!("Total requests:   {}", summary.total_requests);
    println!("Average priority: {:.2}", summary.average_priority);
    println!();
    println!("By status:");
    for (status, count) in &summary.by_status {
        println!("  {:12} {}", format!("{:?}", status).to_lowercase(), count);
    }
    if !summary.by_category.is_empty() {
        println!();
        println!("By category:");
        for (category, count) in &summary.by_category {
            println!("  {:12} {}", format!("{:?}", category).to_lowercase(), count);
        }
    }
    if !summary.top_requests.is_empty() {
        println!();
        let ids: Vec<String> = summary.top_requests.iter().map(|r| format!("#{}", r.0)).collect();
        println!("Top requests: {}", ids.join(", "));
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty database.
pub fn cmd_init(db_path: &Path, force: bool) -> Result<(), WishboardError> {
    if db_path.exists() {
        if !force {
            return Err(WishboardError::IoError(format!(
                "Database '{}' already exists (use --force to overwrite)",
                db_path.display()
            )));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| WishboardError::IoError(format!("Cannot remove database: {}", e)))?;
    }

    let registry = Registry::with_redb(db_path)?;
    debug_assert!(registry.is_persistent());

    println!("Initialized empty database at {:?}", db_path);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
