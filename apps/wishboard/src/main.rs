//! # Wishboard - Feature Request Tracker
//!
//! The main binary for the Wishboard tracker.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) with a live SSE feed
//! - CLI interface for request operations
//! - Optional Gemini-backed enrichment on submission
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! wishboard server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! wishboard submit -t "Add dark mode" -d "Dim the UI at night"
//! wishboard list
//! wishboard vote 3
//! wishboard status 3 approved
//! wishboard analytics
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wishboard::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — WISHBOARD_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("WISHBOARD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wishboard=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Wishboard startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗    ██╗██╗███████╗██╗  ██╗██████╗  ██████╗  █████╗ ██████╗ ██████╗
  ██║    ██║██║██╔════╝██║  ██║██╔══██╗██╔═══██╗██╔══██╗██╔══██╗██╔══██╗
  ██║ █╗ ██║██║███████╗███████║██████╔╝██║   ██║███████║██████╔╝██║  ██║
  ██║███╗██║██║╚════██║██╔══██║██╔══██╗██║   ██║██╔══██║██╔══██╗██║  ██║
  ╚███╔███╔╝██║███████║██║  ██║██████╔╝╚██████╔╝██║  ██║██║  ██║██████╔╝
   ╚══╝╚══╝ ╚═╝╚══════╝╚═╝  ╚═╝╚═════╝  ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═════╝

  Feature Request Tracker v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
