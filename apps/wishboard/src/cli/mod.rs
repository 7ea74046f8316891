//! # Wishboard CLI Module
//!
//! This module implements the CLI interface for Wishboard.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `submit` - Submit a feature request
//! - `list` - List requests, newest first
//! - `show` - Show one request in full
//! - `vote` - Up/down vote a request
//! - `status` - Transition a request's status
//! - `analytics` - Show aggregate analytics
//! - `init` - Initialize a new database

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wishboard_core::{Status, UserPriority, WishboardError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Wishboard - Feature Request Tracker
///
/// Tracks feature requests through a strictly-forward workflow, with
/// optional model-backed enrichment on submission.
#[derive(Parser, Debug)]
#[command(name = "wishboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the request database
    #[arg(short = 'D', long, global = true, default_value = "wishboard.db")]
    pub database: PathBuf,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

    /// Path to a TOML config file (overrides WISHBOARD_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Submit a feature request
    Submit {
        /// Request title
        #[arg(short, long)]
        title: String,

        /// Request description
        #[arg(short, long)]
        description: String,

        /// Application identifier
        #[arg(long, default_value = "cli")]
        app_id: String,

        /// Application display name
        #[arg(long, default_value = "CLI")]
        app_name: String,

        /// Submitter priority label
        #[arg(short = 'P', long, value_enum, default_value = "medium")]
        priority: PriorityArg,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// List requests, newest first
    List,

    /// Show one request in full
    Show {
        /// Request id
        id: u64,
    },

    /// Up/down vote a request
    Vote {
        /// Request id
        id: u64,

        /// Remove a vote instead of adding one
        #[arg(long)]
        down: bool,
    },

    /// Transition a request's status
    Status {
        /// Request id
        id: u64,

        /// Target status
        #[arg(value_enum)]
        to: StatusArg,
    },

    /// Show aggregate analytics
    Analytics,

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },
}

/// Priority label as a CLI value.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<PriorityArg> for UserPriority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
            PriorityArg::Critical => Self::Critical,
        }
    }
}

/// Status as a CLI value.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    Analyzing,
    Reviewed,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Analyzing => Self::Analyzing,
            StatusArg::Reviewed => Self::Reviewed,
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Completed => Self::Completed,
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), WishboardError> {
    let backend = cli.backend.as_str();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(&cli.database, backend, cli.config.as_deref(), &host, port).await
        }
        Some(Commands::Submit {
            title,
            description,
            app_id,
            app_name,
            priority,
            tags,
        }) => cmd_submit(
            &cli.database,
            backend,
            json_mode,
            title,
            description,
            app_id,
            app_name,
            priority.into(),
            tags,
        ),
        Some(Commands::List) => cmd_list(&cli.database, backend, json_mode),
        Some(Commands::Show { id }) => cmd_show(&cli.database, backend, json_mode, id),
        Some(Commands::Vote { id, down }) => {
            cmd_vote(&cli.database, backend, json_mode, id, !down)
        }
        Some(Commands::Status { id, to }) => {
            cmd_status(&cli.database, backend, json_mode, id, to.into())
        }
        Some(Commands::Analytics) => cmd_analytics(&cli.database, backend, json_mode),
        Some(Commands::Init { force }) => cmd_init(&cli.database, force),
        None => {
            // No subcommand - show the listing by default
            cmd_list(&cli.database, backend, json_mode)
        }
    }
}
