//! # Wishboard - Feature Request Tracker
//!
//! The application library behind the `wishboard` binary.
//!
//! This crate wires the pure `wishboard-core` engine into the network
//! world:
//! - HTTP REST API with a live SSE feed (axum)
//! - CLI interface (clap)
//! - Gemini client and the four-stage enrichment chain
//! - TOML configuration with environment overrides
//!
//! The core stays deterministic and clock-free; this crate supplies
//! timestamps and all I/O.

pub mod api;
pub mod cli;
pub mod config;
pub mod enrich;
pub mod feed;
pub mod gemini;

/// Milliseconds since the Unix epoch.
///
/// A clock before 1970 yields 0 rather than an error; the core treats
/// timestamps as opaque.
#[must_use]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
