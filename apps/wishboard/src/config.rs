//! # Application Configuration
//!
//! TOML configuration with environment overrides.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config <path>` or `WISHBOARD_CONFIG`)
//! 3. Environment variables:
//!    - `WISHBOARD_GEMINI_API_KEY`
//!    - `WISHBOARD_GEMINI_MODEL`
//!    - `WISHBOARD_GEMINI_BASE_URL`
//!
//! Without an API key the server runs in offline mode: submissions are
//! accepted and stored but never enriched.

use crate::gemini::GeminiConfig;
use serde::Deserialize;
use std::path::Path;
use wishboard_core::WishboardError;

/// Default Gemini model.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// =============================================================================
// FILE SHAPE
// =============================================================================

/// Raw configuration file contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub enrichment: EnrichmentSection,
}

/// `[gemini]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// `[enrichment]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentSection {
    /// Multiplier applied to the user-demand dimension before clamping.
    pub demand_factor: Option<f64>,
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key. `None` disables enrichment (offline mode).
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: String,
    /// Gemini API base URL.
    pub gemini_base_url: String,
    /// Multiplier for the user-demand dimension.
    pub demand_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            demand_factor: 1.0,
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus environment
    /// overrides.
    ///
    /// `path` is the explicit `--config` argument; when absent the
    /// `WISHBOARD_CONFIG` environment variable is consulted. A missing
    /// explicit file is an error; a missing env-var file is too, since
    /// both were requested by the operator.
    pub fn load(path: Option<&Path>) -> Result<Self, WishboardError> {
        let env_path = std::env::var("WISHBOARD_CONFIG").ok();
        let file = match (path, env_path.as_deref()) {
            (Some(p), _) => Some(read_config_file(p)?),
            (None, Some(p)) => Some(read_config_file(Path::new(p))?),
            (None, None) => None,
        };
        Ok(Self::resolve(file.unwrap_or_default()))
    }

    /// Apply environment overrides on top of file contents and defaults.
    fn resolve(file: ConfigFile) -> Self {
        let defaults = Self::default();

        let api_key = env_non_empty("WISHBOARD_GEMINI_API_KEY")
            .or(file.gemini.api_key)
            .filter(|k| !k.is_empty());
        let model = env_non_empty("WISHBOARD_GEMINI_MODEL")
            .or(file.gemini.model)
            .unwrap_or(defaults.gemini_model);
        let base_url = env_non_empty("WISHBOARD_GEMINI_BASE_URL")
            .or(file.gemini.base_url)
            .unwrap_or(defaults.gemini_base_url);

        let demand_factor = file
            .enrichment
            .demand_factor
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(defaults.demand_factor);

        Self {
            gemini_api_key: api_key,
            gemini_model: model,
            gemini_base_url: base_url,
            demand_factor,
        }
    }

    /// Gemini client configuration, or `None` when no API key is set.
    #[must_use]
    pub fn gemini(&self) -> Option<GeminiConfig> {
        self.gemini_api_key.as_ref().map(|key| GeminiConfig {
            api_key: key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
        })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, WishboardError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        WishboardError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    toml::from_str(&contents).map_err(|e| {
        WishboardError::DeserializationError(format!(
            "Invalid config '{}': {}",
            path.display(),
            e
        ))
    })
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// =============================================================================
// TESTS
// =============================================================================
