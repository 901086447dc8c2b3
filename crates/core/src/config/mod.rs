//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SYNTHESE_*)
//! 2. TOML config file (if SYNTHESE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SYNTHESE_*), nested keys separated by `__`
/// 2. TOML config file (if SYNTHESE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite document database.
    ///
    /// Set via SYNTHESE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SYNTHESE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds, shared by page and transcript fetches.
    ///
    /// Set via SYNTHESE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to download per request.
    ///
    /// Set via SYNTHESE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Upper bound for a single document store call, in milliseconds.
    ///
    /// Set via SYNTHESE_STORE_TIMEOUT_MS environment variable.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Number of characters kept from a fetched page body.
    ///
    /// Set via SYNTHESE_PAGE_TEXT_LIMIT environment variable.
    #[serde(default = "default_page_text_limit")]
    pub page_text_limit: usize,

    /// Number of sentences in a summary.
    ///
    /// Set via SYNTHESE_SUMMARY_SENTENCES environment variable.
    #[serde(default = "default_summary_sentences")]
    pub summary_sentences: usize,

    /// Language used for sentence segmentation and stop words.
    ///
    /// Set via SYNTHESE_LANGUAGE environment variable.
    #[serde(default = "default_language")]
    pub language: String,

    /// Caption language codes to look for, in order of preference.
    ///
    /// Set via SYNTHESE_TRANSCRIPT_LANGUAGES environment variable.
    #[serde(default = "default_transcript_languages")]
    pub transcript_languages: Vec<String>,

    /// Sentence ranking parameters.
    #[serde(default)]
    pub ranking: RankingConfig,
}

/// Parameters of the sentence centrality computation.
///
/// Set via SYNTHESE_RANKING__* environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Minimum cosine similarity for two sentences to be linked.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Probability of following an edge rather than jumping to a random sentence.
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Hard cap on power iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// L1 delta below which scores are considered converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./synthese.sqlite")
}

fn default_user_agent() -> String {
    "synthese/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_page_text_limit() -> usize {
    500
}

fn default_summary_sentences() -> usize {
    5
}

fn default_language() -> String {
    "french".into()
}

fn default_transcript_languages() -> Vec<String> {
    vec!["en".into()]
}

fn default_similarity_threshold() -> f64 {
    0.1
}

fn default_damping() -> f64 {
    0.85
}

fn default_max_iterations() -> usize {
    100
}

fn default_tolerance() -> f64 {
    1e-6
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            damping: default_damping(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            store_timeout_ms: default_store_timeout_ms(),
            page_text_limit: default_page_text_limit(),
            summary_sentences: default_summary_sentences(),
            language: default_language(),
            transcript_languages: default_transcript_languages(),
            ranking: RankingConfig::default(),
        }
    }
}

impl AppConfig {
    /// HTTP timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Store call timeout as Duration for use with tokio.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SYNTHESE_`
    /// 2. TOML file from `SYNTHESE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SYNTHESE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SYNTHESE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
