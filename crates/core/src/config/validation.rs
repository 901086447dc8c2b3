//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::summarize::Language;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` or `store_timeout_ms` is below 100ms or above 5 minutes
    /// - `user_agent` is empty
    /// - `page_text_limit` or `summary_sentences` is 0
    /// - `language` is not supported, or `transcript_languages` is empty
    /// - a ranking parameter is outside its domain
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        for (field, value) in [("timeout_ms", self.timeout_ms), ("store_timeout_ms", self.store_timeout_ms)] {
            if value < 100 {
                return Err(invalid(field, "must be at least 100ms"));
            }
            if value > 300_000 {
                return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
            }
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.page_text_limit == 0 {
            return Err(invalid("page_text_limit", "must be greater than 0"));
        }

        if self.summary_sentences == 0 {
            return Err(invalid("summary_sentences", "must be at least 1"));
        }

        if self.language.parse::<Language>().is_err() {
            return Err(ConfigError::Invalid {
                field: "language".into(),
                reason: format!("unsupported language '{}'", self.language),
            });
        }

        if self.transcript_languages.iter().all(|code| code.trim().is_empty()) {
            return Err(invalid("transcript_languages", "must name at least one language code"));
        }

        let ranking = &self.ranking;
        if !(0.0..1.0).contains(&ranking.similarity_threshold) {
            return Err(invalid("ranking.similarity_threshold", "must be in [0, 1)"));
        }
        if ranking.damping <= 0.0 || ranking.damping >= 1.0 || ranking.damping.is_nan() {
            return Err(invalid("ranking.damping", "must be in (0, 1)"));
        }
        if ranking.max_iterations == 0 {
            return Err(invalid("ranking.max_iterations", "must be at least 1"));
        }
        if ranking.tolerance <= 0.0 || ranking.tolerance.is_nan() {
            return Err(invalid("ranking.tolerance", "must be greater than 0"));
        }

        if self.page_text_limit > self.max_bytes {
            tracing::warn!(
                page_text_limit = self.page_text_limit,
                max_bytes = self.max_bytes,
                "page_text_limit exceeds max_bytes; pages will never reach the text limit"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankingConfig;

    fn assert_invalid(config: AppConfig, expected: &str) {
        let result = config.validate();
        assert!(
            matches!(&result, Err(ConfigError::Invalid { field, .. }) if field == expected),
            "expected {expected} to be rejected, got {result:?}"
        );
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_bytes() {
        assert_invalid(AppConfig { max_bytes: 0, ..Default::default() }, "max_bytes");
        assert_invalid(AppConfig { max_bytes: 51 * 1024 * 1024, ..Default::default() }, "max_bytes");
    }

    #[test]
    fn test_validate_timeouts() {
        assert_invalid(AppConfig { timeout_ms: 50, ..Default::default() }, "timeout_ms");
        assert_invalid(AppConfig { timeout_ms: 301_000, ..Default::default() }, "timeout_ms");
        assert_invalid(AppConfig { store_timeout_ms: 99, ..Default::default() }, "store_timeout_ms");
    }

    #[test]
    fn test_validate_empty_user_agent() {
        assert_invalid(AppConfig { user_agent: String::new(), ..Default::default() }, "user_agent");
    }

    #[test]
    fn test_validate_zero_counts() {
        assert_invalid(AppConfig { page_text_limit: 0, ..Default::default() }, "page_text_limit");
        assert_invalid(AppConfig { summary_sentences: 0, ..Default::default() }, "summary_sentences");
    }

    #[test]
    fn test_validate_language() {
        assert_invalid(AppConfig { language: "klingon".into(), ..Default::default() }, "language");
        assert!(AppConfig { language: "EN".into(), ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn test_validate_transcript_languages() {
        assert_invalid(AppConfig { transcript_languages: vec![], ..Default::default() }, "transcript_languages");
        assert_invalid(
            AppConfig { transcript_languages: vec![" ".into()], ..Default::default() },
            "transcript_languages",
        );
    }

    #[test]
    fn test_validate_ranking() {
        let with = |ranking: RankingConfig| AppConfig { ranking, ..Default::default() };

        assert_invalid(
            with(RankingConfig { similarity_threshold: 1.0, ..Default::default() }),
            "ranking.similarity_threshold",
        );
        assert_invalid(with(RankingConfig { damping: 0.0, ..Default::default() }), "ranking.damping");
        assert_invalid(with(RankingConfig { damping: 1.0, ..Default::default() }), "ranking.damping");
        assert_invalid(with(RankingConfig { max_iterations: 0, ..Default::default() }), "ranking.max_iterations");
        assert_invalid(with(RankingConfig { tolerance: 0.0, ..Default::default() }), "ranking.tolerance");
        assert!(with(RankingConfig { similarity_threshold: 0.0, ..Default::default() }).validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            max_bytes: 1,
            timeout_ms: 100,
            store_timeout_ms: 300_000,
            page_text_limit: 1,
            summary_sentences: 1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
