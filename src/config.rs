//! CLI runtime configuration.
//!
//! Resolved once at startup and passed into command handlers, so that handlers never read
//! process-wide environment variables themselves.

use std::path::{Path, PathBuf};

use mcdf_proto::DEFAULT_DOCS_PATH;

/// Environment variable overriding where `docs` writes the API reference.
pub const DOCS_PATH_ENV: &str = "MCDF_DOCS_PATH";

/// Environment variable holding the tracing filter directives.
pub const LOG_FILTER_ENV: &str = "MCDF_LOG";

/// Filter applied when no directives are configured.
pub const DEFAULT_LOG_FILTER: &str = "mcdf=info,mcdf_proto=info";

/// Configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    docs_path: PathBuf,
    log_filter: String,
}

impl CliConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(DOCS_PATH_ENV).ok(),
            std::env::var(LOG_FILTER_ENV).ok(),
        )
    }

    /// Builds the configuration from optional raw values.
    ///
    /// Empty or whitespace-only values fall back to the defaults.
    pub fn from_values(docs_path: Option<String>, log_filter: Option<String>) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            docs_path: non_empty(docs_path)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_PATH)),
            log_filter: non_empty(log_filter).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    pub fn docs_path(&self) -> &Path {
        &self.docs_path
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = CliConfig::from_values(None, None);
        assert_eq!(config.docs_path(), Path::new("docs/api/proto.md"));
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = CliConfig::from_values(Some("   ".into()), Some(String::new()));
        assert_eq!(config, CliConfig::from_values(None, None));
    }

    #[test]
    fn test_values_are_trimmed() {
        let config = CliConfig::from_values(
            Some(" target/proto.md ".into()),
            Some("mcdf=debug".into()),
        );
        assert_eq!(config.docs_path(), Path::new("target/proto.md"));
        assert_eq!(config.log_filter(), "mcdf=debug");
    }
}
