//! API endpoint configuration shared by every host.

use thiserror::Error;

/// Backend used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Storage key holding the bearer token in browser storage.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Invalid API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Base URL was blank.
    #[error("API base URL must not be empty")]
    EmptyBaseUrl,
    /// Base URL did not use http(s).
    #[error("API base URL '{value}' must start with http:// or https://")]
    UnsupportedScheme {
        /// Offending value.
        value: String,
    },
}

/// Base URL of the REST API plus endpoint joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Validate and normalise a base URL (trailing slashes are dropped).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is blank or not http(s).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let lower = trimmed.to_ascii_lowercase();
        if !lower.starts_with("http://") && !lower.starts_with("https://") {
            return Err(ConfigError::UnsupportedScheme {
                value: trimmed.to_string(),
            });
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Configured base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/auth/me`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ApiConfig::new("https://api.example.test/").expect("valid config");
        assert_eq!(config.endpoint("/auth/me"), "https://api.example.test/auth/me");
        assert_eq!(config.endpoint("shows/3"), "https://api.example.test/shows/3");
    }

    #[test]
    fn rejects_blank_and_non_http_urls() {
        assert_eq!(ApiConfig::new("  "), Err(ConfigError::EmptyBaseUrl));
        assert!(matches!(
            ApiConfig::new("ftp://example.test"),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(ApiConfig::default().base_url(), DEFAULT_API_URL);
    }
}
