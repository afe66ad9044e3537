//! API client configuration.
//!
//! The base URL is the single externally tunable value of this layer.
//! Configuration values should be provided by the application, not
//! hardcoded.

/// Environment variable consulted by [`ApiConfig::from_env`].
pub const BASE_URL_ENV: &str = "LECTERN_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// HTTP adapter configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the remote API (e.g. `https://api.example.com`).
    ///
    /// Paths are appended verbatim, so the trailing slash is stripped.
    pub base_url: String,
}

impl ApiConfig {
    /// Create a configuration for the given API origin.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read the base URL from the `LECTERN_API_URL` environment variable,
    /// falling back to `http://localhost:3000` for local development.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = ApiConfig::new("https://api.example.com/");
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn test_default_is_localhost() {
        assert_eq!(ApiConfig::default().base_url, "http://localhost:3000");
    }
}
