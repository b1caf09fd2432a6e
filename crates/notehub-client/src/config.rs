//! Client configuration.

use notehub_core::defaults;

/// Configuration for [`crate::NotehubClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the notes API (no trailing slash required).
    pub base_url: String,
    /// Bearer token. A missing token is reported on the first request.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Notes per list page.
    pub per_page: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            token: None,
            timeout_seconds: defaults::TIMEOUT_SECS,
            per_page: defaults::PER_PAGE,
        }
    }
}

impl ClientConfig {
    /// Read configuration from the environment.
    ///
    /// - `NOTEHUB_TOKEN` (optional here, required by every request)
    /// - `NOTEHUB_BASE_URL` (default: the public notehub API)
    /// - `NOTEHUB_TIMEOUT_SECS` (default: 30)
    /// - `NOTEHUB_PER_PAGE` (default: 12)
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(defaults::ENV_BASE_URL)
                .unwrap_or_else(|_| defaults::BASE_URL.to_string()),
            token: std::env::var(defaults::ENV_TOKEN)
                .ok()
                .filter(|t| !t.trim().is_empty()),
            timeout_seconds: std::env::var(defaults::ENV_TIMEOUT_SECS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::TIMEOUT_SECS),
            per_page: std::env::var(defaults::ENV_PER_PAGE)
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults::PER_PAGE),
        }
    }

    /// Builder-style token setter.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builder-style base URL setter.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
