//! Mogotes client configuration.

use std::time::Duration;

/// Default Mogotes API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.mogotes.com";

/// Mogotes client configuration.
///
/// Timeouts are kept as signed seconds exactly as configured; the client
/// normalizes them when it builds the transport.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL for all requests.
    pub base_url: String,
    /// API key sent in `X-Mogotes-Api-Key`. Checked when a request is built.
    pub api_key: Option<String>,
    /// Total request timeout, in seconds.
    pub timeout_seconds: i64,
    /// Connection timeout, in seconds.
    pub connect_timeout_seconds: i64,
    /// User agent string.
    pub user_agent: String,
    /// Extra headers for all requests. The API key and user agent override these.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
            user_agent: format!("mogotes-rs/{}", env!("CARGO_PKG_VERSION")),
            default_headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Total timeout, floored at one second.
    pub fn effective_timeout(&self) -> Duration {
        normalize_seconds(self.timeout_seconds)
    }

    /// Connect timeout, floored at one second.
    pub fn effective_connect_timeout(&self) -> Duration {
        normalize_seconds(self.connect_timeout_seconds)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("user_agent", &self.user_agent)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

fn normalize_seconds(seconds: i64) -> Duration {
    Duration::from_secs(seconds.max(1) as u64)
}

/// Builder for the Mogotes client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL for all requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set or clear the API key.
    pub fn maybe_api_key(mut self, key: Option<String>) -> Self {
        self.config.api_key = key;
        self
    }

    /// Set the total request timeout in seconds.
    pub fn timeout_seconds(mut self, seconds: i64) -> Self {
        self.config.timeout_seconds = seconds;
        self
    }

    /// Set the connection timeout in seconds.
    pub fn connect_timeout_seconds(mut self, seconds: i64) -> Self {
        self.config.connect_timeout_seconds = seconds;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a default header for all requests.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert!(config.user_agent.starts_with("mogotes-rs/"));
    }

    #[test]
    fn test_timeouts_floor_at_one_second() {
        let config = ClientConfig::builder()
            .timeout_seconds(0)
            .connect_timeout_seconds(-5)
            .build();

        assert_eq!(config.effective_timeout(), Duration::from_secs(1));
        assert_eq!(config.effective_connect_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_positive_timeouts_kept() {
        let config = ClientConfig::builder()
            .timeout_seconds(30)
            .connect_timeout_seconds(3)
            .build();

        assert_eq!(config.effective_timeout(), Duration::from_secs(30));
        assert_eq!(config.effective_connect_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_builder_headers() {
        let config = ClientConfig::builder()
            .default_header("X-Tenant", "acme")
            .default_header("X-Trace", "1")
            .build();

        assert_eq!(config.default_headers.len(), 2);
        assert_eq!(config.default_headers[0].0, "X-Tenant");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::builder().api_key("mk_live_secret").build();
        assert!(!format!("{config:?}").contains("mk_live_secret"));
    }
}
