//! Configuration for the inbound webhook endpoint

use crate::replay::DEFAULT_MAX_AGE_SECONDS;

/// Default path the endpoint answers on
pub const DEFAULT_WEBHOOK_PATH: &str = "/mogotes/webhook";

/// Configuration for the inbound webhook endpoint
#[derive(Clone)]
pub struct WebhookConfig {
    /// Whether the host should mount the endpoint at all
    pub register_route: bool,

    /// Path the endpoint answers on
    pub path: String,

    /// Shared signing secret
    pub secret: Option<String>,

    /// Allowed clock skew in seconds
    pub max_age_seconds: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            register_route: true,
            path: DEFAULT_WEBHOOK_PATH.to_string(),
            secret: None,
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
        }
    }
}

impl WebhookConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> WebhookConfigBuilder {
        WebhookConfigBuilder::new()
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("register_route", &self.register_route)
            .field("path", &self.path)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

/// Builder for WebhookConfig
#[derive(Debug, Clone, Default)]
pub struct WebhookConfigBuilder {
    config: WebhookConfig,
}

impl WebhookConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the endpoint is mounted
    pub fn register_route(mut self, register: bool) -> Self {
        self.config.register_route = register;
        self
    }

    /// Set the endpoint path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the signing secret
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.secret = Some(secret.into());
        self
    }

    /// Set the allowed clock skew
    pub fn max_age_seconds(mut self, seconds: u64) -> Self {
        self.config.max_age_seconds = seconds;
        self
    }

    /// Build the configuration
    pub fn build(self) -> WebhookConfig {
        self.config
    }
}
