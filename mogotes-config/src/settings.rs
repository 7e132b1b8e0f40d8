// Mogotes SDK settings

use crate::env::EnvLoader;
use crate::loader::ConfigLoader;
use crate::{ConfigError, Result};
use mogotes_features::FeatureFlagsConfig;
use mogotes_http_client::ClientConfig;
use mogotes_webhooks::WebhookConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Settings for the whole SDK.
///
/// Every field has a default, so partial files and sparse environments are
/// fine. The API key and webhook secret stay optional here; their absence
/// is reported by the component that needs them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MogotesSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: i64,
    pub connect_timeout_seconds: i64,
    pub user_agent: String,
    pub default_headers: BTreeMap<String, String>,
    pub webhooks: WebhookSettings,
    pub feature_flags: FeatureFlagSettings,
}

/// Inbound webhook settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub register_route: bool,
    pub path: String,
    pub secret: Option<String>,
    pub max_age_seconds: u64,
}

/// Feature flag cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlagSettings {
    pub ttl_seconds: u64,
    pub cache_enabled: bool,
}

impl Default for MogotesSettings {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            base_url: client.base_url,
            api_key: None,
            timeout_seconds: client.timeout_seconds,
            connect_timeout_seconds: client.connect_timeout_seconds,
            user_agent: client.user_agent,
            default_headers: BTreeMap::new(),
            webhooks: WebhookSettings::default(),
            feature_flags: FeatureFlagSettings::default(),
        }
    }
}

impl Default for WebhookSettings {
    fn default() -> Self {
        let config = WebhookConfig::default();
        Self {
            register_route: config.register_route,
            path: config.path,
            secret: None,
            max_age_seconds: config.max_age_seconds,
        }
    }
}

impl Default for FeatureFlagSettings {
    fn default() -> Self {
        let config = FeatureFlagsConfig::default();
        Self {
            ttl_seconds: config.ttl_seconds,
            cache_enabled: config.cache_enabled,
        }
    }
}

impl MogotesSettings {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_loader(&EnvLoader::from_process()?)
    }

    /// Defaults overlaid with a `.env` file and then the process environment
    pub fn from_dotenv(path: Option<&Path>) -> Result<Self> {
        Self::from_loader(&EnvLoader::from_dotenv(path)?)
    }

    /// Defaults overlaid with explicit `MOGOTES_*` pairs
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_loader(&EnvLoader::from_vars(vars))
    }

    /// Load a TOML or JSON file, format chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let value = ConfigLoader::auto(path)?.load_file(path)?;
        let settings = serde_json::from_value(value)
            .map_err(|e| ConfigError::DeserializationError(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Loaded Mogotes settings file");
        Ok(settings)
    }

    /// Overlay the process environment on these settings
    pub fn with_env_overrides(mut self) -> Result<Self> {
        self.apply_env(&EnvLoader::from_process()?)?;
        Ok(self)
    }

    /// Overlay every variable present in `env`
    pub fn apply_env(&mut self, env: &EnvLoader) -> Result<()> {
        if let Some(url) = env.get_non_empty("MOGOTES_SERVER_URL") {
            self.base_url = url.to_string();
        }
        if let Some(key) = env.get("MOGOTES_API_KEY") {
            self.api_key = non_blank(key);
        }
        if let Some(seconds) = env.get_i64("MOGOTES_TIMEOUT_SECONDS")? {
            self.timeout_seconds = seconds;
        }
        if let Some(seconds) = env.get_i64("MOGOTES_CONNECT_TIMEOUT_SECONDS")? {
            self.connect_timeout_seconds = seconds;
        }
        if let Some(agent) = env.get_non_empty("MOGOTES_USER_AGENT") {
            self.user_agent = agent.to_string();
        }

        if let Some(register) = env.get_bool("MOGOTES_WEBHOOK_REGISTER_ROUTE")? {
            self.webhooks.register_route = register;
        }
        if let Some(path) = env.get_non_empty("MOGOTES_WEBHOOK_PATH") {
            self.webhooks.path = path.to_string();
        }
        if let Some(secret) = env.get("MOGOTES_WEBHOOK_SECRET") {
            self.webhooks.secret = non_blank(secret);
        }
        if let Some(seconds) = env.get_u64("MOGOTES_WEBHOOK_MAX_AGE_SECONDS")? {
            self.webhooks.max_age_seconds = seconds;
        }

        if let Some(seconds) = env.get_u64("MOGOTES_FEATURE_FLAGS_TTL_SECONDS")? {
            self.feature_flags.ttl_seconds = seconds;
        }
        if let Some(enabled) = env.get_bool("MOGOTES_FEATURE_FLAGS_CACHE_ENABLED")? {
            self.feature_flags.cache_enabled = enabled;
        }

        Ok(())
    }

    /// Client configuration for the request client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_seconds: self.timeout_seconds,
            connect_timeout_seconds: self.connect_timeout_seconds,
            user_agent: self.user_agent.clone(),
            default_headers: self
                .default_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }

    /// Configuration for the inbound webhook endpoint
    pub fn webhook_config(&self) -> WebhookConfig {
        WebhookConfig {
            register_route: self.webhooks.register_route,
            path: self.webhooks.path.clone(),
            secret: self.webhooks.secret.clone(),
            max_age_seconds: self.webhooks.max_age_seconds,
        }
    }

    /// Configuration for feature flag evaluation
    pub fn feature_flags_config(&self) -> FeatureFlagsConfig {
        FeatureFlagsConfig {
            ttl_seconds: self.feature_flags.ttl_seconds,
            cache_enabled: self.feature_flags.cache_enabled,
        }
    }

    fn from_loader(env: &EnvLoader) -> Result<Self> {
        let mut settings = Self::default();
        settings.apply_env(env)?;
        debug!(variables = env.len(), "Loaded Mogotes settings from environment");
        Ok(settings)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl std::fmt::Debug for MogotesSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MogotesSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("user_agent", &self.user_agent)
            .field("default_headers", &self.default_headers)
            .field("webhooks", &self.webhooks)
            .field("feature_flags", &self.feature_flags)
            .finish()
    }
}

impl std::fmt::Debug for WebhookSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSettings")
            .field("register_route", &self.register_route)
            .field("path", &self.path)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}
