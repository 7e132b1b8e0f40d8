// Mogotes - Rust SDK for the Mogotes platform
//
// This library bundles the Mogotes client crates behind one entry point:
// signed inbound webhooks, idempotent notifications, remote logs and
// feature flags, all sharing a single authenticated HTTP client.

#[cfg(feature = "config")]
use tracing::info;

// Re-export the request client, which every service builds on
pub use mogotes_http_client::{
    API_KEY_HEADER, ApiError, ApiRequest, ApiResponse, ClientConfig, ClientConfigBuilder,
    ConfigurationError, MogotesClient,
};

// Re-export optional crates
#[cfg(feature = "webhooks")]
pub use mogotes_webhooks;

#[cfg(feature = "notifications")]
pub use mogotes_notifications;

#[cfg(feature = "logs")]
pub use mogotes_logs;

#[cfg(feature = "feature-flags")]
pub use mogotes_features;

#[cfg(feature = "config")]
pub use mogotes_config;

pub use mogotes_http_client;

#[cfg(feature = "feature-flags")]
use mogotes_features::{FeatureFlagsConfig, FeatureFlagsService};
#[cfg(feature = "logs")]
use mogotes_logs::LogsService;
#[cfg(feature = "notifications")]
use mogotes_notifications::NotificationSender;
#[cfg(feature = "webhooks")]
use mogotes_webhooks::{WebhookConfig, WebhookEndpoint};

/// Errors raised while assembling the SDK
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[cfg(feature = "config")]
    #[error(transparent)]
    Settings(#[from] mogotes_config::ConfigError),

    #[cfg(feature = "webhooks")]
    #[error(transparent)]
    Webhook(#[from] mogotes_webhooks::WebhookError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Entry point bundling every enabled Mogotes service.
///
/// All services share one [`MogotesClient`]; cloning is cheap.
#[derive(Debug, Clone)]
pub struct Mogotes {
    client: MogotesClient,
    #[cfg(feature = "notifications")]
    notifications: NotificationSender,
    #[cfg(feature = "logs")]
    logs: LogsService,
    #[cfg(feature = "feature-flags")]
    feature_flags: FeatureFlagsService,
    #[cfg(feature = "webhooks")]
    webhooks: WebhookConfig,
}

impl Mogotes {
    /// Build the SDK from a client configuration, with default service settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_client(MogotesClient::new(config)?))
    }

    /// Build the SDK around an existing client
    pub fn from_client(client: MogotesClient) -> Self {
        Self {
            #[cfg(feature = "notifications")]
            notifications: NotificationSender::new(client.clone()),
            #[cfg(feature = "logs")]
            logs: LogsService::new(client.clone()),
            #[cfg(feature = "feature-flags")]
            feature_flags: FeatureFlagsService::new(client.clone()),
            #[cfg(feature = "webhooks")]
            webhooks: WebhookConfig::default(),
            client,
        }
    }

    /// Build the SDK from loaded settings
    #[cfg(feature = "config")]
    pub fn from_settings(settings: &mogotes_config::MogotesSettings) -> Result<Self> {
        let client = MogotesClient::new(settings.client_config())?;
        info!(
            base_url = %settings.base_url,
            api_key_configured = settings.api_key.is_some(),
            webhook_secret_configured = settings.webhooks.secret.is_some(),
            "Mogotes SDK configured"
        );

        Ok(Self::from_client(client)
            .with_feature_flags_config(settings.feature_flags_config())
            .with_webhook_config(settings.webhook_config()))
    }

    /// Build the SDK from `MOGOTES_*` environment variables
    #[cfg(feature = "config")]
    pub fn from_env() -> Result<Self> {
        Self::from_settings(&mogotes_config::MogotesSettings::from_env()?)
    }

    /// Build the SDK from a `.env` file overlaid with the process environment
    #[cfg(feature = "config")]
    pub fn from_dotenv(path: Option<&std::path::Path>) -> Result<Self> {
        Self::from_settings(&mogotes_config::MogotesSettings::from_dotenv(path)?)
    }

    /// Replace the feature flag cache settings
    #[cfg(feature = "feature-flags")]
    pub fn with_feature_flags_config(mut self, config: FeatureFlagsConfig) -> Self {
        self.feature_flags = FeatureFlagsService::with_config(self.client.clone(), config);
        self
    }

    /// Replace the inbound webhook settings
    #[cfg(feature = "webhooks")]
    pub fn with_webhook_config(mut self, config: WebhookConfig) -> Self {
        self.webhooks = config;
        self
    }

    /// Shared request client
    pub fn client(&self) -> &MogotesClient {
        &self.client
    }

    /// Notification sender
    #[cfg(feature = "notifications")]
    pub fn notifications(&self) -> &NotificationSender {
        &self.notifications
    }

    /// Remote logs service
    #[cfg(feature = "logs")]
    pub fn logs(&self) -> &LogsService {
        &self.logs
    }

    /// Feature flags service
    #[cfg(feature = "feature-flags")]
    pub fn feature_flags(&self) -> &FeatureFlagsService {
        &self.feature_flags
    }

    /// Inbound webhook settings
    #[cfg(feature = "webhooks")]
    pub fn webhook_config(&self) -> &WebhookConfig {
        &self.webhooks
    }

    /// Inbound webhook endpoint, or `None` when route registration is off.
    ///
    /// Fails when no webhook secret is configured.
    #[cfg(feature = "webhooks")]
    pub fn webhook_endpoint(&self) -> Result<Option<WebhookEndpoint>> {
        Ok(WebhookEndpoint::from_config(&self.webhooks)?)
    }
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{ApiError, ClientConfig, Error, Mogotes, MogotesClient};

    #[cfg(feature = "webhooks")]
    pub use mogotes_webhooks::prelude::*;

    #[cfg(feature = "notifications")]
    pub use mogotes_notifications::{Channel, Notifiable, NotificationMessage, NotificationRequest};

    #[cfg(feature = "logs")]
    pub use mogotes_logs::{LogFilters, LogLevel};

    #[cfg(feature = "feature-flags")]
    pub use mogotes_features::FlagScope;

    #[cfg(feature = "config")]
    pub use mogotes_config::MogotesSettings;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shares_one_client() {
        let config = ClientConfig::builder().api_key("mk_test_1").build();
        let sdk = Mogotes::new(config).unwrap();
        assert_eq!(sdk.client().config().api_key.as_deref(), Some("mk_test_1"));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::builder().base_url("not a url").build();
        assert!(matches!(Mogotes::new(config), Err(Error::Configuration(_))));
    }

    #[cfg(feature = "webhooks")]
    #[test]
    fn test_webhook_endpoint_requires_secret() {
        let sdk = Mogotes::new(ClientConfig::default()).unwrap();
        assert!(matches!(
            sdk.webhook_endpoint(),
            Err(Error::Webhook(mogotes_webhooks::WebhookError::SecretNotConfigured))
        ));

        let sdk = sdk.with_webhook_config(
            WebhookConfig::builder().secret("whsec_1").path("/hooks").build(),
        );
        let endpoint = sdk.webhook_endpoint().unwrap().unwrap();
        assert_eq!(endpoint.path(), "/hooks");

        let sdk = sdk.with_webhook_config(WebhookConfig::builder().register_route(false).build());
        assert!(sdk.webhook_endpoint().unwrap().is_none());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_settings() {
        let settings = mogotes_config::MogotesSettings::from_vars([
            ("MOGOTES_API_KEY", "mk_test_2"),
            ("MOGOTES_WEBHOOK_SECRET", "whsec_2"),
            ("MOGOTES_FEATURE_FLAGS_CACHE_ENABLED", "false"),
        ])
        .unwrap();

        let sdk = Mogotes::from_settings(&settings).unwrap();
        assert_eq!(sdk.client().config().api_key.as_deref(), Some("mk_test_2"));
        assert_eq!(sdk.webhook_config().secret.as_deref(), Some("whsec_2"));
        assert!(sdk.feature_flags().cache().is_none());
    }
}
