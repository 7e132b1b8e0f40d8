//! Mogotes client implementation.

use http::Method;
use reqwest::Request;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::{ApiError, ApiRequest, ApiResponse, ClientConfig, ConfigurationError, Result};

/// Authenticated client for the Mogotes API.
///
/// Cheap to clone; clones share the transport and the immutable configuration.
#[derive(Clone)]
pub struct MogotesClient {
    inner: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl MogotesClient {
    /// Create a new client, validating the base URL.
    ///
    /// The API key is not checked here so a client can be wired up before
    /// secrets are available.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigurationError> {
        validate_base_url(&config.base_url)?;

        let inner = reqwest::Client::builder()
            .timeout(config.effective_timeout())
            .connect_timeout(config.effective_connect_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ConfigurationError::Transport(e.to_string()))?;

        debug!(
            base_url = %config.base_url,
            timeout_secs = config.effective_timeout().as_secs(),
            connect_timeout_secs = config.effective_connect_timeout().as_secs(),
            "Mogotes client created"
        );

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request against a path relative to the base URL.
    ///
    /// Fails before any network I/O if the API key is absent or empty.
    pub fn build_request(&self, method: Method, path: impl Into<String>) -> Result<ApiRequest<'_>> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ConfigurationError::MissingApiKey.into()),
        };

        ApiRequest::new(self, method, path.into(), api_key)
    }

    /// Create a GET request builder.
    pub fn get(&self, path: impl Into<String>) -> Result<ApiRequest<'_>> {
        self.build_request(Method::GET, path)
    }

    /// Create a POST request builder.
    pub fn post(&self, path: impl Into<String>) -> Result<ApiRequest<'_>> {
        self.build_request(Method::POST, path)
    }

    /// Resolve a path against the base URL.
    ///
    /// The base path is preserved, so `https://host/api` + `/v1/logs`
    /// becomes `https://host/api/v1/logs`.
    pub(crate) fn url_for(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|_| ConfigurationError::InvalidBaseUrl(self.config.base_url.clone()).into())
    }

    /// Execute a request once.
    pub(crate) async fn execute(&self, request: Request) -> Result<ApiResponse> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.inner.execute(request).await.map_err(|e| {
            warn!(%method, %path, error = %e, "Mogotes request failed before a response arrived");
            ApiError::connection(&e)
        })?;

        let response = ApiResponse::from_reqwest(response).await?;
        debug!(%method, %path, status = %response.status(), "Mogotes response received");
        Ok(response)
    }
}

impl std::fmt::Debug for MogotesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MogotesClient")
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.config.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn validate_base_url(base_url: &str) -> std::result::Result<(), ConfigurationError> {
    let invalid = || ConfigurationError::InvalidBaseUrl(base_url.to_string());

    let url = Url::parse(base_url).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(invalid());
    }
    Ok(())
}
