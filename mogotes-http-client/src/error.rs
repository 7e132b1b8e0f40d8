//! Mogotes client error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for Mogotes API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Client configuration errors.
///
/// These are raised before any network I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No API key was configured, or it is empty.
    #[error("Mogotes API key is not configured. Set MOGOTES_API_KEY or provide it in the client config")]
    MissingApiKey,

    /// The API key cannot be sent as an HTTP header value.
    #[error("Mogotes API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,

    /// The base URL is not an absolute http/https URL.
    #[error("Invalid Mogotes server URL: '{0}'. Set MOGOTES_SERVER_URL to an absolute http or https URL")]
    InvalidBaseUrl(String),

    /// The underlying transport could not be initialized.
    #[error("Failed to initialize HTTP transport: {0}")]
    Transport(String),
}

/// Errors returned by Mogotes API calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The client is misconfigured; nothing was sent.
    #[error(transparent)]
    Misconfigured(#[from] ConfigurationError),

    /// The API rejected the credentials (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Server-provided or default message.
        message: String,
    },

    /// The idempotency key was already used with a different payload (HTTP 409).
    #[error("Idempotency conflict: {message}")]
    IdempotencyConflict {
        /// Server-provided or default message.
        message: String,
        /// Key sent with the conflicting request.
        idempotency_key: Option<String>,
        /// Value of the `X-Correlation-Id` response header.
        correlation_id: Option<String>,
    },

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limit exceeded: {message} (retry after {retry_after_seconds}s)")]
    RateLimited {
        /// Server-provided or default message.
        message: String,
        /// Seconds to wait before retrying, at least 1.
        retry_after_seconds: u64,
    },

    /// Any other failed response.
    #[error("Mogotes API error {http_status}: {message}")]
    Generic {
        /// Server-provided or status-derived message.
        message: String,
        /// `error.code` from the response body, when present.
        code: Option<String>,
        /// HTTP status code.
        http_status: u16,
    },

    /// No usable response: connect failure, timeout, DNS, unreadable body.
    #[error("Could not reach Mogotes: {message}")]
    ConnectionFailure {
        /// Underlying cause.
        message: String,
    },

    /// A JSON body could not be encoded or decoded.
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Wrap a transport error.
    pub(crate) fn connection(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Mogotes did not respond within the time limit: {err}")
        } else {
            err.to_string()
        };
        Self::ConnectionFailure { message }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Misconfigured(_) => Some("misconfigured"),
            Self::Unauthorized { .. } => Some("unauthorized"),
            Self::IdempotencyConflict { .. } => Some("idempotency_conflict"),
            Self::RateLimited { .. } => Some("rate_limit_exceeded"),
            Self::Generic { code, .. } => code.as_deref(),
            Self::ConnectionFailure { .. } => Some("connection_failure"),
            Self::InvalidBody(_) => Some("invalid_body"),
        }
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::IdempotencyConflict { .. } => Some(409),
            Self::RateLimited { .. } => Some(429),
            Self::Generic { http_status, .. } => Some(*http_status),
            Self::Misconfigured(_) | Self::ConnectionFailure { .. } | Self::InvalidBody(_) => None,
        }
    }

    /// Suggested wait before retrying a rate-limited call.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after_seconds,
                ..
            } => Some(Duration::from_secs(*retry_after_seconds)),
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the same call.
    ///
    /// Nothing in this crate retries; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::ConnectionFailure { .. } => true,
            Self::Generic { http_status, .. } => *http_status >= 500,
            _ => false,
        }
    }

    /// Check if this is a configuration error.
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }
}
