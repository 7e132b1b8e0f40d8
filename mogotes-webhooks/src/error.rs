//! Error types for inbound webhook verification

use http::StatusCode;
use thiserror::Error;

/// Reasons an inbound webhook is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The `Mogotes-Signature` header is absent
    #[error("The webhook does not carry the required Mogotes-Signature header")]
    MissingSignature,

    /// The `Mogotes-Timestamp` header is absent
    #[error("The webhook does not carry the required Mogotes-Timestamp header")]
    MissingTimestamp,

    /// The `Mogotes-Timestamp` header is not a decimal integer
    #[error("The webhook timestamp '{0}' is not a unix timestamp")]
    MalformedTimestamp(String),

    /// The timestamp is further than the allowed skew from the local clock
    #[error(
        "The webhook timestamp ({timestamp}) is outside the allowed window of {max_age_seconds} seconds"
    )]
    TimestampOutOfWindow { timestamp: i64, max_age_seconds: u64 },

    /// The signature does not match the body
    #[error("The webhook signature does not match the expected value")]
    SignatureMismatch,

    /// The verified body is not a JSON object
    #[error("The webhook body is not a JSON object: {0}")]
    InvalidPayload(String),

    /// No signing secret is configured
    #[error("No webhook secret is configured. Set MOGOTES_WEBHOOK_SECRET")]
    SecretNotConfigured,
}

impl WebhookError {
    /// Code reported to the sender in the rejection body
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid_payload",
            Self::SecretNotConfigured => "misconfigured",
            _ => "invalid_signature",
        }
    }

    /// Internal reason, for logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingSignature => "missing_signature",
            Self::MissingTimestamp => "missing_timestamp",
            Self::MalformedTimestamp(_) => "malformed_timestamp",
            Self::TimestampOutOfWindow { .. } => "timestamp_out_of_window",
            Self::SignatureMismatch => "signature_mismatch",
            Self::InvalidPayload(_) => "invalid_payload",
            Self::SecretNotConfigured => "secret_not_configured",
        }
    }

    /// HTTP status used when answering the sender
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::SecretNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::FORBIDDEN,
        }
    }
}
