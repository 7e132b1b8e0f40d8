//! Inbound webhook verification for Mogotes
//!
//! Mogotes signs every webhook it delivers with HMAC-SHA256 over
//! `"{timestamp}.{raw_body}"` and sends the hex digest in `Mogotes-Signature`
//! along with the unix timestamp in `Mogotes-Timestamp`.
//!
//! # Features
//!
//! - **Signature Verification**: HMAC-SHA256 signing and constant-time verification
//! - **Replay Protection**: symmetric timestamp window, 300 seconds by default
//! - **Observer Handlers**: register closures that run for every verified event
//! - **Framework Neutral**: the endpoint speaks `http::Request` / `http::Response`
//!
//! # Example: Receiving Webhooks
//!
//! ```rust,no_run
//! use mogotes_webhooks::{WebhookEvent, WebhookReceiver};
//!
//! let mut receiver = WebhookReceiver::new("whsec_...");
//! receiver.on(|event: &WebhookEvent| {
//!     println!("received {:?}", event.event_type());
//! });
//!
//! # let headers = http::HeaderMap::new();
//! # let body = bytes::Bytes::new();
//! match receiver.receive(&headers, body) {
//!     Ok(event) => println!("accepted at {}", event.timestamp()),
//!     Err(err) => println!("rejected: {}", err.reason()),
//! }
//! ```
//!
//! # Example: Mounting the Endpoint
//!
//! ```rust,no_run
//! use mogotes_webhooks::{WebhookConfig, WebhookEndpoint};
//!
//! let config = WebhookConfig::builder().secret("whsec_...").build();
//!
//! if let Some(endpoint) = WebhookEndpoint::from_config(&config).unwrap() {
//!     # let request = http::Request::new(bytes::Bytes::new());
//!     let response = endpoint.handle(request);
//!     println!("{}", response.status());
//! }
//! ```

mod config;
mod endpoint;
mod error;
mod event;
mod receiver;
mod replay;
mod signature;

pub use config::{DEFAULT_WEBHOOK_PATH, WebhookConfig, WebhookConfigBuilder};
pub use endpoint::{SUCCESS_MESSAGE, WebhookEndpoint};
pub use error::WebhookError;
pub use event::WebhookEvent;
pub use receiver::{SignedWebhookRequest, WebhookHandler, WebhookReceiver};
pub use replay::{DEFAULT_MAX_AGE_SECONDS, ReplayWindow, check_window};
pub use signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER, WebhookSignature, sign, verify};

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::WebhookError;
    pub use crate::event::WebhookEvent;
    pub use crate::receiver::{WebhookHandler, WebhookReceiver};
    pub use crate::signature::WebhookSignature;
    pub use crate::endpoint::WebhookEndpoint;
}
