//! # Mogotes HTTP Client
//!
//! Authenticated access to the Mogotes REST API with a typed error taxonomy.
//!
//! ## Features
//!
//! - **Lazy credentials**: a client can be built before the API key is known;
//!   no request is ever sent without it
//! - **Header-only auth**: the API key travels in `X-Mogotes-Api-Key`, never in the URL
//! - **Timeout floors**: connect and total timeouts are clamped to at least one second
//! - **Error classification**: 401, 409, 429 and every other failure map to one [`ApiError`] variant
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mogotes_http_client::{ClientConfig, MogotesClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("https://api.mogotes.com")
//!         .api_key("mk_live_123")
//!         .build();
//!
//!     let client = MogotesClient::new(config)?;
//!
//!     let response = client
//!         .get("/v1/logs")?
//!         .query("level", "error")
//!         .send()
//!         .await?
//!         .into_result(None)?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```

mod classify;
mod client;
mod config;
mod error;
mod request;
mod response;

pub use classify::{classify, DEFAULT_RETRY_AFTER_SECONDS};
pub use client::MogotesClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{ApiError, ConfigurationError, Result};
pub use request::ApiRequest;
pub use response::ApiResponse;

// Re-export common types
pub use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
pub use url::Url;

/// Header carrying the Mogotes API key.
pub const API_KEY_HEADER: &str = "X-Mogotes-Api-Key";

/// Response header echoing the request that a conflicting call collided with.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// Prelude for common imports.
///
/// ```
/// use mogotes_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::MogotesClient;
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::error::{ApiError, ConfigurationError, Result};
    pub use crate::request::ApiRequest;
    pub use crate::response::ApiResponse;
    pub use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
}
