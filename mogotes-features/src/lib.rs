//! Remote Feature Flags for Mogotes
//!
//! Flags are fetched per scope from `GET /v1/feature-flags` and cached for a
//! configurable TTL.
//!
//! # Features
//!
//! - **Fail Closed**: evaluation never errors; any failure reads as `false`
//! - **Per-Scope Cache**: one TTL entry per scope identifier
//! - **Scope Adapters**: implement [`FlagScope`] for your own user or team types
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mogotes_features::FeatureFlagsService;
//! use mogotes_http_client::{ClientConfig, MogotesClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MogotesClient::new(ClientConfig::builder().api_key("mk_live_123").build())?;
//!     let flags = FeatureFlagsService::new(client);
//!
//!     if flags.is_active("new-checkout", Some("user_42")).await {
//!         println!("new checkout enabled");
//!     }
//!     Ok(())
//! }
//! ```

mod cache;
mod flags;
mod scope;
mod service;

pub use cache::FlagCache;
pub use flags::FlagSet;
pub use scope::FlagScope;
pub use service::{DEFAULT_TTL_SECONDS, FEATURE_FLAGS_PATH, FeatureFlagsConfig, FeatureFlagsService};
