//! Remote logs for Mogotes.
//!
//! ```rust,no_run
//! use mogotes_http_client::{ClientConfig, MogotesClient};
//! use mogotes_logs::{LogFilters, LogLevel, LogsService};
//! use serde_json::Map;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MogotesClient::new(ClientConfig::builder().api_key("mk_live_123").build())?;
//!     let logs = LogsService::new(client);
//!
//!     logs.error("Payment gateway timeout", Map::new()).await?;
//!
//!     let recent = logs
//!         .list(&LogFilters::new().level(LogLevel::Error).per_page(20))
//!         .await?;
//!     println!("{recent}");
//!     Ok(())
//! }
//! ```

mod filters;
mod level;
mod service;

pub use filters::LogFilters;
pub use level::LogLevel;
pub use service::{LOGS_PATH, LogsService};
