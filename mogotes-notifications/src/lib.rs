//! Idempotent template notifications for Mogotes.
//!
//! ```rust,no_run
//! use mogotes_http_client::{ClientConfig, MogotesClient};
//! use mogotes_notifications::{NotificationRequest, NotificationSender};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MogotesClient::new(ClientConfig::builder().api_key("mk_live_123").build())?;
//!     let sender = NotificationSender::new(client);
//!
//!     let response = sender
//!         .send(
//!             NotificationRequest::email("welcome", "ana@example.com")
//!                 .with("name", "Ana")
//!                 .idempotency_key("signup-42"),
//!         )
//!         .await?;
//!
//!     println!("{response}");
//!     Ok(())
//! }
//! ```

mod message;
mod request;
mod sender;

pub use message::{Notifiable, NotificationMessage};
pub use request::{Channel, NotificationRequest};
pub use sender::{NOTIFICATIONS_PATH, NotificationSender};
