// Settings loading for the Mogotes SDK
//
// Sources, lowest precedence first: built-in defaults, a TOML or JSON file,
// a `.env` file, the process environment.

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;

pub use env::{ENV_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{FeatureFlagSettings, MogotesSettings, WebhookSettings};
