//! Application configuration.

/// Configuration file model.
pub mod app_config;
/// Command-line arguments.
pub mod args;
/// Configuration file loading.
pub mod loader;

pub use app_config::{AppConfig, LogLevel, NotificationsConfig, StorageBackend};
pub use args::{CliArgs, Command, TokenAction};
pub use loader::{ConfigError, ConfigLoader};
