//! Infrastructure layer with adapters for external services.

/// Application configuration.
pub mod config;
/// HTTP transport.
pub mod transport;
/// Durable storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, ConfigLoader, LogLevel, StorageBackend};
pub use transport::ReqwestTransport;
pub use storage::{FileStorage, KeyringStorage, MemoryStorage};
