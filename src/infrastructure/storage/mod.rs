//! Durable storage adapters.

mod file_storage;
mod keyring_storage;
mod memory_storage;

pub use file_storage::FileStorage;
pub use keyring_storage::KeyringStorage;
pub use memory_storage::MemoryStorage;
