//! Domain error types.

mod client_error;
mod storage_error;

pub use client_error::ClientError;
pub use storage_error::StorageError;
