//! Keyring-backed durable storage.

use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::DurableStoragePort;

const KEYRING_SERVICE: &str = "plannerx";

/// System keyring storage adapter.
///
/// Each key is a separate keyring entry under a service name scoped by origin.
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    /// Creates storage scoped to `origin`.
    #[must_use]
    pub fn new(origin: &str) -> Self {
        Self {
            service: format!("{KEYRING_SERVICE}:{origin}"),
        }
    }

    /// Creates storage with a custom service name.
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Entry::new(&self.service, key)
            .map_err(|e| StorageError::access(format!("failed to access keyring: {e}")))
    }
}

impl DurableStoragePort for KeyringStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        debug!(service = %self.service, key, "Reading item from keyring");

        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!(key, "No keyring entry");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, key, "Failed to read keyring entry");
                Err(StorageError::read(key, e.to_string()))
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        debug!(service = %self.service, key, "Writing item to keyring");

        self.entry(key)?.set_password(value).map_err(|e| {
            warn!(error = %e, key, "Failed to write keyring entry");
            StorageError::write(key, e.to_string())
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        debug!(service = %self.service, key, "Removing item from keyring");

        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(error = %e, key, "Failed to remove keyring entry");
                Err(StorageError::remove(key, e.to_string()))
            }
        }
    }
}
