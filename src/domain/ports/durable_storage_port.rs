//! Durable key-value storage port definition.

use crate::domain::errors::StorageError;

/// Port for per-origin string storage that survives restarts.
pub trait DurableStoragePort: Send + Sync {
    /// Reads the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Mock storage that can be told to fail writes.
    #[derive(Default)]
    pub struct MockDurableStorage {
        pub items: Mutex<HashMap<String, String>>,
        pub fail_writes: bool,
        pub reads: Mutex<Vec<String>>,
    }

    impl MockDurableStorage {
        /// Creates empty mock storage.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates mock storage with entries.
        pub fn with_items(items: &[(&str, &str)]) -> Self {
            let storage = Self::default();
            storage.items.lock().extend(
                items
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
            );
            storage
        }

        /// Creates mock storage whose writes always fail.
        pub fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        pub fn item(&self, key: &str) -> Option<String> {
            self.items.lock().get(key).cloned()
        }
    }

    impl DurableStoragePort for MockDurableStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.reads.lock().push(key.to_string());
            Ok(self.items.lock().get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::write(key, "mock failure"));
            }
            self.items.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.items.lock().remove(key);
            Ok(())
        }
    }
}
