//! In-memory credential mirrored into durable storage.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::entities::Credential;
use crate::domain::errors::StorageError;
use crate::domain::ports::DurableStoragePort;

/// Primary durable key for the credential.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Legacy durable key kept in sync for older pages.
pub const ID_TOKEN_KEY: &str = "idToken";

/// How the active credential is chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPolicy {
    /// Adopt the stored credential, seeding the development credential when
    /// none is stored or the stored one is a placeholder.
    SeedDevCredential,
    /// Start empty and ignore durable state until `set_token` is called.
    ManualLogin,
    /// Adopt whatever credential is stored, as saved by an earlier session.
    /// Nothing is written at startup.
    RestoreStored,
}

impl InitPolicy {
    /// Picks the policy from configuration flags. Seeding takes precedence
    /// over restoring; with neither set the store starts empty.
    #[must_use]
    pub const fn from_flags(seed_dev_credential: bool, restore_stored: bool) -> Self {
        if seed_dev_credential {
            Self::SeedDevCredential
        } else if restore_stored {
            Self::RestoreStored
        } else {
            Self::ManualLogin
        }
    }
}

/// Holds the active credential for the lifetime of the client.
pub struct TokenStore {
    current: RwLock<Credential>,
    storage: Arc<dyn DurableStoragePort>,
}

impl TokenStore {
    /// Creates the store and applies the initialization policy.
    ///
    /// Storage failures while seeding are logged; the chosen credential stays
    /// active in memory.
    #[must_use]
    pub fn initialize(storage: Arc<dyn DurableStoragePort>, policy: InitPolicy) -> Self {
        let initial = match policy {
            InitPolicy::ManualLogin => {
                debug!("Manual login policy, starting without credential");
                Credential::empty()
            }
            InitPolicy::SeedDevCredential => Self::seeded(storage.as_ref()),
            InitPolicy::RestoreStored => {
                let credential = Self::read_stored(storage.as_ref()).unwrap_or_default();
                debug!(credential = %credential, "Restored stored credential");
                credential
            }
        };

        Self {
            current: RwLock::new(initial),
            storage,
        }
    }

    fn seeded(storage: &dyn DurableStoragePort) -> Credential {
        let stored = Self::read_stored(storage);

        match stored {
            Some(credential) if !credential.is_empty() && !credential.is_placeholder() => {
                debug!(credential = %credential, "Using stored credential");
                credential
            }
            _ => {
                let credential = Credential::development();
                info!(credential = %credential, "Seeding development credential");
                if let Err(e) = Self::persist(storage, &credential) {
                    warn!(error = %e, "Failed to persist development credential");
                }
                credential
            }
        }
    }

    fn read_stored(storage: &dyn DurableStoragePort) -> Option<Credential> {
        for key in [AUTH_TOKEN_KEY, ID_TOKEN_KEY] {
            match storage.get_item(key) {
                Ok(Some(value)) if !value.is_empty() => return Some(Credential::new(value)),
                Ok(_) => debug!(key, "No credential stored under key"),
                Err(e) => warn!(key, error = %e, "Failed to read stored credential"),
            }
        }
        None
    }

    fn persist(storage: &dyn DurableStoragePort, credential: &Credential) -> Result<(), StorageError> {
        storage.set_item(AUTH_TOKEN_KEY, credential.as_str())?;
        storage.set_item(ID_TOKEN_KEY, credential.as_str())
    }

    /// Returns the active credential, empty when none is set.
    #[must_use]
    pub fn token(&self) -> Credential {
        self.current.read().clone()
    }

    /// Returns whether a non-empty credential is active.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.current.read().is_empty()
    }

    /// Replaces the active credential and writes it to both durable keys.
    ///
    /// The in-memory value is replaced even if the durable write fails.
    ///
    /// # Errors
    /// Returns error if durable storage rejects the write.
    pub fn set_token(&self, credential: impl Into<Credential>) -> Result<(), StorageError> {
        let credential = credential.into();
        debug!(credential = %credential, "Replacing credential");

        *self.current.write() = credential.clone();
        Self::persist(self.storage.as_ref(), &credential)
    }

    /// Forgets the credential in memory and in durable storage.
    ///
    /// # Errors
    /// Returns error if durable storage rejects the removal.
    pub fn clear_token(&self) -> Result<(), StorageError> {
        debug!("Clearing credential");

        *self.current.write() = Credential::empty();
        self.storage.remove_item(AUTH_TOKEN_KEY)?;
        self.storage.remove_item(ID_TOKEN_KEY)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("current", &*self.current.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockDurableStorage;
    use crate::infrastructure::FileStorage;
    use test_case::test_case;

    fn store_with(storage: &Arc<MockDurableStorage>, policy: InitPolicy) -> TokenStore {
        TokenStore::initialize(Arc::clone(storage) as Arc<dyn DurableStoragePort>, policy)
    }

    #[test]
    fn test_seed_when_storage_empty() {
        let storage = Arc::new(MockDurableStorage::new());
        let store = store_with(&storage, InitPolicy::SeedDevCredential);

        assert_eq!(store.token().as_str(), Credential::DEV_CREDENTIAL);
        assert_eq!(
            storage.item(AUTH_TOKEN_KEY).as_deref(),
            Some(Credential::DEV_CREDENTIAL)
        );
        assert_eq!(
            storage.item(ID_TOKEN_KEY).as_deref(),
            Some(Credential::DEV_CREDENTIAL)
        );
    }

    #[test]
    fn test_seed_replaces_placeholder() {
        let storage = Arc::new(MockDurableStorage::with_items(&[(
            AUTH_TOKEN_KEY,
            "dev_user:test@example.com",
        )]));
        let store = store_with(&storage, InitPolicy::SeedDevCredential);

        assert_eq!(store.token().as_str(), Credential::DEV_CREDENTIAL);
        assert_eq!(
            storage.item(ID_TOKEN_KEY).as_deref(),
            Some(Credential::DEV_CREDENTIAL)
        );
    }

    #[test]
    fn test_seed_keeps_real_credential() {
        let storage = Arc::new(MockDurableStorage::with_items(&[(AUTH_TOKEN_KEY, "issued-token")]));
        let store = store_with(&storage, InitPolicy::SeedDevCredential);

        assert_eq!(store.token().as_str(), "issued-token");
        assert_eq!(storage.item(ID_TOKEN_KEY), None);
    }

    #[test]
    fn test_seed_falls_back_to_legacy_key() {
        let storage = Arc::new(MockDurableStorage::with_items(&[(ID_TOKEN_KEY, "legacy-token")]));
        let store = store_with(&storage, InitPolicy::SeedDevCredential);

        assert_eq!(store.token().as_str(), "legacy-token");
    }

    #[test]
    fn test_seed_survives_storage_failure() {
        let storage = Arc::new(MockDurableStorage::failing());
        let store = store_with(&storage, InitPolicy::SeedDevCredential);

        assert_eq!(store.token().as_str(), Credential::DEV_CREDENTIAL);
    }

    #[test]
    fn test_manual_login_ignores_storage() {
        let storage = Arc::new(MockDurableStorage::with_items(&[(AUTH_TOKEN_KEY, "issued-token")]));
        let store = store_with(&storage, InitPolicy::ManualLogin);

        assert!(store.token().is_empty());
        assert!(!store.has_token());
        assert!(storage.reads.lock().is_empty());
    }

    #[test]
    fn test_restore_adopts_stored_credential() {
        let storage = Arc::new(MockDurableStorage::with_items(&[(ID_TOKEN_KEY, "legacy-token")]));
        let store = store_with(&storage, InitPolicy::RestoreStored);

        assert_eq!(store.token().as_str(), "legacy-token");
        assert_eq!(storage.item(AUTH_TOKEN_KEY), None);
    }

    #[test]
    fn test_restore_keeps_placeholder_and_empty_state() {
        let storage = Arc::new(MockDurableStorage::with_items(&[(
            AUTH_TOKEN_KEY,
            "dev_user:test@example.com",
        )]));
        let store = store_with(&storage, InitPolicy::RestoreStored);
        assert_eq!(store.token().as_str(), "dev_user:test@example.com");

        let empty = Arc::new(MockDurableStorage::new());
        let store = store_with(&empty, InitPolicy::RestoreStored);
        assert!(!store.has_token());
        assert_eq!(empty.item(AUTH_TOKEN_KEY), None);
    }

    #[test]
    fn test_credential_survives_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let open = || {
            Arc::new(FileStorage::open_in(dir.path(), "http://localhost:5000").unwrap())
                as Arc<dyn DurableStoragePort>
        };

        let first = TokenStore::initialize(open(), InitPolicy::RestoreStored);
        assert!(!first.has_token());
        first.set_token("abc123").unwrap();
        drop(first);

        let second = TokenStore::initialize(open(), InitPolicy::RestoreStored);
        assert_eq!(second.token().as_str(), "abc123");

        second.clear_token().unwrap();
        drop(second);

        let third = TokenStore::initialize(open(), InitPolicy::RestoreStored);
        assert!(!third.has_token());
    }

    #[test_case(false, false, InitPolicy::ManualLogin ; "neither flag")]
    #[test_case(false, true, InitPolicy::RestoreStored ; "restore only")]
    #[test_case(true, false, InitPolicy::SeedDevCredential ; "seed only")]
    #[test_case(true, true, InitPolicy::SeedDevCredential ; "seed wins")]
    fn test_policy_from_flags(seed: bool, restore: bool, expected: InitPolicy) {
        assert_eq!(InitPolicy::from_flags(seed, restore), expected);
    }

    #[test]
    fn test_set_token_round_trip() {
        for value in ["", "abc", "uid:someone@plannerx.local", "with spaces"] {
            let storage = Arc::new(MockDurableStorage::new());
            let store = store_with(&storage, InitPolicy::ManualLogin);

            store.set_token(value).unwrap();

            assert_eq!(store.token().as_str(), value);
            assert_eq!(storage.item(AUTH_TOKEN_KEY).as_deref(), Some(value));
            assert_eq!(storage.item(ID_TOKEN_KEY).as_deref(), Some(value));
        }
    }

    #[test]
    fn test_set_token_updates_memory_on_write_failure() {
        let storage = Arc::new(MockDurableStorage::failing());
        let store = store_with(&storage, InitPolicy::ManualLogin);

        let result = store.set_token("fresh");

        assert!(result.is_err());
        assert_eq!(store.token().as_str(), "fresh");
    }

    #[test]
    fn test_clear_token() {
        let storage = Arc::new(MockDurableStorage::new());
        let store = store_with(&storage, InitPolicy::SeedDevCredential);

        store.clear_token().unwrap();

        assert!(store.token().is_empty());
        assert_eq!(storage.item(AUTH_TOKEN_KEY), None);
        assert_eq!(storage.item(ID_TOKEN_KEY), None);
    }

    #[test]
    fn test_debug_masks_credential() {
        let storage = Arc::new(MockDurableStorage::new());
        let store = store_with(&storage, InitPolicy::SeedDevCredential);

        assert!(!format!("{store:?}").contains(Credential::DEV_CREDENTIAL));
    }
}
