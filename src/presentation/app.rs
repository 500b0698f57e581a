//! Composition root handed to the rest of the application.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::info;
use url::Url;

use super::ui::ModalLayer;
use crate::application::services::{
    self, ApiClient, FormMap, InitPolicy, NotificationCenter, TokenStore,
};
use crate::domain::errors::StorageError;
use crate::domain::ports::{DurableStoragePort, HttpTransportPort, NotificationSink};
use crate::domain::services::AuthVariant;
use crate::domain::{Credential, NotificationId, Severity};

/// Settings fixed for the lifetime of one [`PlannerX`].
#[derive(Debug, Clone)]
pub struct PlannerXOptions {
    /// Backend every request path is resolved against.
    pub base_url: Url,
    /// Rule deciding which requests carry the credential.
    pub auth_variant: AuthVariant,
    /// How the credential is chosen at startup.
    pub init_policy: InitPolicy,
}

/// Adapters [`PlannerX`] is wired to.
pub struct PlannerXPorts {
    /// Durable home of the credential.
    pub storage: Arc<dyn DurableStoragePort>,
    /// Executes outgoing requests.
    pub transport: Arc<dyn HttpTransportPort>,
    /// Surface that renders toasts.
    pub sink: Arc<dyn NotificationSink>,
}

/// Credential, API client, toasts and modals behind one handle.
pub struct PlannerX {
    tokens: Arc<TokenStore>,
    api: ApiClient,
    notifications: NotificationCenter,
    modals: Arc<Mutex<ModalLayer>>,
}

/// Releases what [`PlannerX::initialize`] set up.
///
/// Pending toast timers are cancelled and every registered modal is
/// forgotten. Dropping the handle without calling [`Teardown::run`] leaves
/// everything in place.
#[must_use = "call `run` when the host shuts down"]
pub struct Teardown {
    notifications: NotificationCenter,
    modals: Arc<Mutex<ModalLayer>>,
}

impl Teardown {
    /// Cancels pending toast timers and removes every modal.
    pub fn run(self) {
        info!("Tearing down PlannerX");
        self.notifications.shutdown();
        self.modals.lock().clear();
    }
}

impl PlannerX {
    /// Builds every component once and returns the teardown handle.
    #[must_use]
    pub fn initialize(options: PlannerXOptions, ports: PlannerXPorts) -> (Self, Teardown) {
        let PlannerXPorts {
            storage,
            transport,
            sink,
        } = ports;

        let tokens = Arc::new(TokenStore::initialize(storage, options.init_policy));
        let api = ApiClient::new(
            options.base_url,
            options.auth_variant,
            Arc::clone(&tokens),
            transport,
        );
        let notifications = NotificationCenter::new(sink);
        let modals = Arc::new(Mutex::new(ModalLayer::new()));

        info!(
            base_url = %api.base_url(),
            variant = %options.auth_variant,
            policy = ?options.init_policy,
            has_token = tokens.has_token(),
            "PlannerX initialized"
        );

        let teardown = Teardown {
            notifications: notifications.clone(),
            modals: Arc::clone(&modals),
        };

        (
            Self {
                tokens,
                api,
                notifications,
                modals,
            },
            teardown,
        )
    }

    /// Shows a toast; see [`NotificationCenter::show_notification`].
    pub fn show_notification(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        self.notifications.show_notification(message, severity)
    }

    /// See [`crate::application::services::format_date_for_input`].
    #[must_use]
    pub fn format_date_for_input(&self, input: Option<&str>) -> String {
        services::format_date_for_input(input)
    }

    /// Collects form fields; repeated keys keep the last value.
    pub fn form_data_to_json<I, K, V>(&self, fields: I) -> FormMap
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        services::form_data_to_json(fields)
    }

    /// Replaces the credential used by subsequent requests.
    ///
    /// # Errors
    /// Returns error if durable storage rejects the write.
    pub fn set_token(&self, credential: impl Into<Credential>) -> Result<(), StorageError> {
        self.tokens.set_token(credential)
    }

    /// Returns the active credential, empty when logged out.
    #[must_use]
    pub fn token(&self) -> Credential {
        self.tokens.token()
    }

    /// Forgets the credential.
    ///
    /// # Errors
    /// Returns error if durable storage rejects the removal.
    pub fn clear_token(&self) -> Result<(), StorageError> {
        self.tokens.clear_token()
    }

    /// Authenticated API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Toast scheduler.
    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Locks the modal layer.
    pub fn modals(&self) -> MutexGuard<'_, ModalLayer> {
        self.modals.lock()
    }
}
