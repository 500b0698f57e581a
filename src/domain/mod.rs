//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Toast notification model.
pub mod notification;
/// Port definitions.
pub mod ports;
/// Domain services.
pub mod services;

pub use entities::Credential;
pub use errors::{ClientError, StorageError};
pub use notification::{
    DISPLAY_DURATION, ENTRY_ANIMATION, EXIT_ANIMATION, Notification, NotificationId,
    NotificationPhase, Severity,
};
pub use ports::{DurableStoragePort, HttpTransportPort, NotificationSink, NullNotificationSink};
pub use services::{AuthDecision, AuthVariant, RequestAuthorizer};
