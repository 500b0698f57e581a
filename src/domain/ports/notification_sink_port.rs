use crate::domain::{Notification, NotificationId};

/// Port for surfaces that display toasts.
///
/// Calls arrive in order `mount`, `begin_exit`, `unmount` for each
/// notification; `begin_exit` is skipped when a toast is torn down early.
pub trait NotificationSink: Send + Sync {
    /// Inserts the toast and starts its entry animation.
    fn mount(&self, notification: &Notification);

    /// Starts the exit animation.
    fn begin_exit(&self, id: NotificationId);

    /// Removes the toast from the surface.
    fn unmount(&self, id: NotificationId);
}

/// Sink that discards every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotificationSink;

impl NotificationSink for NullNotificationSink {
    fn mount(&self, _notification: &Notification) {}

    fn begin_exit(&self, _id: NotificationId) {}

    fn unmount(&self, _id: NotificationId) {}
}
