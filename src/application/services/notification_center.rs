use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use super::scheduler::ScheduledTask;
use crate::domain::ports::NotificationSink;
use crate::domain::{DISPLAY_DURATION, Notification, NotificationId, Severity};

struct ActiveToast {
    notification: Notification,
    timers: [ScheduledTask; 2],
}

struct Inner {
    sink: Arc<dyn NotificationSink>,
    active: Mutex<Vec<ActiveToast>>,
}

impl Inner {
    fn finish(&self, id: NotificationId) {
        let removed = {
            let mut active = self.active.lock();
            active
                .iter()
                .position(|toast| toast.notification.id == id)
                .map(|index| active.remove(index))
        };

        if removed.is_some() {
            debug!(%id, "Notification removed");
            self.sink.unmount(id);
        }
    }
}

/// Shows toasts and removes them once their display window has passed.
///
/// Every toast is independent: there is no queue, no cap and no
/// deduplication, so identical messages stack.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    /// Creates a center rendering through `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                sink,
                active: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Mounts a toast and schedules its exit and removal.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn show_notification(
        &self,
        message: impl Into<String>,
        severity: Severity,
    ) -> NotificationId {
        let notification = Notification::new(severity, message);
        let id = notification.id;
        debug!(%id, %severity, "Showing notification");

        self.inner.sink.mount(&notification);

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let exit = ScheduledTask::after(DISPLAY_DURATION, move || {
            if let Some(inner) = weak.upgrade() {
                inner.sink.begin_exit(id);
            }
        });

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let removal = ScheduledTask::after(Notification::lifetime(), move || {
            if let Some(inner) = weak.upgrade() {
                inner.finish(id);
            }
        });

        self.inner.active.lock().push(ActiveToast {
            notification,
            timers: [exit, removal],
        });

        id
    }

    /// Shows an info toast.
    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show_notification(message, Severity::Info)
    }

    /// Shows a success toast.
    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show_notification(message, Severity::Success)
    }

    /// Shows an error toast.
    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show_notification(message, Severity::Error)
    }

    /// Removes one toast immediately, skipping its exit animation.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut active = self.inner.active.lock();
            active
                .iter()
                .position(|toast| toast.notification.id == id)
                .map(|index| active.remove(index))
        };

        let Some(toast) = removed else {
            return false;
        };
        for timer in &toast.timers {
            timer.cancel();
        }
        self.inner.sink.unmount(id);
        true
    }

    /// Cancels every pending timer and unmounts all toasts.
    pub fn shutdown(&self) {
        let drained: Vec<ActiveToast> = self.inner.active.lock().drain(..).collect();
        debug!(count = drained.len(), "Shutting down notifications");

        for toast in drained {
            for timer in &toast.timers {
                timer.cancel();
            }
            self.inner.sink.unmount(toast.notification.id);
        }
    }

    /// Toasts currently mounted, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.inner
            .active
            .lock()
            .iter()
            .map(|toast| toast.notification.clone())
            .collect()
    }

    /// Returns whether no toast is mounted.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.inner.active.lock().is_empty()
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("active", &self.inner.active.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockNotificationSink, SinkEvent};
    use std::time::Duration;

    fn center() -> (NotificationCenter, Arc<MockNotificationSink>) {
        let sink = Arc::new(MockNotificationSink::new());
        let center = NotificationCenter::new(Arc::clone(&sink) as Arc<dyn NotificationSink>);
        (center, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_lifecycle() {
        let (center, sink) = center();

        let id = center.show_notification("Saved", Severity::Success);
        assert_eq!(sink.mounted_count(), 1);
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Mount(id, "Saved".to_string()),
                SinkEvent::BeginExit(id)
            ]
        );
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sink.mounted_count(), 0);
        assert_eq!(sink.events().last(), Some(&SinkEvent::Unmount(id)));
        assert!(center.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_are_independent() {
        let (center, sink) = center();

        center.info("same");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        center.info("same");
        assert_eq!(sink.mounted_count(), 2);

        tokio::time::sleep(Duration::from_millis(2400)).await;
        assert_eq!(sink.mounted_count(), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(sink.mounted_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_timers() {
        let (center, sink) = center();

        let id = center.error("Failed");
        center.shutdown();
        assert!(center.is_idle());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Mount(id, "Failed".to_string()),
                SinkEvent::Unmount(id)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss() {
        let (center, sink) = center();

        let id = center.info("Hello");
        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.events().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_center_does_not_fire() {
        let (center, sink) = center();

        center.info("Bye");
        drop(center);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.events().len(), 1);
    }
}
