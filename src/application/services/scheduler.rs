//! Cancellable deferred callbacks.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Handle to a callback scheduled on the tokio runtime.
///
/// Dropping the handle leaves the callback scheduled; call [`cancel`] to
/// prevent it from running.
///
/// [`cancel`]: ScheduledTask::cancel
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Runs `callback` once `delay` has elapsed.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn after<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self { handle }
    }

    /// Prevents the callback from running if it has not started yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Returns whether the task ran or was cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
