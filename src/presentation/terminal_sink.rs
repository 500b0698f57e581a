//! Toasts printed as colored lines on stderr.

use std::io::{Write, stderr};

use crossterm::style::{Color, Stylize};
use tracing::{debug, warn};

use crate::domain::ports::NotificationSink;
use crate::domain::{Notification, NotificationId};

/// Sink for one-shot commands: prints each toast once when mounted.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotificationSink;

impl TerminalNotificationSink {
    /// Creates a sink writing to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render_line(notification: &Notification) -> String {
        let (r, g, b) = notification.severity.rgb();
        format!(" {} ", notification.message)
            .with(Color::White)
            .on(Color::Rgb { r, g, b })
            .bold()
            .to_string()
    }
}

impl NotificationSink for TerminalNotificationSink {
    fn mount(&self, notification: &Notification) {
        let line = Self::render_line(notification);
        let mut err = stderr().lock();
        if let Err(e) = writeln!(err, "{line}") {
            warn!(error = %e, "Failed to print notification");
        }
    }

    fn begin_exit(&self, id: NotificationId) {
        debug!(%id, "Notification exiting");
    }

    fn unmount(&self, id: NotificationId) {
        debug!(%id, "Notification removed from terminal");
    }
}
