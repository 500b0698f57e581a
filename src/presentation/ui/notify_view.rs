use std::time::Duration;

use ratatui::{TerminalOptions, Viewport};
use tokio::time::Instant;

use super::toast::{TOAST_HEIGHT, ToastStack};
use crate::application::services::NotificationCenter;
use crate::domain::Severity;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Shows one toast in an inline viewport and returns once it is removed.
///
/// # Errors
/// Returns error if the terminal cannot be drawn to.
pub async fn run_notify_view(
    center: &NotificationCenter,
    message: String,
    severity: Severity,
) -> std::io::Result<()> {
    let mut terminal = ratatui::init_with_options(TerminalOptions {
        viewport: Viewport::Inline(TOAST_HEIGHT + 1),
    });

    center.show_notification(message, severity);

    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    let result = loop {
        frames.tick().await;

        let active = center.active();
        let drawn = terminal.draw(|frame| {
            frame.render_widget(ToastStack::new(&active, Instant::now()), frame.area());
        });

        if let Err(e) = drawn {
            break Err(e);
        }
        if active.is_empty() {
            break Ok(());
        }
    };

    ratatui::restore();
    result
}
