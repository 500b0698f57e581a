use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use tokio::time::Instant;
use unicode_width::UnicodeWidthStr;

use crate::domain::{Notification, NotificationPhase, Severity};

const MARGIN_TOP: u16 = 1;
const MARGIN_RIGHT: u16 = 2;
const MAX_WIDTH: u16 = 48;
pub(super) const TOAST_HEIGHT: u16 = 3;

/// Background color for a severity.
#[must_use]
pub fn severity_color(severity: Severity) -> Color {
    let (r, g, b) = severity.rgb();
    Color::Rgb(r, g, b)
}

/// Stack of toasts pinned to the top-right corner, newest at the bottom.
///
/// Each toast slides in from the right edge while entering and back out
/// while exiting.
pub struct ToastStack<'a> {
    notifications: &'a [Notification],
    now: Instant,
}

impl<'a> ToastStack<'a> {
    /// Renders `notifications` as they look at `now`.
    #[must_use]
    pub fn new(notifications: &'a [Notification], now: Instant) -> Self {
        Self { notifications, now }
    }

    fn toast_area(area: Rect, index: u16, message: &str, phase: NotificationPhase) -> Rect {
        let max_width = MAX_WIDTH.min(area.width.saturating_sub(MARGIN_RIGHT));
        let width = u16::try_from(message.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(max_width);

        let resting_x = area
            .right()
            .saturating_sub(width)
            .saturating_sub(MARGIN_RIGHT);
        let travel = f32::from(width.saturating_add(MARGIN_RIGHT));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let shift = (travel * phase.offset_fraction()).round() as u16;

        let y = area
            .top()
            .saturating_add(MARGIN_TOP)
            .saturating_add(index.saturating_mul(TOAST_HEIGHT));

        Rect::new(resting_x.saturating_add(shift), y, width, TOAST_HEIGHT)
    }
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut index = 0u16;

        for notification in self.notifications {
            let phase = notification.phase_at(self.now);
            if phase == NotificationPhase::Removed {
                continue;
            }

            let toast_area = Self::toast_area(area, index, &notification.message, phase);
            index = index.saturating_add(1);

            let visible = area.intersection(toast_area);
            if visible.area() == 0 {
                continue;
            }

            let style = Style::default()
                .bg(severity_color(notification.severity))
                .fg(Color::White);

            let para = Paragraph::new(notification.message.as_str())
                .block(Block::default().borders(Borders::ALL).style(style))
                .wrap(Wrap { trim: true })
                .style(style.add_modifier(Modifier::BOLD));

            Clear.render(visible, buf);
            para.render(visible, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_visible_toast_renders_at_rest() {
        let notification = Notification::new(Severity::Success, "Saved");
        let now = notification.created_at + Duration::from_millis(1000);
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);

        ToastStack::new(std::slice::from_ref(&notification), now).render(area, &mut buf);

        assert!(row_text(&buf, 2).contains("Saved"));
        // width = 5 + 4, resting at x = 40 - 9 - 2
        assert_eq!(buf[(29, 2)].bg, severity_color(Severity::Success));
        assert_eq!(buf[(39, 2)].bg, Color::Reset);
    }

    #[test]
    fn test_entering_toast_is_offset() {
        let notification = Notification::new(Severity::Info, "Hello");
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);

        ToastStack::new(std::slice::from_ref(&notification), notification.created_at)
            .render(area, &mut buf);

        assert!(!row_text(&buf, 2).contains("Hello"));
    }

    #[test]
    fn test_removed_toast_is_skipped() {
        let notification = Notification::new(Severity::Error, "Gone");
        let now = notification.created_at + Duration::from_secs(4);
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);

        ToastStack::new(std::slice::from_ref(&notification), now).render(area, &mut buf);

        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn test_toasts_stack_vertically() {
        let first = Notification::new(Severity::Info, "first");
        let second = Notification::new(Severity::Error, "second");
        let now = first.created_at + Duration::from_millis(1000);
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);

        ToastStack::new(&[first, second], now).render(area, &mut buf);

        assert!(row_text(&buf, 2).contains("first"));
        assert!(row_text(&buf, 5).contains("second"));
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let notification = Notification::new(Severity::Info, "A long message for a tiny area");
        let now = notification.created_at + Duration::from_millis(500);
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);

        ToastStack::new(std::slice::from_ref(&notification), now).render(area, &mut buf);
    }
}
