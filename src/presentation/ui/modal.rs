use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::debug;

#[derive(Debug, Clone)]
struct Modal {
    id: String,
    backdrop: Rect,
    dialog: Rect,
    /// Position in the open stack; `None` while closed.
    opened: Option<u64>,
}

/// Registered modals. Open modals stack in the order they were opened, the
/// most recently opened on top.
///
/// A left click that lands on the top open modal under the pointer, inside
/// its backdrop but outside its dialog, closes that modal. The layer does not
/// read terminal events itself; the host UI forwards them to
/// [`ModalLayer::handle_mouse`].
#[derive(Debug, Default)]
pub struct ModalLayer {
    modals: Vec<Modal>,
    next_open: u64,
}

impl ModalLayer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or re-positions a modal. New modals start closed.
    pub fn register(&mut self, id: impl Into<String>, backdrop: Rect, dialog: Rect) {
        let id = id.into();
        if let Some(modal) = self.modals.iter_mut().find(|m| m.id == id) {
            modal.backdrop = backdrop;
            modal.dialog = dialog;
            return;
        }
        self.modals.push(Modal {
            id,
            backdrop,
            dialog,
            opened: None,
        });
    }

    /// Opens a modal, or raises it if already open. Returns `false` for an
    /// unknown id.
    pub fn open(&mut self, id: &str) -> bool {
        let order = self.next_open;
        let Some(modal) = self.modals.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        modal.opened = Some(order);
        self.next_open += 1;
        true
    }

    /// Closes a modal. Returns `false` for an unknown id.
    pub fn close(&mut self, id: &str) -> bool {
        self.modals
            .iter_mut()
            .find(|m| m.id == id)
            .map(|modal| modal.opened = None)
            .is_some()
    }

    /// Returns whether the modal is registered and open.
    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.modals.iter().any(|m| m.id == id && m.opened.is_some())
    }

    /// Handles a mouse event and returns the id of the modal it closed.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> Option<String> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        self.handle_click(Position::new(event.column, event.row))
    }

    /// Closes the topmost open modal whose backdrop was clicked directly.
    pub fn handle_click(&mut self, position: Position) -> Option<String> {
        let target = self
            .modals
            .iter_mut()
            .filter(|m| m.opened.is_some() && m.backdrop.contains(position))
            .max_by_key(|m| m.opened)?;

        if target.dialog.contains(position) {
            return None;
        }

        target.opened = None;
        debug!(modal = %target.id, "Closed modal from backdrop click");
        Some(target.id.clone())
    }

    /// Forgets every registered modal.
    pub fn clear(&mut self) {
        self.modals.clear();
        self.next_open = 0;
    }

    /// Number of registered modals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modals.len()
    }

    /// Returns whether no modal is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn layer_with_open(id: &str) -> ModalLayer {
        let mut layer = ModalLayer::new();
        layer.register(id, Rect::new(0, 0, 80, 24), Rect::new(20, 6, 40, 12));
        layer.open(id);
        layer
    }

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_backdrop_click_closes() {
        let mut layer = layer_with_open("task-form");

        assert_eq!(layer.handle_mouse(left_click(2, 2)), Some("task-form".to_string()));
        assert!(!layer.is_open("task-form"));
    }

    #[test]
    fn test_dialog_click_keeps_open() {
        let mut layer = layer_with_open("task-form");

        assert_eq!(layer.handle_mouse(left_click(30, 10)), None);
        assert!(layer.is_open("task-form"));
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut layer = layer_with_open("task-form");
        let event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            ..left_click(2, 2)
        };

        assert_eq!(layer.handle_mouse(event), None);
        assert!(layer.is_open("task-form"));
    }

    #[test]
    fn test_closed_modal_ignores_clicks() {
        let mut layer = ModalLayer::new();
        layer.register("event-form", Rect::new(0, 0, 80, 24), Rect::new(20, 6, 40, 12));

        assert_eq!(layer.handle_click(Position::new(1, 1)), None);
    }

    #[test]
    fn test_topmost_modal_wins() {
        let mut layer = layer_with_open("contacts");
        layer.register("confirm", Rect::new(0, 0, 80, 24), Rect::new(30, 10, 20, 4));
        layer.open("confirm");

        assert_eq!(layer.handle_click(Position::new(1, 1)), Some("confirm".to_string()));
        assert!(layer.is_open("contacts"));
    }

    #[test]
    fn test_last_opened_is_on_top() {
        let mut layer = ModalLayer::new();
        layer.register("confirm", Rect::new(0, 0, 80, 24), Rect::new(30, 10, 20, 4));
        layer.register("contacts", Rect::new(0, 0, 80, 24), Rect::new(20, 6, 40, 12));
        layer.open("contacts");
        layer.open("confirm");

        assert_eq!(layer.handle_click(Position::new(1, 1)), Some("confirm".to_string()));
        assert!(layer.is_open("contacts"));

        layer.open("confirm");
        layer.open("contacts");
        assert_eq!(layer.handle_click(Position::new(1, 1)), Some("contacts".to_string()));
        assert!(layer.is_open("confirm"));
    }

    #[test]
    fn test_unknown_modal() {
        let mut layer = ModalLayer::new();

        assert!(!layer.open("missing"));
        assert!(!layer.close("missing"));
    }

    #[test]
    fn test_clear() {
        let mut layer = layer_with_open("task-form");
        layer.clear();

        assert!(layer.is_empty());
        assert!(!layer.is_open("task-form"));
    }
}
