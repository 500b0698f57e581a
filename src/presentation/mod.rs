//! Presentation layer with the composition root and terminal rendering.

/// Composition root.
pub mod app;
/// Stderr notification sink.
pub mod terminal_sink;
/// UI components.
pub mod ui;

pub use app::{PlannerX, PlannerXOptions, PlannerXPorts, Teardown};
pub use terminal_sink::TerminalNotificationSink;
pub use ui::{ModalLayer, ToastStack, run_notify_view};
