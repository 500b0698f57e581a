//! Terminal UI components.

mod modal;
mod notify_view;
mod toast;

pub use modal::ModalLayer;
pub use notify_view::run_notify_view;
pub use toast::{ToastStack, severity_color};
