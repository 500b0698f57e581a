//! Domain entity definitions.

mod credential;

pub use credential::Credential;
