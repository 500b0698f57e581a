//! PlannerX - client layer for the PlannerX planning service.
//!
//! This crate holds the bearer credential, attaches it to requests bound for
//! the protected part of the backend, shows transient toast notifications
//! and provides date and form helpers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services built on the domain ports.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing the composition root and terminal rendering.
pub mod presentation;

pub use presentation::{PlannerX, PlannerXOptions, PlannerXPorts, Teardown};

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "plannerx";
