//! Application layer with services built on the domain ports.

/// Service implementations.
pub mod services;

pub use services::{
    ApiClient, FormMap, InitPolicy, NotificationCenter, RequestOptions, ScheduledTask, TokenStore,
};
