//! Domain services.

mod request_authorizer;

pub use request_authorizer::{
    API_PREFIX, AuthDecision, AuthVariant, PROTECTED_PREFIXES, RequestAuthorizer,
};
