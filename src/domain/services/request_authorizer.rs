use std::fmt;
use std::str::FromStr;

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Credential;

/// Backend sections that always require the credential.
pub const PROTECTED_PREFIXES: [&str; 5] = ["/tasks", "/events", "/contacts", "/settings", "/dashboard"];

/// JSON API namespace, protected under [`AuthVariant::ApiAware`].
pub const API_PREFIX: &str = "/api/";

/// Which allowlist and token gate the client applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthVariant {
    /// Section prefixes only; header attached even when the token is empty.
    Legacy,
    /// Section prefixes plus `/api/`; header attached only for a non-empty token.
    #[default]
    ApiAware,
}

impl fmt::Display for AuthVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::ApiAware => write!(f, "api-aware"),
        }
    }
}

impl FromStr for AuthVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "api-aware" => Ok(Self::ApiAware),
            other => Err(format!(
                "unknown auth variant `{other}` (expected `legacy` or `api-aware`)"
            )),
        }
    }
}

/// Outcome of applying the rule to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// `Authorization: Bearer <token>` was set.
    Attached,
    /// Path is protected but the token gate rejected the empty credential.
    SkippedEmptyToken,
    /// Path is outside the allowlist.
    Unprotected,
}

/// Decides whether a request path receives `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAuthorizer {
    variant: AuthVariant,
}

impl RequestAuthorizer {
    /// Creates an authorizer for `variant`.
    #[must_use]
    pub const fn new(variant: AuthVariant) -> Self {
        Self { variant }
    }

    /// Active rule.
    #[must_use]
    pub const fn variant(&self) -> AuthVariant {
        self.variant
    }

    /// Plain prefix test against the caller-supplied path.
    ///
    /// Absolute URLs never match.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        let section = PROTECTED_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix));

        match self.variant {
            AuthVariant::Legacy => section,
            AuthVariant::ApiAware => section || path.starts_with(API_PREFIX),
        }
    }

    /// Sets the `Authorization` header when the rule allows it.
    ///
    /// No other header is touched.
    ///
    /// # Errors
    /// Returns error if the credential cannot be encoded as a header value.
    pub fn authorize(
        &self,
        path: &str,
        credential: &Credential,
        headers: &mut HeaderMap,
    ) -> Result<AuthDecision, InvalidHeaderValue> {
        if !self.is_protected(path) {
            return Ok(AuthDecision::Unprotected);
        }

        if self.variant == AuthVariant::ApiAware && credential.is_empty() {
            return Ok(AuthDecision::SkippedEmptyToken);
        }

        let mut value = HeaderValue::from_str(&credential.bearer())?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        Ok(AuthDecision::Attached)
    }
}
