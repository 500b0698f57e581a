//! Bearer credential value object.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque credential sent as `Authorization: Bearer <credential>`.
///
/// The value is never validated: any string, including the empty string, is
/// accepted. Formatting through `Debug` or `Display` only ever shows a masked
/// form.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    value: String,
}

impl Credential {
    /// Credential seeded for local development when auto-seeding is enabled.
    pub const DEV_CREDENTIAL: &'static str = "dev_demo_user:demo@plannerx.local";

    /// Marker identifying a stale placeholder credential.
    pub const PLACEHOLDER_MARKER: &'static str = "test@example.com";

    /// Wraps a credential string as-is.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the empty credential.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the development credential.
    #[must_use]
    pub fn development() -> Self {
        Self::new(Self::DEV_CREDENTIAL)
    }

    /// Returns credential as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns whether no credential is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns whether this is a known placeholder that must not be used.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.value.contains(Self::PLACEHOLDER_MARKER)
    }

    /// Returns the `Authorization` header value for this credential.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// Returns masked credential for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        if chars.len() <= 10 {
            return "*".repeat(chars.len());
        }

        let prefix: String = chars[..4].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{prefix}...{suffix}")
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_any_string() {
        assert!(Credential::new("").is_empty());
        assert_eq!(Credential::new("x").as_str(), "x");
        assert_eq!(Credential::new("  spaced  ").as_str(), "  spaced  ");
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(Credential::new("uid:test@example.com").is_placeholder());
        assert!(!Credential::development().is_placeholder());
    }

    #[test]
    fn test_bearer_value() {
        assert_eq!(Credential::new("abc").bearer(), "Bearer abc");
        assert_eq!(Credential::empty().bearer(), "Bearer ");
    }

    #[test]
    fn test_masking() {
        let credential = Credential::development();
        let masked = credential.masked();

        assert_eq!(masked, "dev_...ocal");
        assert_eq!(Credential::new("short").masked(), "*****");
    }

    #[test]
    fn test_debug_does_not_leak_credential() {
        let credential = Credential::development();
        let debug_output = format!("{credential:?}");

        assert!(!debug_output.contains(Credential::DEV_CREDENTIAL));
    }
}
