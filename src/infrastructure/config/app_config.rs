//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::application::InitPolicy;
use crate::domain::services::AuthVariant;

const APP_NAME: &str = "plannerx";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "plannerx";
const DEFAULT_BASE_URL: &str = "http://localhost:5000/";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where the credential is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// TOML file under the platform data directory.
    #[default]
    File,
    /// System keyring.
    Keyring,
    /// Process memory only.
    Memory,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Show toasts for command results.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend the client talks to.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Storage scope; defaults to the base URL's origin.
    #[serde(default)]
    pub origin: Option<String>,

    /// Credential persistence backend.
    #[serde(default)]
    pub storage: StorageBackend,

    /// Seed the development credential at startup instead of requiring an
    /// explicit login.
    #[serde(default)]
    pub seed_dev_credential: bool,

    /// Adopt the credential saved by an earlier run. Ignored when seeding is
    /// enabled; when both are off every run starts logged out.
    #[serde(default = "default_true")]
    pub restore_credential: bool,

    /// Allowlist and token gate used when attaching the credential.
    #[serde(default)]
    pub auth_variant: AuthVariant,

    /// Client-wide request timeout in seconds; unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Notification configuration.
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}

fn default_true() -> bool {
    true
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(origin) = &args.origin {
            self.origin = Some(origin.clone());
        }
        if let Some(storage) = args.storage {
            self.storage = storage;
        }
        if let Some(seed) = args.seed_dev_credential {
            self.seed_dev_credential = seed;
        }
        if let Some(restore) = args.restore_credential {
            self.restore_credential = restore;
        }
        if let Some(variant) = args.auth_variant {
            self.auth_variant = variant;
        }
        if let Some(timeout) = args.request_timeout {
            self.request_timeout_secs = Some(timeout);
        }
        if let Some(enabled) = args.notifications {
            self.notifications.enabled = enabled;
        }
    }

    /// Returns the storage scope for the credential.
    #[must_use]
    pub fn effective_origin(&self) -> String {
        self.origin
            .clone()
            .unwrap_or_else(|| self.base_url.origin().ascii_serialization())
    }

    /// Returns how the credential is chosen at startup.
    #[must_use]
    pub const fn init_policy(&self) -> InitPolicy {
        InitPolicy::from_flags(self.seed_dev_credential, self.restore_credential)
    }

    /// Returns the client-wide request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("plannerx.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            base_url: default_base_url(),
            origin: None,
            storage: StorageBackend::default(),
            seed_dev_credential: false,
            restore_credential: true,
            auth_variant: AuthVariant::default(),
            request_timeout_secs: None,
            notifications: NotificationsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
            base_url = "https://plannerx.example/"
            storage = "keyring"
            seed_dev_credential = true
            auth_variant = "legacy"
            request_timeout_secs = 15

            [notifications]
            enabled = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.base_url.as_str(), "https://plannerx.example/");
        assert_eq!(config.storage, StorageBackend::Keyring);
        assert!(config.seed_dev_credential);
        assert_eq!(config.init_policy(), InitPolicy::SeedDevCredential);
        assert_eq!(config.auth_variant, AuthVariant::Legacy);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert!(!config.notifications.enabled);
        assert_eq!(config.effective_origin(), "https://plannerx.example");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert!(!config.seed_dev_credential);
        assert!(config.restore_credential);
        assert_eq!(config.init_policy(), InitPolicy::RestoreStored);
        assert_eq!(config.auth_variant, AuthVariant::ApiAware);
        assert_eq!(config.storage, StorageBackend::File);
        assert!(config.notifications.enabled);
        assert_eq!(config.effective_origin(), "http://localhost:5000");
    }

    #[test]
    fn test_args_override_file_values() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "plannerx",
            "--base-url",
            "https://other.example/",
            "--seed-dev-credential",
            "true",
            "--auth-variant",
            "legacy",
            "--storage",
            "memory",
            "token",
            "show",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.base_url.as_str(), "https://other.example/");
        assert!(config.seed_dev_credential);
        assert_eq!(config.auth_variant, AuthVariant::Legacy);
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_disable_restore_starts_logged_out() {
        let mut config: AppConfig =
            toml::from_str("restore_credential = false").expect("Failed to parse config");
        assert_eq!(config.init_policy(), InitPolicy::ManualLogin);

        let args = CliArgs::parse_from(["plannerx", "--restore-credential", "true", "token", "show"]);
        config.merge_with_args(&args);
        assert_eq!(config.init_policy(), InitPolicy::RestoreStored);
    }

    #[test]
    fn test_explicit_origin_wins() {
        let config = AppConfig {
            origin: Some("shared".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.effective_origin(), "shared");
    }
}
