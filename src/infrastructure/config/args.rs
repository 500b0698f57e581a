use super::app_config::{LogLevel, StorageBackend};
use crate::domain::Severity;
use crate::domain::services::AuthVariant;
use clap::{Parser, Subcommand};
use reqwest::Method;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Parser)]
#[command(
    name = "plannerx",
    version,
    about = "Authenticated command-line client for PlannerX",
    long_about = None
)]
/// Command-line arguments.
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", env = "PLANNERX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Backend base URL.
    #[arg(long, value_name = "URL", env = "PLANNERX_BASE_URL")]
    pub base_url: Option<Url>,

    /// Storage scope for the credential.
    #[arg(long, env = "PLANNERX_ORIGIN")]
    pub origin: Option<String>,

    /// Credential persistence backend.
    #[arg(long, value_enum)]
    pub storage: Option<StorageBackend>,

    /// Seed the development credential when none is stored.
    #[arg(long, env = "PLANNERX_SEED_DEV_CREDENTIAL")]
    pub seed_dev_credential: Option<bool>,

    /// Reuse the credential saved by an earlier run.
    #[arg(long, env = "PLANNERX_RESTORE_CREDENTIAL")]
    pub restore_credential: Option<bool>,

    /// Authorization rule: `legacy` or `api-aware`.
    #[arg(long, env = "PLANNERX_AUTH_VARIANT")]
    pub auth_variant: Option<AuthVariant>,

    /// Client-wide request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Show toasts for command results.
    #[arg(long)]
    pub notifications: Option<bool>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or replace the stored credential.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Send a request to the backend.
    Request {
        /// HTTP method.
        method: Method,

        /// Path relative to the base URL, e.g. `/tasks?filter=today`.
        path: String,

        /// Body field as `key=value`; repeated keys keep the last value.
        #[arg(short = 'd', long = "data", value_parser = parse_key_value)]
        data: Vec<(String, String)>,

        /// Extra header as `Name: value`.
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Send fields url-encoded instead of as JSON.
        #[arg(long)]
        form: bool,
    },

    /// Show a toast in the terminal.
    Notify {
        /// Text to display.
        message: String,

        /// `info`, `success` or `error`.
        #[arg(long, default_value = "info")]
        severity: Severity,
    },

    /// Format a timestamp for a date-time input field.
    FormatDate {
        /// Timestamp to format; empty output when omitted.
        input: Option<String>,
    },

    /// Collect `key=value` fields into a JSON object.
    FormJson {
        /// Fields as `key=value`.
        #[arg(value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },
}

/// Credential subcommands.
#[derive(Debug, Subcommand)]
pub enum TokenAction {
    /// Print the active credential.
    Show {
        /// Print the full credential instead of a masked form.
        #[arg(long)]
        reveal: bool,
    },
    /// Replace the credential.
    Set {
        /// New credential value.
        value: String,
    },
    /// Forget the credential.
    Clear,
}

fn parse_key_value(input: &str) -> Result<(String, String), String> {
    input
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{input}`"))
}

fn parse_header(input: &str) -> Result<(String, String), String> {
    input
        .split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected `Name: value`, got `{input}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_command() {
        let args = CliArgs::parse_from([
            "plannerx",
            "request",
            "POST",
            "/tasks/create",
            "-d",
            "title=Buy milk",
            "-d",
            "notes=a=b",
            "-H",
            "Accept: application/json",
        ]);

        let Command::Request {
            method,
            path,
            data,
            headers,
            form,
        } = args.command
        else {
            panic!("expected request command");
        };
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/tasks/create");
        assert_eq!(
            data,
            vec![
                ("title".to_string(), "Buy milk".to_string()),
                ("notes".to_string(), "a=b".to_string())
            ]
        );
        assert_eq!(
            headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
        assert!(!form);
    }

    #[test]
    fn test_parse_notify_command() {
        let args = CliArgs::parse_from(["plannerx", "notify", "Saved", "--severity", "success"]);

        assert!(matches!(
            args.command,
            Command::Notify { ref message, severity: Severity::Success } if message == "Saved"
        ));
    }

    #[test]
    fn test_rejects_malformed_field() {
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_header(": value").is_err());
    }
}
