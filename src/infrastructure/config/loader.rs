//! Reading and bootstrapping `config.toml`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::AppConfig;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform configuration directory for this user.
    #[error("no configuration directory available")]
    NoConfigDir,
    /// Reading or writing the file failed.
    #[error("config file io: {0}")]
    Io(#[from] std::io::Error),
    /// The defaults could not be rendered as TOML.
    #[error("failed to render default config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Locates and loads the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    /// Uses the platform configuration directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoConfigDir`] when no home directory is known.
    pub fn from_platform_dirs() -> Result<Self, ConfigError> {
        AppConfig::default_config_dir()
            .map(Self::in_dir)
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Uses `dir` as the configuration directory.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the configuration file inside the directory.
    #[must_use]
    pub fn default_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    /// Loads `path_override`, or the default file when none is given.
    ///
    /// A missing file is written out with defaults. A file that does not
    /// parse is left untouched and defaults are returned.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, or the defaults cannot be
    /// written.
    pub fn load(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = path_override.map_or_else(|| self.default_path(), Path::to_path_buf);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Unreadable config, using defaults");
                AppConfig::default()
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let config = AppConfig::default();
                write_atomically(&path, &config)?;
                info!(path = %path.display(), "Wrote default config");
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn write_atomically(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let rendered = toml::to_string_pretty(config)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(rendered.as_bytes())?;
    staged.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), "Config persisted");
    Ok(())
}
