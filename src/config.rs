//! Configuration loading.
//!
//! `config.toml` lives in `~/.linkgate/` unless a path is given explicitly.
//! A missing file yields defaults; every section is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default storage namespace prefix.
pub const DEFAULT_NAMESPACE: &str = "linkgate";

/// Default database file name, relative to the data directory.
pub const DEFAULT_DATABASE: &str = "linkgate.db";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// General application settings.
    pub general: GeneralConfig,

    /// Trust registry storage.
    pub storage: StorageConfig,

    /// Log output.
    pub logging: LoggingConfig,
}

/// General settings seeding the runtime settings provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Ask for confirmation before opening untrusted external links.
    #[serde(default = "default_jump_out_link_warn")]
    pub jump_out_link_warn: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            jump_out_link_warn: default_jump_out_link_warn(),
        }
    }
}

/// Where remembered domains are stored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Prefix for storage namespace keys.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// SQLite database path. Relative paths resolve against the data dir.
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            database: default_database(),
        }
    }
}

impl StorageConfig {
    /// Resolve the database path against `data_dir`.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        if self.database.is_absolute() {
            self.database.clone()
        } else {
            data_dir.join(&self.database)
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Directory for rotated JSON log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

// Default value functions for serde

fn default_jump_out_link_warn() -> bool {
    true
}
fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_owned()
}
fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

/// Load the config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Load the config at `path`, or defaults if the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file found, using defaults");
        return Ok(Config::default());
    }
    tracing::debug!(path = %path.display(), "loading config from file");
    load_config(path)
}

/// Render a config as TOML, for writing the initial file.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_config(config: &Config) -> anyhow::Result<String> {
    toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("failed to render config: {e}"))
}

/// Resolve the default config directory (`~/.linkgate/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".linkgate"))
}
