use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub collectors: CollectorsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    /// Host name on which debug routes are switched off.
    pub production_hostname: Option<String>,
    pub debug_routes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: "0.0.0.0:3000".to_string(),
            production_hostname: None,
            debug_routes: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorsConfig {
    pub top_header_lines: usize,
    /// Column widths handed to `w` through `PROCPS_USERLEN`/`PROCPS_FROMLEN`.
    pub w_user_len: u16,
    pub w_from_len: u16,
    /// Accounts with a uid up to this value are classified as `system`.
    pub system_uid_max: u32,
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        CollectorsConfig {
            top_header_lines: 5,
            w_user_len: 24,
            w_from_len: 64,
            system_uid_max: 499,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "sysdash=info".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sysdash").join("config.toml"))
}

/// The config file exists but is not valid TOML for [`Config`].
#[derive(Debug, thiserror::Error)]
#[error("invalid config {}: {source}", path.display())]
pub struct InvalidConfig {
    pub path: PathBuf,
    #[source]
    pub source: toml::de::Error,
}

pub fn read_config() -> Result<Config, InvalidConfig> {
    match config_path() {
        Some(path) if path.exists() => read_config_from_path(&path),
        _ => Ok(Config::default()),
    }
}

/// A missing or unreadable file yields the defaults. Invalid contents are
/// returned as an error so the caller can report them once logging is up.
pub fn read_config_from_path(path: &Path) -> Result<Config, InvalidConfig> {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|source| InvalidConfig {
            path: path.to_path_buf(),
            source,
        }),
        Err(_) => Ok(Config::default()),
    }
}
