//! Client configuration: defaults, TOML files and environment overlay.
//!
//! The call pipeline itself never reads files or the environment. These
//! helpers are for applications that want to keep the API key and endpoint
//! outside their code.

use crate::error::BrandAlertError;
use crate::requester::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Settings for the HTTP side of a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API endpoint. Default: the production endpoint
    pub base_url: String,

    /// Whole-request timeout. Default: none
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url<U: Into<String>>(mut self, base_url: U) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Configuration loaded from TOML files.
///
/// ```toml
/// [client]
/// api_key = "at_..."
/// base_url = "https://brand-alert.whoisxmlapi.com/api/v2"
/// timeout = "30s"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientSection>,
}

/// The `[client]` table of a configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ClientSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Timeout as a string, e.g. "5s", "30s", "2m" or bare seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl FileConfig {
    /// API key from the `[client]` table, if set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.client
            .as_ref()
            .and_then(|c| c.api_key.as_deref())
            .filter(|key| !key.is_empty())
    }

    /// Resolve the HTTP settings, falling back to defaults.
    pub fn client_config(&self) -> Result<ClientConfig, BrandAlertError> {
        let mut config = ClientConfig::default();
        if let Some(section) = &self.client {
            if let Some(base_url) = &section.base_url {
                config.base_url = base_url.clone();
            }
            if let Some(timeout) = &section.timeout {
                let secs = parse_timeout_string(timeout).ok_or_else(|| {
                    BrandAlertError::config(format!("Invalid timeout format '{}'", timeout))
                })?;
                config.timeout = Some(Duration::from_secs(secs));
            }
        }
        Ok(config)
    }

    /// Overlay environment values on top of this configuration.
    pub fn with_env(mut self, env_config: EnvConfig) -> Self {
        let section = self.client.get_or_insert_with(ClientSection::default);
        if env_config.api_key.is_some() {
            section.api_key = env_config.api_key;
        }
        if env_config.base_url.is_some() {
            section.base_url = env_config.base_url;
        }
        if env_config.timeout.is_some() {
            section.timeout = env_config.timeout;
        }
        self
    }
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Default)]
pub struct ConfigManager;

impl ConfigManager {
    pub fn new() -> Self {
        Self
    }

    /// Load and validate configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, BrandAlertError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            BrandAlertError::config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config, then `~/.brand-alert.toml`, then `./brand-alert.toml`;
    /// later files override earlier ones field by field. Files that fail to
    /// load are skipped with a warning.
    pub fn discover_and_load(&self) -> FileConfig {
        self.load_in_order(self.discovery_paths())
    }

    /// Candidate configuration files, lowest precedence first.
    pub fn discovery_paths(&self) -> Vec<PathBuf> {
        [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn load_in_order(&self, paths: Vec<PathBuf>) -> FileConfig {
        paths
            .into_iter()
            .filter(|path| path.exists())
            .fold(FileConfig::default(), |merged, path| match self.load_file(&path) {
                Ok(config) => merge_configs(merged, config),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping configuration file");
                    merged
                }
            })
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        Some(PathBuf::from("./brand-alert.toml"))
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        env::var_os("HOME").map(|home| Path::new(&home).join(".brand-alert.toml"))
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        Some(config_dir.join("brand-alert").join("config.toml"))
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), BrandAlertError> {
        if let Some(section) = &config.client {
            if let Some(timeout) = &section.timeout {
                if parse_timeout_string(timeout).is_none() {
                    return Err(BrandAlertError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout
                    )));
                }
            }

            if let Some(base_url) = &section.base_url {
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(BrandAlertError::config(format!(
                        "Invalid base_url '{}'. Expected an http(s) URL",
                        base_url
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Merge two configurations. Values from `higher` win.
fn merge_configs(lower: FileConfig, higher: FileConfig) -> FileConfig {
    let client = match (lower.client, higher.client) {
        (Some(mut lower_client), Some(higher_client)) => {
            if higher_client.api_key.is_some() {
                lower_client.api_key = higher_client.api_key;
            }
            if higher_client.base_url.is_some() {
                lower_client.base_url = higher_client.base_url;
            }
            if higher_client.timeout.is_some() {
                lower_client.timeout = higher_client.timeout;
            }
            Some(lower_client)
        }
        (lower_client, higher_client) => higher_client.or(lower_client),
    };
    FileConfig { client }
}

/// Configuration values read from `BRANDALERT_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

/// Load configuration from the process environment.
///
/// Reads `BRANDALERT_API_KEY`, `BRANDALERT_BASE_URL` and
/// `BRANDALERT_TIMEOUT`. Invalid values are logged and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|name| env::var(name).ok())
}

/// Same as [`load_env_config`] with an injectable variable lookup.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(key) = lookup("BRANDALERT_API_KEY") {
        let key = key.trim().to_string();
        if !key.is_empty() {
            env_config.api_key = Some(key);
        }
    }

    if let Some(url) = lookup("BRANDALERT_BASE_URL") {
        let url = url.trim().to_string();
        if url.starts_with("http://") || url.starts_with("https://") {
            env_config.base_url = Some(url);
        } else if !url.is_empty() {
            warn!(value = %url, "ignoring invalid BRANDALERT_BASE_URL");
        }
    }

    if let Some(timeout) = lookup("BRANDALERT_TIMEOUT") {
        if parse_timeout_string(&timeout).is_some() {
            env_config.timeout = Some(timeout);
        } else {
            warn!(value = %timeout, "ignoring invalid BRANDALERT_TIMEOUT, use e.g. '5s', '30s', '2m'");
        }
    }

    env_config
}

/// Parse a timeout string ("5s", "2m", "30") into seconds.
///
/// Zero and values too large to count in seconds are rejected.
fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let secs = if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    };

    secs.filter(|&secs| secs > 0)
}
