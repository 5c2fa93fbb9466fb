//! File and environment configuration.
//!
//! Resolution order for each setting:
//! 1. Environment variable (`INWORLD_SIMPLE_API_KEY`, `INWORLD_STUDIO_API_KEY`,
//!    `INWORLD_BASE_URL`)
//! 2. Config file (`~/.config/inworld/config.toml` on Linux)
//!
//! ```toml
//! studio_api_key = "..."
//! simple_api_key = "..."
//! base_url = "https://api.inworld.ai"
//! timeout_secs = 30
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory name under the platform config dir.
const APP_NAME: &str = "inworld";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Environment variable holding the simple API credential.
pub const SIMPLE_API_KEY_ENV: &str = "INWORLD_SIMPLE_API_KEY";

/// Environment variable holding the studio API credential.
pub const STUDIO_API_KEY_ENV: &str = "INWORLD_STUDIO_API_KEY";

/// Environment variable overriding the service host.
pub const BASE_URL_ENV: &str = "INWORLD_BASE_URL";

/// Contents of a config file.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub simple_api_key: Option<String>,
    pub studio_api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("simple_api_key", &self.simple_api_key.as_ref().map(|_| "<redacted>"))
            .field("studio_api_key", &self.studio_api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Parse from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(format!("invalid config: {e}")))
    }

    /// Load from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Platform config file location, e.g. `~/.config/inworld/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Load the file at [`default_path`](Self::default_path). A missing file
    /// yields an empty config.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Apply environment overrides from the process environment.
    pub fn resolve(&self) -> ResolvedConfig {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn resolve_with<F>(&self, lookup: F) -> ResolvedConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        ResolvedConfig {
            simple_api_key: resolve_secret(
                SIMPLE_API_KEY_ENV,
                lookup(SIMPLE_API_KEY_ENV),
                self.simple_api_key.as_deref(),
            ),
            studio_api_key: resolve_secret(
                STUDIO_API_KEY_ENV,
                lookup(STUDIO_API_KEY_ENV),
                self.studio_api_key.as_deref(),
            ),
            base_url: lookup(BASE_URL_ENV).or_else(|| self.base_url.clone()),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn resolve_secret(
    env_var: &str,
    env_value: Option<String>,
    config_value: Option<&str>,
) -> Option<ResolvedSecret> {
    if let Some(value) = env_value {
        return Some(ResolvedSecret {
            value,
            source: SecretSource::EnvVar(env_var.to_string()),
        });
    }

    config_value
        .filter(|value| !value.is_empty())
        .map(|value| ResolvedSecret {
            value: value.to_string(),
            source: SecretSource::ConfigFile,
        })
}

/// Settings after environment overrides, ready for
/// [`ClientBuilder::from_config`](crate::ClientBuilder::from_config).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub simple_api_key: Option<ResolvedSecret>,
    pub studio_api_key: Option<ResolvedSecret>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

/// A credential together with where it came from.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

impl fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file.
    ConfigFile,
}

impl fmt::Display for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {var}"),
            SecretSource::ConfigFile => write!(f, "config file"),
        }
    }
}
