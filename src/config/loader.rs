//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fs::paths::profile_dir;

/// Location of the configuration file when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "Configurations/public_profile.yml";

/// Default fetch timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Name of the default staging folder inside the profile directory.
pub const STAGING_DIR_NAME: &str = ".staging";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Public profile to archive.
    #[serde(default)]
    pub username: String,

    /// Base directory; the profile folder is created beneath it.
    #[serde(default)]
    pub save_directory: Option<PathBuf>,

    /// Wall-clock limit for the fetch stage, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Where downloads land before being moved into per-post folders.
    #[serde(default)]
    pub staging_directory: Option<PathBuf>,

    /// Whether to try collecting story highlights (needs a logged-in session).
    #[serde(default)]
    pub download_highlights: bool,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            save_directory: None,
            timeout: default_timeout(),
            staging_directory: None,
            download_highlights: false,
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36".to_string()
}

impl Config {
    /// Load configuration from a YAML file (or TOML, by `.toml` extension).
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        Self::parse(&content, is_toml(path))
    }

    /// Parse configuration text.
    pub fn parse(content: &str, toml: bool) -> Result<Self> {
        let config: Config = if toml {
            toml::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        Ok(config)
    }

    /// Get the effective base directory.
    pub fn save_directory(&self) -> PathBuf {
        self.save_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the profile folder under the base directory.
    pub fn profile_directory(&self) -> Result<PathBuf> {
        profile_dir(&self.save_directory(), &self.username)
    }

    /// Get the effective staging directory.
    pub fn staging_directory(&self) -> Result<PathBuf> {
        match &self.staging_directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.profile_directory()?.join(STAGING_DIR_NAME)),
        }
    }

    /// Get the fetch timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}
