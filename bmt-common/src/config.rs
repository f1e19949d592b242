//! Configuration loading
//!
//! Config file resolution priority:
//! 1. Explicit path (command-line `--config` / `BMT_CONFIG`)
//! 2. `bmt.toml` in the repository root
//! 3. User config directory (`~/.config/bmt/config.toml` on Linux)
//! 4. Compiled defaults
//!
//! An explicitly named file must exist; implicit locations are optional.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Config file name looked up in the repository root
pub const ROOT_CONFIG_FILE: &str = "bmt.toml";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub modrinth: ModrinthConfig,
}

/// Data and output locations, relative to the repository root unless absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_schema_file")]
    pub schema_file: PathBuf,

    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            schema_file: default_schema_file(),
            dist_dir: default_dist_dir(),
        }
    }
}

impl PathsConfig {
    /// Anchor relative paths at `root`
    pub fn resolve(&self, root: &Path) -> PathsConfig {
        PathsConfig {
            data_file: root.join(&self.data_file),
            schema_file: root.join(&self.schema_file),
            dist_dir: root.join(&self.dist_dir),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Remote project lookup used to sanity-check Modrinth IDs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModrinthConfig {
    #[serde(default = "default_modrinth_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// When false, lookups are skipped and treated as unknown
    #[serde(default = "default_verify")]
    pub verify: bool,
}

impl Default for ModrinthConfig {
    fn default() -> Self {
        Self {
            base_url: default_modrinth_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            verify: default_verify(),
        }
    }
}

impl ModrinthConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/mods.json")
}

fn default_schema_file() -> PathBuf {
    PathBuf::from("data/schema.json")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist/api/v1")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_modrinth_base_url() -> String {
    "https://api.modrinth.com/v2".to_string()
}

fn default_user_agent() -> String {
    "BadModTags/1.0 (https://github.com/pyrohost/bad-mod-tags)".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_verify() -> bool {
    true
}

impl TomlConfig {
    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Resolve configuration following the priority order above
    pub fn resolve(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        let root_config = root.join(ROOT_CONFIG_FILE);
        if root_config.exists() {
            info!("Loading config from {}", root_config.display());
            return Self::from_file(&root_config);
        }

        if let Some(user_config) = user_config_path() {
            if user_config.exists() {
                info!("Loading config from {}", user_config.display());
                return Self::from_file(&user_config);
            }
        }

        debug!("No config file found, using compiled defaults");
        Ok(Self::default())
    }
}

/// `<config dir>/bmt/config.toml` for the current platform
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bmt").join("config.toml"))
}
