//! Configuration management for the config-stubs CLI.
//!
//! The configuration is stored in TOML format. Stub options sit at the top
//! level of the file; the `[output]` and `[github]` tables hold settings
//! that only concern the CLI.
//!
//! Every option has a default, so a missing configuration file is only an
//! error when its path was given explicitly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use config_stubs_core::StubsConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "config-stubs.toml";

/// Default directory the generated documents are written to
pub const DEFAULT_OUTPUT_DIR: &str = "site";

/// Environment variable holding an optional GitHub token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the config-stubs CLI application.
///
/// # Example TOML Configuration
///
/// ```toml
/// repo = "ACCESS-NRI/access-om3-configs"
/// stubs_parent_url = "configurations"
///
/// [main_website]
/// pattern = "release-*"
///
/// [preview_website]
/// pattern = "dev-*"
/// no_main = true
///
/// [output]
/// dir = "docs/generated"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Stub discovery configuration
    #[serde(flatten)]
    pub stubs: StubsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub github: GitHubConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// * `Error::Config` - the file does not exist.
    /// * `Error::LoadFile` - the file cannot be read.
    /// * `Error::ParseTomlFile` - the file is not valid TOML or does not
    ///   match the configuration schema.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(Error::LoadFile)?;
        let config: AppConfig = toml::from_str(&content).map_err(Error::ParseTomlFile)?;

        Ok(config)
    }

    /// Loads the configuration for a command.
    ///
    /// An explicit `config_path` must exist. Without one, the default file
    /// in the current directory is used when present and the built-in
    /// defaults otherwise.
    pub fn resolve(config_path: Option<&str>) -> Result<Self, Error> {
        let path = get_config_path(config_path);
        if config_path.is_none() && !path.exists() {
            info!(
                path = ?path,
                "No configuration file found, using default configuration"
            );
            return Ok(Self::default());
        }

        let config = Self::load(&path)?;
        info!(path = ?path, "Configuration loaded");
        Ok(config)
    }

    /// Saves the configuration to a TOML file at the specified path.
    ///
    /// Creates parent directories if they don't exist and overwrites any
    /// existing file.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}

/// Where the generated documents are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_dir")]
    pub dir: String,
}

impl OutputConfig {
    fn default_dir() -> String {
        DEFAULT_OUTPUT_DIR.to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: OutputConfig::default_dir(),
        }
    }
}

/// GitHub API settings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Base URI of the GitHub API; the public API when omitted.
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Resolves the path to the configuration file.
///
/// If `config_path` is `Some(path)` that path is returned, otherwise
/// `./config-stubs.toml` in the current directory.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
