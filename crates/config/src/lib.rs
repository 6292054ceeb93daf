#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for the Aurora installer
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/aurora/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;
pub mod preferences;

pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};

use aurora_errors::{ConfigError, Error};
use aurora_types::{installer::APPLICATION_ID, InstallerKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub installer: InstallerConfig,

    #[serde(default)]
    pub platform: PlatformConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// Installer selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Persisted backend id (0 = session)
    #[serde(default)]
    pub installer_id: u8,
    /// Package name the store runs as
    #[serde(default = "default_own_package")]
    pub own_package: String,
}

/// How the device shell is reached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformConfig {
    #[serde(default = "default_su")]
    pub su: String,
    /// Pretend to run on this API level instead of querying `getprop`
    #[serde(default)]
    pub sdk_override: Option<u32>,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PathConfig {
    pub download_dir: Option<PathBuf>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            installer_id: InstallerKind::Session.id(),
            own_package: default_own_package(),
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            su: default_su(),
            sdk_override: None,
        }
    }
}

fn default_own_package() -> String {
    APPLICATION_ID.to_string()
}

fn default_su() -> String {
    "su".to_string()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Serialize to TOML
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializeError {
                error: e.to_string(),
            }
            .into()
        })
    }

    /// Write configuration to file, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub async fn save_to_file(&self, path: &Path) -> Result<(), Error> {
        let contents = self.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError {
                    path: parent.display().to_string(),
                    error: e.to_string(),
                })?;
        }
        fs::write(path, contents)
            .await
            .map_err(|e| {
                ConfigError::WriteError {
                    path: path.display().to_string(),
                    error: e.to_string(),
                }
                .into()
            })
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // AURORA_INSTALLER_ID
        if let Ok(id) = std::env::var("AURORA_INSTALLER_ID") {
            self.installer.installer_id = id.parse().map_err(|_| ConfigError::InvalidValue {
                field: "AURORA_INSTALLER_ID".to_string(),
                value: id,
            })?;
        }

        // AURORA_OWN_PACKAGE
        if let Ok(package) = std::env::var("AURORA_OWN_PACKAGE") {
            if package.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "AURORA_OWN_PACKAGE".to_string(),
                    value: package,
                }
                .into());
            }
            self.installer.own_package = package;
        }

        // AURORA_SDK
        if let Ok(sdk) = std::env::var("AURORA_SDK") {
            self.platform.sdk_override = Some(sdk.parse().map_err(|_| {
                ConfigError::InvalidValue {
                    field: "AURORA_SDK".to_string(),
                    value: sdk,
                }
            })?);
        }

        Ok(())
    }

    /// Installer chosen in the configuration
    #[must_use]
    pub fn installer_kind(&self) -> InstallerKind {
        InstallerKind::from_id(self.installer.installer_id)
    }
}
