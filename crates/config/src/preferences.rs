//! Persisted installer preference

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use aurora_errors::{ConfigError, Error};
use aurora_types::InstallerKind;
use tracing::warn;

use crate::Config;

/// Source of the user's installer choice. Reads are cheap and never fail so
/// the selector can consult the store on every install.
pub trait PreferenceStore: Send + Sync {
    /// Persisted installer id (0 = session)
    fn installer_id(&self) -> u8;

    /// Persist a new installer id
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be written.
    fn set_installer_id(&self, id: u8) -> Result<(), Error>;

    /// Persisted id resolved to a backend identity
    fn installer_kind(&self) -> InstallerKind {
        InstallerKind::from_id(self.installer_id())
    }
}

/// Preference kept in memory only
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    installer_id: AtomicU8,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new(installer: InstallerKind) -> Self {
        Self {
            installer_id: AtomicU8::new(installer.id()),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn installer_id(&self) -> u8 {
        self.installer_id.load(Ordering::SeqCst)
    }

    fn set_installer_id(&self, id: u8) -> Result<(), Error> {
        self.installer_id.store(id, Ordering::SeqCst);
        Ok(())
    }
}

/// Preference backed by the TOML configuration file
///
/// Only `installer.installer_id` is written; the rest of the file is kept as
/// found on disk, so env and command-line overrides never become persistent.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    installer_id: AtomicU8,
}

impl FilePreferenceStore {
    /// Store over `path`, starting from the effective id of this run
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, installer_id: u8) -> Self {
        Self {
            path: path.into(),
            installer_id: AtomicU8::new(installer_id),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_on_disk(&self) -> Result<Config, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| {
                ConfigError::ParseError {
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(ConfigError::NotFound {
                path: format!("{}: {e}", self.path.display()),
            }
            .into()),
        }
    }

    fn write_on_disk(&self, contents: String) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: parent.display().to_string(),
                error: e.to_string(),
            })?;
        }
        std::fs::write(&self.path, contents).map_err(|e| {
            ConfigError::WriteError {
                path: self.path.display().to_string(),
                error: e.to_string(),
            }
            .into()
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn installer_id(&self) -> u8 {
        self.installer_id.load(Ordering::SeqCst)
    }

    fn set_installer_id(&self, id: u8) -> Result<(), Error> {
        let mut on_disk = self.read_on_disk()?;
        on_disk.installer.installer_id = id;
        if let Err(e) = self.write_on_disk(on_disk.to_toml()?) {
            warn!(path = %self.path.display(), error = %e, "installer preference not saved");
            return Err(e);
        }
        self.installer_id.store(id, Ordering::SeqCst);
        Ok(())
    }
}
