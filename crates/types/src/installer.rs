//! Installer backend identities and descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Application id of the store itself
pub const APPLICATION_ID: &str = "com.aurora.store";

/// Product variants of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Release,
    Nightly,
    Debug,
}

impl BuildType {
    pub const ALL: [Self; 3] = [Self::Release, Self::Nightly, Self::Debug];

    #[must_use]
    pub fn package_name(self) -> &'static str {
        match self {
            Self::Release => APPLICATION_ID,
            Self::Nightly => "com.aurora.store.nightly",
            Self::Debug => "com.aurora.store.debug",
        }
    }

    /// Package names of every variant
    #[must_use]
    pub fn package_names() -> Vec<String> {
        Self::ALL
            .iter()
            .map(|build| build.package_name().to_string())
            .collect()
    }
}

/// Closed set of installer backends. The discriminant is the id persisted in
/// the user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallerKind {
    Session,
    Native,
    Root,
    Service,
    AppManager,
    Shizuku,
    DeviceOwner,
}

impl InstallerKind {
    pub const ALL: [Self; 7] = [
        Self::Session,
        Self::Native,
        Self::Root,
        Self::Service,
        Self::AppManager,
        Self::Shizuku,
        Self::DeviceOwner,
    ];

    /// Stable id stored in the preference
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Session => 0,
            Self::Native => 1,
            Self::Root => 2,
            Self::Service => 3,
            Self::AppManager => 4,
            Self::Shizuku => 5,
            Self::DeviceOwner => 6,
        }
    }

    /// Resolve a persisted id; ids written by a newer release fall back to
    /// the session installer
    #[must_use]
    pub fn from_id(id: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .unwrap_or(Self::Session)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Native => "native",
            Self::Root => "root",
            Self::Service => "service",
            Self::AppManager => "app_manager",
            Self::Shizuku => "shizuku",
            Self::DeviceOwner => "device_owner",
        }
    }
}

impl Default for InstallerKind {
    fn default() -> Self {
        Self::Session
    }
}

impl fmt::Display for InstallerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Implement clap::ValueEnum for InstallerKind
impl clap::ValueEnum for InstallerKind {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Static descriptor of a backend, shown in the installer picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerInfo {
    pub id: u8,
    pub installer: InstallerKind,
    /// Store variants that offer this backend
    pub package_names: Vec<String>,
    /// Package names recorded as installer of apps installed by this backend
    pub installer_package_names: Vec<String>,
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

impl InstallerInfo {
    /// Descriptor offered by every store variant
    pub fn new(
        installer: InstallerKind,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: installer.id(),
            installer,
            package_names: BuildType::package_names(),
            installer_package_names: BuildType::package_names(),
            title: title.into(),
            subtitle: subtitle.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn with_installer_package_names(mut self, names: Vec<String>) -> Self {
        self.installer_package_names = names;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_and_unknown_falls_back() {
        for kind in InstallerKind::ALL {
            assert_eq!(InstallerKind::from_id(kind.id()), kind);
        }
        assert_eq!(InstallerKind::from_id(42), InstallerKind::Session);
    }
}
