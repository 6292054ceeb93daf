use aurora_errors::{Error, UserFacingError};
use serde::{Deserialize, Serialize};

/// Install lifecycle signals published by the installer backends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallerEvent {
    /// The OS reported staging/commit progress (0.0..=1.0)
    Installing { package_name: String, progress: f32 },

    /// The package is now installed
    Installed { package_name: String },

    /// The package was removed from the device
    Uninstalled { package_name: String },

    /// The install request ended without installing the package
    Failed {
        package_name: String,
        error: Option<String>,
        extra: Option<String>,
    },
}

impl InstallerEvent {
    pub fn installing(package_name: impl Into<String>, progress: f32) -> Self {
        Self::Installing {
            package_name: package_name.into(),
            progress,
        }
    }

    pub fn installed(package_name: impl Into<String>) -> Self {
        Self::Installed {
            package_name: package_name.into(),
        }
    }

    pub fn uninstalled(package_name: impl Into<String>) -> Self {
        Self::Uninstalled {
            package_name: package_name.into(),
        }
    }

    pub fn failed(
        package_name: impl Into<String>,
        error: Option<String>,
        extra: Option<String>,
    ) -> Self {
        Self::Failed {
            package_name: package_name.into(),
            error,
            extra,
        }
    }

    /// Failure carrying the user-facing message and the full error detail
    pub fn failed_with_error(package_name: impl Into<String>, error: &Error) -> Self {
        Self::failed(
            package_name,
            Some(error.user_message().into_owned()),
            Some(error.detail()),
        )
    }

    /// Package the event refers to
    #[must_use]
    pub fn package_name(&self) -> &str {
        match self {
            Self::Installing { package_name, .. }
            | Self::Installed { package_name }
            | Self::Uninstalled { package_name }
            | Self::Failed { package_name, .. } => package_name,
        }
    }
}
