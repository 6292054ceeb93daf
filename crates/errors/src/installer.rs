//! Installer backend error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum InstallerError {
    #[error("failed to stage {package}: {message}")]
    StagingFailed { package: String, message: String },

    #[error("failed to commit session {session_id} for {package}: {message}")]
    CommitFailed {
        package: String,
        session_id: i32,
        message: String,
    },

    #[error("session {session_id} for {package} is no longer valid")]
    SessionInvalid { package: String, session_id: i32 },

    #[error("dependency {dependency} of {package} failed to install")]
    DependencyFailed { package: String, dependency: String },

    #[error("Device Owner permission required")]
    DeviceOwnerRequired,

    #[error("split APKs are not supported by this installer: {package}")]
    SplitsUnsupported { package: String },

    #[error("no APK files to install for {package}")]
    NoFiles { package: String },

    #[error("installer backend unavailable: {backend}")]
    BackendUnavailable { backend: String },

    #[error("privileged service rejected {package}: code {code}")]
    ServiceRejected {
        package: String,
        code: i32,
        message: Option<String>,
    },

    #[error("this app is not the device owner")]
    NotDeviceOwner,

    #[error("target package not installed: {package}")]
    TargetNotInstalled { package: String },

    #[error("{package} has no device admin receiver")]
    AdminReceiverMissing { package: String },

    #[error("operation requires API level {required}, device runs {current}")]
    UnsupportedSdk { required: u32, current: u32 },
}

impl UserFacingError for InstallerError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DeviceOwnerRequired | Self::NotDeviceOwner => Some(
                "Provision the app as device owner with `dpm set-device-owner` or pick another installer.",
            ),
            Self::SplitsUnsupported { .. } => {
                Some("Switch to the session installer to install split APKs.")
            }
            Self::BackendUnavailable { .. } => {
                Some("Check that the selected installer's companion app or permission is still available.")
            }
            Self::StagingFailed { .. } => Some("Check free storage and re-download the package."),
            Self::AdminReceiverMissing { .. } => {
                Some("The target app must declare a DeviceAdminReceiver to accept ownership.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StagingFailed { .. } | Self::CommitFailed { .. } | Self::SessionInvalid { .. }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::StagingFailed { .. } => "installer.staging_failed",
            Self::CommitFailed { .. } => "installer.commit_failed",
            Self::SessionInvalid { .. } => "installer.session_invalid",
            Self::DependencyFailed { .. } => "installer.dependency_failed",
            Self::DeviceOwnerRequired => "installer.device_owner_required",
            Self::SplitsUnsupported { .. } => "installer.splits_unsupported",
            Self::NoFiles { .. } => "installer.no_files",
            Self::BackendUnavailable { .. } => "installer.backend_unavailable",
            Self::ServiceRejected { .. } => "installer.service_rejected",
            Self::NotDeviceOwner => "installer.not_device_owner",
            Self::TargetNotInstalled { .. } => "installer.target_not_installed",
            Self::AdminReceiverMissing { .. } => "installer.admin_receiver_missing",
            Self::UnsupportedSdk { .. } => "installer.unsupported_sdk",
        })
    }
}
