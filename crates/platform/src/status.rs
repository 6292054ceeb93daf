//! Commit results and package change notifications

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::intent::Intent;

/// `PackageInstaller.STATUS_*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallStatusCode {
    PendingUserAction,
    Success,
    Failure,
    FailureBlocked,
    FailureAborted,
    FailureInvalid,
    FailureConflict,
    FailureStorage,
    FailureIncompatible,
    FailureTimeout,
    Unknown(i32),
}

impl InstallStatusCode {
    #[must_use]
    pub const fn from_raw(code: i32) -> Self {
        match code {
            -1 => Self::PendingUserAction,
            0 => Self::Success,
            1 => Self::Failure,
            2 => Self::FailureBlocked,
            3 => Self::FailureAborted,
            4 => Self::FailureInvalid,
            5 => Self::FailureConflict,
            6 => Self::FailureStorage,
            7 => Self::FailureIncompatible,
            8 => Self::FailureTimeout,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::PendingUserAction => -1,
            Self::Success => 0,
            Self::Failure => 1,
            Self::FailureBlocked => 2,
            Self::FailureAborted => 3,
            Self::FailureInvalid => 4,
            Self::FailureConflict => 5,
            Self::FailureStorage => 6,
            Self::FailureIncompatible => 7,
            Self::FailureTimeout => 8,
            Self::Unknown(code) => code,
        }
    }

    /// Classify a `pm` failure token such as `INSTALL_FAILED_INSUFFICIENT_STORAGE`
    #[must_use]
    pub fn from_failure_reason(reason: &str) -> Self {
        const BLOCKED: &[&str] = &[
            "INSTALL_FAILED_USER_RESTRICTED",
            "INSTALL_FAILED_VERIFICATION_FAILURE",
            "INSTALL_FAILED_VERIFICATION_TIMEOUT",
        ];
        const CONFLICT: &[&str] = &[
            "INSTALL_FAILED_ALREADY_EXISTS",
            "INSTALL_FAILED_CONFLICTING_PROVIDER",
            "INSTALL_FAILED_DUPLICATE_PACKAGE",
            "INSTALL_FAILED_UPDATE_INCOMPATIBLE",
            "INSTALL_FAILED_SHARED_USER_INCOMPATIBLE",
            "INSTALL_FAILED_VERSION_DOWNGRADE",
        ];
        const INCOMPATIBLE: &[&str] = &[
            "INSTALL_FAILED_OLDER_SDK",
            "INSTALL_FAILED_NEWER_SDK",
            "INSTALL_FAILED_CPU_ABI_INCOMPATIBLE",
            "INSTALL_FAILED_MISSING_SHARED_LIBRARY",
            "INSTALL_FAILED_MISSING_FEATURE",
            "INSTALL_FAILED_DEPRECATED_SDK_VERSION",
        ];

        let token = reason.trim();
        if token.starts_with("INSTALL_FAILED_ABORTED") {
            Self::FailureAborted
        } else if token.starts_with("INSTALL_FAILED_INSUFFICIENT_STORAGE") {
            Self::FailureStorage
        } else if token.starts_with("INSTALL_FAILED_INVALID_APK")
            || token.starts_with("INSTALL_PARSE_FAILED")
        {
            Self::FailureInvalid
        } else if BLOCKED.iter().any(|p| token.starts_with(p)) {
            Self::FailureBlocked
        } else if CONFLICT.iter().any(|p| token.starts_with(p)) {
            Self::FailureConflict
        } else if INCOMPATIBLE.iter().any(|p| token.starts_with(p)) {
            Self::FailureIncompatible
        } else {
            Self::Failure
        }
    }

    /// Readable explanation for a failed status
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::PendingUserAction => "Waiting for user confirmation",
            Self::Success => "Installed successfully",
            Self::Failure | Self::Unknown(_) => "Installation failed",
            Self::FailureBlocked => "Installation was blocked",
            Self::FailureAborted => "Installation was aborted",
            Self::FailureInvalid => "Package is invalid or corrupt",
            Self::FailureConflict => "Package conflicts with an installed app",
            Self::FailureStorage => "Not enough storage space",
            Self::FailureIncompatible => "Package is incompatible with this device",
            Self::FailureTimeout => "Installation timed out",
        }
    }
}

/// Extras attached to the status target of a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusExtras {
    pub session_id: i32,
    pub package_name: String,
    pub version_code: i64,
    pub display_name: Option<String>,
}

/// Result of a committed session as delivered by the OS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallStatus {
    pub extras: StatusExtras,
    pub code: InstallStatusCode,
    pub message: Option<String>,
    pub confirmation: Option<Intent>,
}

impl InstallStatus {
    #[must_use]
    pub fn new(extras: StatusExtras, code: InstallStatusCode) -> Self {
        Self {
            extras,
            code,
            message: None,
            confirmation: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_confirmation(mut self, intent: Intent) -> Self {
        self.confirmation = Some(intent);
        self
    }
}

pub type StatusSender = mpsc::UnboundedSender<InstallStatus>;
pub type StatusReceiver = mpsc::UnboundedReceiver<InstallStatus>;

#[must_use]
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    mpsc::unbounded_channel()
}

/// Status target handed to a commit; the platform replies on `reply`
#[derive(Debug, Clone)]
pub struct StatusIntent {
    pub extras: StatusExtras,
    pub reply: StatusSender,
}

impl StatusIntent {
    /// Deliver a status for this target. A closed receiver is ignored.
    pub fn deliver(&self, code: InstallStatusCode, message: Option<String>) {
        let status = InstallStatus {
            extras: self.extras.clone(),
            code,
            message,
            confirmation: None,
        };
        let _ = self.reply.send(status);
    }
}

/// Package added/removed notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageEvent {
    Added { package_name: String },
    Removed { package_name: String },
}

pub type PackageEventSender = mpsc::UnboundedSender<PackageEvent>;
pub type PackageEventReceiver = mpsc::UnboundedReceiver<PackageEvent>;

#[must_use]
pub fn package_event_channel() -> (PackageEventSender, PackageEventReceiver) {
    mpsc::unbounded_channel()
}
