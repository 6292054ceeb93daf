//! Install session parameters and session lifecycle callbacks

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// `PackageInstaller.SessionParams` mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionMode {
    #[default]
    FullInstall,
    InheritExisting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InstallLocation {
    #[default]
    Auto,
    InternalOnly,
    PreferExternal,
}

impl InstallLocation {
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Auto => 0,
            Self::InternalOnly => 1,
            Self::PreferExternal => 2,
        }
    }
}

/// `PackageManager.INSTALL_REASON_*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallReason {
    Unknown,
    Policy,
    DeviceRestore,
    DeviceSetup,
    User,
}

impl InstallReason {
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Policy => 1,
            Self::DeviceRestore => 2,
            Self::DeviceSetup => 3,
            Self::User => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserActionRequirement {
    Unspecified,
    Required,
    NotRequired,
}

/// `PackageInstaller.PACKAGE_SOURCE_*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageSource {
    Unspecified,
    Other,
    Store,
    LocalFile,
    DownloadedFile,
}

/// Parameters for a new install session. Optional fields are left unset when
/// the running OS does not know them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub mode: SessionMode,
    pub app_package_name: Option<String>,
    pub install_location: InstallLocation,
    pub originating_uid: Option<u32>,
    pub install_reason: Option<InstallReason>,
    pub require_user_action: Option<UserActionRequirement>,
    pub package_source: Option<PackageSource>,
    pub installer_package_name: Option<String>,
    pub request_update_ownership: bool,
    pub application_enabled_setting_persistent: bool,
}

impl SessionParams {
    #[must_use]
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

/// Session lifecycle notification delivered to registered callbacks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Created { session_id: i32 },
    Progress { session_id: i32, progress: f32 },
    Finished { session_id: i32, success: bool },
}

impl SessionEvent {
    #[must_use]
    pub const fn session_id(&self) -> i32 {
        match self {
            Self::Created { session_id }
            | Self::Progress { session_id, .. }
            | Self::Finished { session_id, .. } => *session_id,
        }
    }
}

pub type SessionEventSender = mpsc::UnboundedSender<SessionEvent>;
pub type SessionEventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Channel pair for session callbacks
#[must_use]
pub fn session_channel() -> (SessionEventSender, SessionEventReceiver) {
    mpsc::unbounded_channel()
}
