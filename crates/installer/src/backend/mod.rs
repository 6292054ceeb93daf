//! Installer backends
//!
//! Every backend implements [`InstallerBackend`]. Those that stage OS
//! sessions share [`QueuedInstaller`] and differ only in their
//! [`SessionTransport`].

pub mod app_manager;
pub mod device_owner;
pub mod native;
pub mod queued;
pub mod root;
pub mod service;
pub mod session;
pub mod shizuku;

use async_trait::async_trait;
use aurora_platform::{SessionEvent, SessionEventReceiver};
use aurora_types::{Download, InstallerInfo, InstallerKind};

pub use app_manager::AppManagerInstaller;
pub use device_owner::DeviceOwnerAdmin;
pub use native::NativeInstaller;
pub use queued::{CommitOutcome, QueuedInstaller, SessionTransport};

/// A strategy for getting a download onto the device.
///
/// `install` never fails: every outcome is reported through installer events.
#[async_trait]
pub trait InstallerBackend: Send + Sync {
    fn kind(&self) -> InstallerKind;

    fn info(&self) -> InstallerInfo {
        crate::info::installer_info(self.kind())
    }

    async fn install(&self, download: &Download);

    /// Hand out the receiving end of this backend's session callbacks, once
    fn take_session_events(&self) -> Option<SessionEventReceiver> {
        None
    }

    /// Register session callbacks with the OS; repeated calls are no-ops
    async fn register_callbacks(&self) {}

    /// React to a session lifecycle notification
    async fn handle_session_event(&self, _event: SessionEvent) {}
}
