//! Package installer sessions

use std::path::Path;

use async_trait::async_trait;
use aurora_errors::PlatformError;

use crate::session::{SessionEventSender, SessionParams};
use crate::status::StatusIntent;

/// Trait for `PackageInstaller` session operations
#[async_trait]
pub trait PackageInstallerOperations: Send + Sync {
    /// Open a session and return its id
    async fn create_session(&self, params: &SessionParams) -> Result<i32, PlatformError>;

    /// Stream `path` into the session under `name`
    async fn write_session(
        &self,
        session_id: i32,
        name: &str,
        path: &Path,
    ) -> Result<(), PlatformError>;

    async fn abandon_session(&self, session_id: i32) -> Result<(), PlatformError>;

    /// Whether the OS still knows the session
    async fn session_exists(&self, session_id: i32) -> Result<bool, PlatformError>;

    /// Commit the session; the result is delivered to `status`
    async fn commit_session(
        &self,
        session_id: i32,
        status: StatusIntent,
    ) -> Result<(), PlatformError>;

    /// Deliver lifecycle notifications for every session to `sender`
    async fn register_session_callback(
        &self,
        sender: SessionEventSender,
    ) -> Result<(), PlatformError>;
}
