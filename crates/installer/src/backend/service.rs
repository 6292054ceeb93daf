//! Installs through the privileged companion

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use aurora_errors::{Error, InstallerError, PlatformError};
use aurora_platform::{InstallStatusCode, SessionEventSender};
use aurora_types::{InstallerKind, SessionInfo};
use dashmap::DashMap;
use tracing::debug;

use super::queued::{CommitOutcome, QueuedInstaller, SessionTransport};
use crate::base::InstallerBase;

/// Collects files under synthetic session ids and hands them to the
/// companion on commit
pub struct ServiceTransport {
    base: InstallerBase,
    next_id: AtomicI32,
    sessions: DashMap<i32, (String, Vec<PathBuf>)>,
}

impl ServiceTransport {
    #[must_use]
    pub fn new(base: InstallerBase) -> Self {
        Self {
            base,
            next_id: AtomicI32::new(1),
            sessions: DashMap::new(),
        }
    }
}

#[async_trait]
impl SessionTransport for ServiceTransport {
    async fn create(&self, package_name: &str) -> Result<i32, Error> {
        let session_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .insert(session_id, (package_name.to_string(), Vec::new()));
        Ok(session_id)
    }

    async fn write(&self, session_id: i32, _name: &str, path: &Path) -> Result<(), Error> {
        tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;
        let mut session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(PlatformError::SessionNotFound { session_id })?;
        session.1.push(path.to_path_buf());
        Ok(())
    }

    async fn abandon(&self, session_id: i32) -> Result<(), Error> {
        self.sessions.remove(&session_id);
        Ok(())
    }

    async fn is_valid(&self, session_id: i32) -> Result<bool, Error> {
        Ok(self.sessions.contains_key(&session_id))
    }

    async fn commit(&self, session: &SessionInfo) -> Result<CommitOutcome, Error> {
        let (package_name, files) = self
            .sessions
            .remove(&session.session_id)
            .map(|(_, entry)| entry)
            .ok_or(PlatformError::SessionNotFound {
                session_id: session.session_id,
            })?;

        debug!(package = %package_name, files = files.len(), "handing files to privileged service");
        let result = self
            .base
            .platform()
            .privileged_service()
            .install_packages(&package_name, &files)
            .await?;

        if result.code == InstallStatusCode::Success {
            return Ok(CommitOutcome::Completed(Ok(())));
        }
        Ok(CommitOutcome::Completed(Err(InstallerError::ServiceRejected {
            package: package_name,
            code: result.code.raw(),
            message: result.message,
        }
        .into())))
    }

    async fn register(&self, _sender: SessionEventSender) -> Result<(), Error> {
        Ok(())
    }
}

#[must_use]
pub fn service_installer(base: InstallerBase) -> QueuedInstaller {
    let transport = ServiceTransport::new(base.clone());
    QueuedInstaller::new(InstallerKind::Service, base, Box::new(transport))
}
