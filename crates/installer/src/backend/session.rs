//! Transport over the OS `PackageInstaller`

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use aurora_errors::{Error, InstallerError};
use aurora_platform::{PackageInstallerOperations, SessionEventSender};
use aurora_types::{Download, InstallerKind, SessionInfo};

use super::queued::{CommitOutcome, QueuedInstaller, SessionTransport};
use crate::base::InstallerBase;
use crate::capability::CapabilityDetector;
use crate::params::{session_params, ParamsProfile};

/// Where the package installer handle comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerSource {
    /// This app's own `PackageInstaller`
    Platform,
    /// Obtained through the Shizuku binder on every call
    Shizuku,
}

pub struct PackageInstallerTransport {
    base: InstallerBase,
    source: InstallerSource,
    profile: ParamsProfile,
    require_device_owner: bool,
}

impl PackageInstallerTransport {
    #[must_use]
    pub fn new(base: InstallerBase, source: InstallerSource, profile: ParamsProfile) -> Self {
        Self {
            base,
            source,
            profile,
            require_device_owner: false,
        }
    }

    /// Refuse installs unless this app is device owner
    #[must_use]
    pub fn requiring_device_owner(mut self) -> Self {
        self.require_device_owner = true;
        self
    }

    async fn installer(&self) -> Result<Arc<dyn PackageInstallerOperations>, Error> {
        match self.source {
            InstallerSource::Platform => Ok(self.base.platform().package_installer().clone()),
            InstallerSource::Shizuku => {
                Ok(self.base.platform().shizuku().package_installer().await?)
            }
        }
    }
}

#[async_trait]
impl SessionTransport for PackageInstallerTransport {
    async fn preflight(&self, _download: &Download) -> Result<(), Error> {
        if self.require_device_owner
            && !CapabilityDetector::new(self.base.platform().clone())
                .is_device_owner()
                .await
        {
            return Err(InstallerError::DeviceOwnerRequired.into());
        }
        Ok(())
    }

    async fn create(&self, package_name: &str) -> Result<i32, Error> {
        let params = session_params(self.base.platform().device(), package_name, self.profile);
        Ok(self.installer().await?.create_session(&params).await?)
    }

    async fn write(&self, session_id: i32, name: &str, path: &Path) -> Result<(), Error> {
        Ok(self
            .installer()
            .await?
            .write_session(session_id, name, path)
            .await?)
    }

    async fn abandon(&self, session_id: i32) -> Result<(), Error> {
        Ok(self.installer().await?.abandon_session(session_id).await?)
    }

    async fn is_valid(&self, session_id: i32) -> Result<bool, Error> {
        Ok(self.installer().await?.session_exists(session_id).await?)
    }

    async fn commit(&self, session: &SessionInfo) -> Result<CommitOutcome, Error> {
        let status = self.base.status_intent(session);
        self.installer()
            .await?
            .commit_session(session.session_id, status)
            .await
            .map_err(|e| InstallerError::CommitFailed {
                package: session.package_name.clone(),
                session_id: session.session_id,
                message: e.to_string(),
            })?;
        Ok(CommitOutcome::Pending)
    }

    async fn register(&self, sender: SessionEventSender) -> Result<(), Error> {
        Ok(self
            .installer()
            .await?
            .register_session_callback(sender)
            .await?)
    }
}

/// Default backend: sessions on this app's own package installer
#[must_use]
pub fn session_installer(base: InstallerBase) -> QueuedInstaller {
    let transport = PackageInstallerTransport::new(
        base.clone(),
        InstallerSource::Platform,
        ParamsProfile::SESSION,
    );
    QueuedInstaller::new(InstallerKind::Session, base, Box::new(transport))
}
