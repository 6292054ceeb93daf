//! `pm install-*` through a root shell

use std::path::Path;

use async_trait::async_trait;
use aurora_errors::{Error, InstallerError, PlatformError};
use aurora_platform::{pm, InstallStatusCode, SessionEventSender};
use aurora_types::{InstallerKind, SessionInfo};
use dashmap::DashSet;

use super::queued::{CommitOutcome, QueuedInstaller, SessionTransport};
use crate::base::InstallerBase;
use crate::params::{session_params, ParamsProfile};

/// Root sessions complete synchronously, so there are no callbacks to register
pub struct RootTransport {
    base: InstallerBase,
    sessions: DashSet<i32>,
}

impl RootTransport {
    #[must_use]
    pub fn new(base: InstallerBase) -> Self {
        Self {
            base,
            sessions: DashSet::new(),
        }
    }

    async fn exec(&self, args: Vec<String>) -> Result<String, PlatformError> {
        let output = self.base.platform().root_shell().exec(&args).await?;
        if output.success() {
            Ok(output.combined())
        } else {
            Err(PlatformError::ProcessExecutionFailed {
                command: args.join(" "),
                message: output.combined(),
            })
        }
    }
}

#[async_trait]
impl SessionTransport for RootTransport {
    async fn create(&self, package_name: &str) -> Result<i32, Error> {
        let params = session_params(
            self.base.platform().device(),
            package_name,
            ParamsProfile::SESSION,
        );
        let output = self.exec(pm::install_create_args(&params)).await?;
        let session_id = pm::parse_session_id(&output)?;
        self.sessions.insert(session_id);
        Ok(session_id)
    }

    async fn write(&self, session_id: i32, name: &str, path: &Path) -> Result<(), Error> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?
            .len();
        let output = self
            .exec(pm::install_write_args(session_id, name, path, size))
            .await?;
        if output.contains("Success") {
            Ok(())
        } else {
            Err(PlatformError::SessionOperationFailed {
                operation: "write".to_string(),
                session_id,
                message: output,
            }
            .into())
        }
    }

    async fn abandon(&self, session_id: i32) -> Result<(), Error> {
        self.sessions.remove(&session_id);
        self.exec(pm::install_abandon_args(session_id)).await?;
        Ok(())
    }

    async fn is_valid(&self, session_id: i32) -> Result<bool, Error> {
        Ok(self.sessions.contains(&session_id))
    }

    async fn commit(&self, session: &SessionInfo) -> Result<CommitOutcome, Error> {
        self.sessions.remove(&session.session_id);
        let output = self
            .base
            .platform()
            .root_shell()
            .exec(&pm::install_commit_args(session.session_id))
            .await?;
        let (code, message) = pm::parse_commit_outcome(&output.combined());
        if code == InstallStatusCode::Success {
            return Ok(CommitOutcome::Completed(Ok(())));
        }
        Ok(CommitOutcome::Completed(Err(InstallerError::CommitFailed {
            package: session.package_name.clone(),
            session_id: session.session_id,
            message: message.unwrap_or_else(|| code.describe().to_string()),
        }
        .into())))
    }

    async fn register(&self, _sender: SessionEventSender) -> Result<(), Error> {
        Ok(())
    }
}

#[must_use]
pub fn root_installer(base: InstallerBase) -> QueuedInstaller {
    let transport = RootTransport::new(base.clone());
    QueuedInstaller::new(InstallerKind::Root, base, Box::new(transport))
}
