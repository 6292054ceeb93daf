//! Install sessions driven through `pm install-*`

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aurora_errors::PlatformError;
use dashmap::DashSet;
use tracing::{debug, info, warn};

use crate::installer::PackageInstallerOperations;
use crate::pm;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};
use crate::session::{SessionEvent, SessionEventSender, SessionParams};
use crate::status::{InstallStatusCode, StatusIntent};

pub struct ShellPackageInstaller {
    process: Arc<dyn ProcessOperations>,
    sessions: DashSet<i32>,
    callbacks: Mutex<Vec<SessionEventSender>>,
}

impl ShellPackageInstaller {
    pub fn new(process: Arc<dyn ProcessOperations>) -> Self {
        Self {
            process,
            sessions: DashSet::new(),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<CommandOutput, PlatformError> {
        let mut iter = args.into_iter();
        let program = iter.next().unwrap_or_default();
        let mut cmd = PlatformCommand::new(&program);
        cmd.args(iter);
        self.process.execute_command(cmd).await
    }

    fn notify(&self, event: SessionEvent) {
        let mut callbacks = self
            .callbacks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        callbacks.retain(|sender| sender.send(event).is_ok());
    }

    fn session_failed(operation: &str, session_id: i32, output: &CommandOutput) -> PlatformError {
        PlatformError::SessionOperationFailed {
            operation: operation.to_string(),
            session_id,
            message: output.combined(),
        }
    }
}

#[async_trait]
impl PackageInstallerOperations for ShellPackageInstaller {
    async fn create_session(&self, params: &SessionParams) -> Result<i32, PlatformError> {
        let output = self.run(pm::install_create_args(params)).await?;
        let session_id = pm::parse_session_id(&output.combined())?;
        self.sessions.insert(session_id);
        debug!(session_id, "session created");
        self.notify(SessionEvent::Created { session_id });
        Ok(session_id)
    }

    async fn write_session(
        &self,
        session_id: i32,
        name: &str,
        path: &Path,
    ) -> Result<(), PlatformError> {
        if !self.sessions.contains(&session_id) {
            return Err(PlatformError::SessionNotFound { session_id });
        }
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| PlatformError::FileOperationFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
            .len();
        let output = self
            .run(pm::install_write_args(session_id, name, path, size))
            .await?;
        if !output.success() || !output.combined().contains("Success") {
            return Err(Self::session_failed("write", session_id, &output));
        }
        Ok(())
    }

    async fn abandon_session(&self, session_id: i32) -> Result<(), PlatformError> {
        if self.sessions.remove(&session_id).is_none() {
            return Err(PlatformError::SessionNotFound { session_id });
        }
        let output = self.run(pm::install_abandon_args(session_id)).await?;
        if !output.success() {
            return Err(Self::session_failed("abandon", session_id, &output));
        }
        debug!(session_id, "session abandoned");
        Ok(())
    }

    async fn session_exists(&self, session_id: i32) -> Result<bool, PlatformError> {
        Ok(self.sessions.contains(&session_id))
    }

    async fn commit_session(
        &self,
        session_id: i32,
        status: StatusIntent,
    ) -> Result<(), PlatformError> {
        if self.sessions.remove(&session_id).is_none() {
            return Err(PlatformError::SessionNotFound { session_id });
        }
        let output = self.run(pm::install_commit_args(session_id)).await?;
        let (code, message) = pm::parse_commit_outcome(&output.combined());
        let success = code == InstallStatusCode::Success;
        if success {
            info!(session_id, package = %status.extras.package_name, "session committed");
        } else {
            warn!(session_id, package = %status.extras.package_name, ?code, "session commit failed");
        }
        status.deliver(code, message);
        self.notify(SessionEvent::Finished {
            session_id,
            success,
        });
        Ok(())
    }

    async fn register_session_callback(
        &self,
        sender: SessionEventSender,
    ) -> Result<(), PlatformError> {
        self.callbacks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(sender);
        Ok(())
    }
}
