//! Stand-in for services this host cannot reach
//!
//! Queries answer "absent" and mutations fail with
//! [`PlatformError::CapabilityUnavailable`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use aurora_errors::PlatformError;

use crate::activity::ActivityLauncher;
use crate::installer::PackageInstallerOperations;
use crate::intent::{ComponentName, Intent};
use crate::package::{PackageInfo, PackageManagerOperations};
use crate::policy::DevicePolicyOperations;
use crate::process::CommandOutput;
use crate::root::RootShell;
use crate::service::{PrivilegedServiceOperations, ServiceInstallResult};
use crate::session::{SessionEventSender, SessionParams};
use crate::shizuku::ShizukuOperations;
use crate::status::{PackageEventSender, StatusIntent};

#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

fn unavailable(capability: &str) -> PlatformError {
    PlatformError::CapabilityUnavailable {
        capability: capability.to_string(),
    }
}

#[async_trait]
impl PackageManagerOperations for Unavailable {
    async fn package_info(
        &self,
        _package_name: &str,
    ) -> Result<Option<PackageInfo>, PlatformError> {
        Ok(None)
    }

    async fn is_shared_library_installed(
        &self,
        _package_name: &str,
        _version_code: i64,
    ) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn update_owner_package_name(
        &self,
        _package_name: &str,
    ) -> Result<Option<String>, PlatformError> {
        Ok(None)
    }

    async fn query_broadcast_receivers(
        &self,
        _package_name: &str,
        _action: &str,
    ) -> Result<Vec<ComponentName>, PlatformError> {
        Ok(Vec::new())
    }

    async fn register_package_listener(
        &self,
        _sender: PackageEventSender,
    ) -> Result<(), PlatformError> {
        Err(unavailable("package listener"))
    }
}

#[async_trait]
impl PackageInstallerOperations for Unavailable {
    async fn create_session(&self, _params: &SessionParams) -> Result<i32, PlatformError> {
        Err(unavailable("package installer"))
    }

    async fn write_session(
        &self,
        _session_id: i32,
        _name: &str,
        _path: &Path,
    ) -> Result<(), PlatformError> {
        Err(unavailable("package installer"))
    }

    async fn abandon_session(&self, session_id: i32) -> Result<(), PlatformError> {
        Err(PlatformError::SessionNotFound { session_id })
    }

    async fn session_exists(&self, _session_id: i32) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn commit_session(
        &self,
        session_id: i32,
        _status: StatusIntent,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::SessionNotFound { session_id })
    }

    async fn register_session_callback(
        &self,
        _sender: SessionEventSender,
    ) -> Result<(), PlatformError> {
        Ok(())
    }
}

#[async_trait]
impl DevicePolicyOperations for Unavailable {
    async fn is_device_owner_app(&self, _package_name: &str) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn clear_device_owner_app(&self, _package_name: &str) -> Result<(), PlatformError> {
        Err(unavailable("device policy"))
    }

    async fn transfer_ownership(
        &self,
        _admin: &ComponentName,
        _target: &ComponentName,
    ) -> Result<(), PlatformError> {
        Err(unavailable("device policy"))
    }
}

#[async_trait]
impl RootShell for Unavailable {
    async fn exec(&self, _args: &[String]) -> Result<CommandOutput, PlatformError> {
        Err(unavailable("root shell"))
    }
}

#[async_trait]
impl ShizukuOperations for Unavailable {
    async fn is_sui(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn check_self_permission(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn package_installer(
        &self,
    ) -> Result<Arc<dyn PackageInstallerOperations>, PlatformError> {
        Err(unavailable("shizuku binder"))
    }
}

#[async_trait]
impl PrivilegedServiceOperations for Unavailable {
    async fn install_packages(
        &self,
        _package_name: &str,
        _files: &[PathBuf],
    ) -> Result<ServiceInstallResult, PlatformError> {
        Err(PlatformError::IpcFailed {
            service: "privileged service".to_string(),
            message: "service not bound".to_string(),
        })
    }
}

#[async_trait]
impl ActivityLauncher for Unavailable {
    async fn start_activity(&self, _intent: &Intent) -> Result<(), PlatformError> {
        Err(unavailable("activity manager"))
    }
}
