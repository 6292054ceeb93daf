//! Privileged companion ("Aurora Services") IPC

use std::path::PathBuf;

use async_trait::async_trait;
use aurora_errors::PlatformError;
use serde::{Deserialize, Serialize};

use crate::status::InstallStatusCode;

/// Result reported by the companion for one install request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstallResult {
    pub package_name: String,
    pub code: InstallStatusCode,
    pub message: Option<String>,
}

#[async_trait]
pub trait PrivilegedServiceOperations: Send + Sync {
    /// Install `files` as one package through the companion
    async fn install_packages(
        &self,
        package_name: &str,
        files: &[PathBuf],
    ) -> Result<ServiceInstallResult, PlatformError>;
}
