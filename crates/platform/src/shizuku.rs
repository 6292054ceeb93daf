//! Shizuku / Sui binder bridge

use std::sync::Arc;

use async_trait::async_trait;
use aurora_errors::PlatformError;

use crate::installer::PackageInstallerOperations;

#[async_trait]
pub trait ShizukuOperations: Send + Sync {
    /// Whether the Sui variant is active in this process
    async fn is_sui(&self) -> Result<bool, PlatformError>;

    async fn check_self_permission(&self) -> Result<bool, PlatformError>;

    /// Package installer reached through the Shizuku binder
    async fn package_installer(&self)
        -> Result<Arc<dyn PackageInstallerOperations>, PlatformError>;
}
