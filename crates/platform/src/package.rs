//! Package manager queries

use async_trait::async_trait;
use aurora_errors::PlatformError;
use serde::{Deserialize, Serialize};

use crate::intent::ComponentName;
use crate::status::PackageEventSender;

/// Installed package as reported by the package manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub package_name: String,
    pub version_code: i64,
    pub enabled: bool,
    pub target_sdk: u32,
}

/// Trait for package manager operations
#[async_trait]
pub trait PackageManagerOperations: Send + Sync {
    /// Look up an installed package; `None` when it is not installed
    async fn package_info(&self, package_name: &str) -> Result<Option<PackageInfo>, PlatformError>;

    async fn is_installed(&self, package_name: &str) -> Result<bool, PlatformError> {
        Ok(self.package_info(package_name).await?.is_some())
    }

    /// Whether a shared library with this exact version is present
    async fn is_shared_library_installed(
        &self,
        package_name: &str,
        version_code: i64,
    ) -> Result<bool, PlatformError>;

    /// Installer recorded as update owner of `package_name` (API 34+)
    async fn update_owner_package_name(
        &self,
        package_name: &str,
    ) -> Result<Option<String>, PlatformError>;

    /// Broadcast receivers in `package_name` that handle `action`
    async fn query_broadcast_receivers(
        &self,
        package_name: &str,
        action: &str,
    ) -> Result<Vec<ComponentName>, PlatformError>;

    /// Start delivering package added/removed notifications to `sender`
    async fn register_package_listener(&self, sender: PackageEventSender)
        -> Result<(), PlatformError>;
}
