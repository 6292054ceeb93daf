//! Device policy administration

use async_trait::async_trait;
use aurora_errors::PlatformError;

use crate::intent::ComponentName;

#[async_trait]
pub trait DevicePolicyOperations: Send + Sync {
    async fn is_device_owner_app(&self, package_name: &str) -> Result<bool, PlatformError>;

    async fn clear_device_owner_app(&self, package_name: &str) -> Result<(), PlatformError>;

    /// Hand device ownership from `admin` to `target`
    async fn transfer_ownership(
        &self,
        admin: &ComponentName,
        target: &ComponentName,
    ) -> Result<(), PlatformError>;
}
