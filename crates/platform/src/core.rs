//! Platform bundle handed to installer backends

use std::sync::Arc;

use aurora_types::SdkLevel;

use crate::activity::ActivityLauncher;
use crate::implementations::unavailable::Unavailable;
use crate::installer::PackageInstallerOperations;
use crate::package::PackageManagerOperations;
use crate::policy::DevicePolicyOperations;
use crate::root::RootShell;
use crate::service::PrivilegedServiceOperations;
use crate::shizuku::ShizukuOperations;

/// Static facts about the running device and this app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub sdk: SdkLevel,
    pub own_package: String,
    pub uid: u32,
}

impl DeviceProfile {
    pub fn new(sdk: SdkLevel, own_package: impl Into<String>, uid: u32) -> Self {
        Self {
            sdk,
            own_package: own_package.into(),
            uid,
        }
    }
}

/// Main platform abstraction providing access to all platform operations
#[derive(Clone)]
pub struct Platform {
    device: DeviceProfile,
    package_manager: Arc<dyn PackageManagerOperations>,
    package_installer: Arc<dyn PackageInstallerOperations>,
    device_policy: Arc<dyn DevicePolicyOperations>,
    root_shell: Arc<dyn RootShell>,
    shizuku: Arc<dyn ShizukuOperations>,
    privileged_service: Arc<dyn PrivilegedServiceOperations>,
    activity: Arc<dyn ActivityLauncher>,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl Platform {
    /// Start a builder where every service is unavailable
    #[must_use]
    pub fn builder(device: DeviceProfile) -> PlatformBuilder {
        PlatformBuilder::new(device)
    }

    #[must_use]
    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    #[must_use]
    pub fn sdk(&self) -> SdkLevel {
        self.device.sdk
    }

    #[must_use]
    pub fn own_package(&self) -> &str {
        &self.device.own_package
    }

    #[must_use]
    pub fn package_manager(&self) -> &Arc<dyn PackageManagerOperations> {
        &self.package_manager
    }

    #[must_use]
    pub fn package_installer(&self) -> &Arc<dyn PackageInstallerOperations> {
        &self.package_installer
    }

    #[must_use]
    pub fn device_policy(&self) -> &Arc<dyn DevicePolicyOperations> {
        &self.device_policy
    }

    #[must_use]
    pub fn root_shell(&self) -> &Arc<dyn RootShell> {
        &self.root_shell
    }

    #[must_use]
    pub fn shizuku(&self) -> &Arc<dyn ShizukuOperations> {
        &self.shizuku
    }

    #[must_use]
    pub fn privileged_service(&self) -> &Arc<dyn PrivilegedServiceOperations> {
        &self.privileged_service
    }

    #[must_use]
    pub fn activity(&self) -> &Arc<dyn ActivityLauncher> {
        &self.activity
    }
}

/// Builder for [`Platform`]
pub struct PlatformBuilder {
    platform: Platform,
}

impl PlatformBuilder {
    fn new(device: DeviceProfile) -> Self {
        let unavailable = Arc::new(Unavailable);
        Self {
            platform: Platform {
                device,
                package_manager: unavailable.clone(),
                package_installer: unavailable.clone(),
                device_policy: unavailable.clone(),
                root_shell: unavailable.clone(),
                shizuku: unavailable.clone(),
                privileged_service: unavailable.clone(),
                activity: unavailable,
            },
        }
    }

    #[must_use]
    pub fn package_manager(mut self, ops: Arc<dyn PackageManagerOperations>) -> Self {
        self.platform.package_manager = ops;
        self
    }

    #[must_use]
    pub fn package_installer(mut self, ops: Arc<dyn PackageInstallerOperations>) -> Self {
        self.platform.package_installer = ops;
        self
    }

    #[must_use]
    pub fn device_policy(mut self, ops: Arc<dyn DevicePolicyOperations>) -> Self {
        self.platform.device_policy = ops;
        self
    }

    #[must_use]
    pub fn root_shell(mut self, ops: Arc<dyn RootShell>) -> Self {
        self.platform.root_shell = ops;
        self
    }

    #[must_use]
    pub fn shizuku(mut self, ops: Arc<dyn ShizukuOperations>) -> Self {
        self.platform.shizuku = ops;
        self
    }

    #[must_use]
    pub fn privileged_service(mut self, ops: Arc<dyn PrivilegedServiceOperations>) -> Self {
        self.platform.privileged_service = ops;
        self
    }

    #[must_use]
    pub fn activity(mut self, ops: Arc<dyn ActivityLauncher>) -> Self {
        self.platform.activity = ops;
        self
    }

    #[must_use]
    pub fn build(self) -> Platform {
        self.platform
    }
}
