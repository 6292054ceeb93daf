//! Device-shell implementation
//!
//! Drives the Android services through `pm`, `dpm`, `am`, `getprop`,
//! `dumpsys` and `su`. Usable on a device or from an adb shell. Shizuku and
//! the privileged companion have no shell transport and report unavailable.

pub mod activity;
pub mod installer;
pub mod package_manager;
pub mod policy;
pub mod process;
pub mod root;

use std::sync::Arc;

use aurora_errors::PlatformError;
use aurora_types::SdkLevel;
use tracing::debug;

use crate::core::{DeviceProfile, Platform};
use crate::process::ProcessOperations;

pub use activity::AmActivityLauncher;
pub use installer::ShellPackageInstaller;
pub use package_manager::ShellPackageManager;
pub use policy::ShellDevicePolicy;
pub use process::TokioProcessOperations;
pub use root::SuRootShell;

/// Settings for the shell platform
#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub su: String,
    pub own_package: String,
    pub sdk_override: Option<u32>,
}

/// Shell-backed platform factory
pub struct ShellPlatform;

impl ShellPlatform {
    /// Probe the device and assemble a [`Platform`]
    ///
    /// # Errors
    ///
    /// Returns an error if the API level or uid cannot be determined.
    pub async fn detect(
        process: Arc<dyn ProcessOperations>,
        settings: &ShellSettings,
    ) -> Result<Platform, PlatformError> {
        let sdk = match settings.sdk_override {
            Some(sdk) => SdkLevel::new(sdk),
            None => read_sdk(process.as_ref()).await?,
        };
        let uid = read_uid(process.as_ref()).await?;
        debug!(%sdk, uid, own_package = %settings.own_package, "shell platform detected");

        let device = DeviceProfile::new(sdk, settings.own_package.clone(), uid);
        Ok(Platform::builder(device)
            .package_manager(Arc::new(ShellPackageManager::new(process.clone())))
            .package_installer(Arc::new(ShellPackageInstaller::new(process.clone())))
            .device_policy(Arc::new(ShellDevicePolicy::new(process.clone())))
            .root_shell(Arc::new(SuRootShell::new(process.clone(), settings.su.clone())))
            .activity(Arc::new(AmActivityLauncher::new(process)))
            .build())
    }
}

async fn read_sdk(process: &dyn ProcessOperations) -> Result<SdkLevel, PlatformError> {
    let mut cmd = process.create_command("getprop");
    cmd.arg("ro.build.version.sdk");
    let output = process.execute_command(cmd).await?;
    let text = output.stdout_str();
    text.parse()
        .map(SdkLevel::new)
        .map_err(|_| PlatformError::UnexpectedOutput {
            command: "getprop ro.build.version.sdk".to_string(),
            output: text,
        })
}

async fn read_uid(process: &dyn ProcessOperations) -> Result<u32, PlatformError> {
    let mut cmd = process.create_command("id");
    cmd.arg("-u");
    let output = process.execute_command(cmd).await?;
    let text = output.stdout_str();
    text.parse().map_err(|_| PlatformError::UnexpectedOutput {
        command: "id -u".to_string(),
        output: text,
    })
}
