//! Capability probes
//!
//! Every probe is recomputed on each call and answers `false` on any error.

use aurora_errors::PlatformError;
use aurora_platform::Platform;
use aurora_types::version_codes;
use tracing::debug;

use crate::constants::{
    AM_DEBUG_PACKAGE_NAME, AM_PACKAGE_NAME, PRIVILEGED_EXTENSION_MIN_VERSION,
    PRIVILEGED_EXTENSION_PACKAGE_NAME, SHIZUKU_PACKAGE_NAME,
};

#[derive(Debug, Clone)]
pub struct CapabilityDetector {
    platform: Platform,
}

fn settle(probe: &str, result: Result<bool, PlatformError>) -> bool {
    match result {
        Ok(value) => {
            debug!(probe, value, "capability probe");
            value
        }
        Err(e) => {
            debug!(probe, error = %e, "capability probe failed");
            false
        }
    }
}

impl CapabilityDetector {
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// A root shell can be acquired and runs as uid 0
    pub async fn has_root_access(&self) -> bool {
        let args = ["id".to_string(), "-u".to_string()];
        let result = self
            .platform
            .root_shell()
            .exec(&args)
            .await
            .map(|output| output.success() && output.stdout_str() == "0");
        settle("root", result)
    }

    /// Privileged companion installed, enabled and recent enough
    pub async fn has_aurora_service(&self) -> bool {
        let result = self
            .platform
            .package_manager()
            .package_info(PRIVILEGED_EXTENSION_PACKAGE_NAME)
            .await
            .map(|info| {
                info.is_some_and(|info| {
                    info.enabled && info.version_code >= PRIVILEGED_EXTENSION_MIN_VERSION
                })
            });
        settle("aurora_service", result)
    }

    /// Release or debug build of App Manager installed
    pub async fn has_app_manager(&self) -> bool {
        let pm = self.platform.package_manager();
        let result = async {
            Ok::<_, PlatformError>(
                pm.is_installed(AM_PACKAGE_NAME).await?
                    || pm.is_installed(AM_DEBUG_PACKAGE_NAME).await?,
            )
        }
        .await;
        settle("app_manager", result)
    }

    /// Shizuku app installed or Sui active, on API 26+
    pub async fn has_shizuku_or_sui(&self) -> bool {
        if !self.platform.sdk().at_least(version_codes::O) {
            debug!(probe = "shizuku", "API level too low");
            return false;
        }
        let result: Result<bool, PlatformError> = async {
            if self
                .platform
                .package_manager()
                .is_installed(SHIZUKU_PACKAGE_NAME)
                .await?
            {
                return Ok(true);
            }
            self.platform.shizuku().is_sui().await
        }
        .await;
        settle("shizuku", result)
    }

    pub async fn has_shizuku_perm(&self) -> bool {
        let result = self.platform.shizuku().check_self_permission().await;
        settle("shizuku_permission", result)
    }

    pub async fn is_device_owner(&self) -> bool {
        let result = self
            .platform
            .device_policy()
            .is_device_owner_app(self.platform.own_package())
            .await;
        settle("device_owner", result)
    }
}
