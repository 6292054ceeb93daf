//! Device-owner installs and device-owner administration

use aurora_errors::{Error, InstallerError};
use aurora_platform::intent::ACTION_DEVICE_ADMIN_ENABLED;
use aurora_platform::{ComponentName, Platform};
use aurora_types::{version_codes, InstallerKind};
use tracing::{error, info, warn};

use super::queued::QueuedInstaller;
use super::session::{InstallerSource, PackageInstallerTransport};
use crate::base::InstallerBase;
use crate::capability::CapabilityDetector;
use crate::constants::DEVICE_OWNER_RECEIVER_CLASS;
use crate::params::ParamsProfile;

/// Sessions on the own package installer with policy install reason.
/// Installs are refused unless this app is device owner.
#[must_use]
pub fn device_owner_installer(base: InstallerBase) -> QueuedInstaller {
    let transport = PackageInstallerTransport::new(
        base.clone(),
        InstallerSource::Platform,
        ParamsProfile::DEVICE_OWNER,
    )
    .requiring_device_owner();
    QueuedInstaller::new(InstallerKind::DeviceOwner, base, Box::new(transport))
}

/// Device-owner status management
#[derive(Debug, Clone)]
pub struct DeviceOwnerAdmin {
    platform: Platform,
    capabilities: CapabilityDetector,
}

impl DeviceOwnerAdmin {
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self {
            capabilities: CapabilityDetector::new(platform.clone()),
            platform,
        }
    }

    /// Admin component this app holds device ownership through
    #[must_use]
    pub fn admin_component(&self) -> ComponentName {
        ComponentName::new(self.platform.own_package(), DEVICE_OWNER_RECEIVER_CLASS)
    }

    pub async fn is_device_owner(&self) -> bool {
        self.capabilities.is_device_owner().await
    }

    /// Give up device ownership. `false` when not owner or on error.
    pub async fn remove_device_owner(&self) -> bool {
        if !self.is_device_owner().await {
            warn!("cannot remove device owner: this app is not the device owner");
            return false;
        }
        match self
            .platform
            .device_policy()
            .clear_device_owner_app(self.platform.own_package())
            .await
        {
            Ok(()) => {
                info!("device owner removed");
                true
            }
            Err(e) => {
                error!(error = %e, "failed to remove device owner");
                false
            }
        }
    }

    /// Hand device ownership to `target`. `false` when any precondition
    /// fails or the platform refuses.
    pub async fn transfer_device_owner(&self, target: &str) -> bool {
        match self.try_transfer(target).await {
            Ok(()) => {
                info!(target, "device owner transferred");
                true
            }
            Err(e) => {
                warn!(target, error = %e, "device owner transfer refused");
                false
            }
        }
    }

    async fn try_transfer(&self, target: &str) -> Result<(), Error> {
        if !self.is_device_owner().await {
            return Err(InstallerError::NotDeviceOwner.into());
        }

        let pm = self.platform.package_manager();
        if !pm.is_installed(target).await? {
            return Err(InstallerError::TargetNotInstalled {
                package: target.to_string(),
            }
            .into());
        }

        let receiver = pm
            .query_broadcast_receivers(target, ACTION_DEVICE_ADMIN_ENABLED)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| InstallerError::AdminReceiverMissing {
                package: target.to_string(),
            })?;

        let sdk = self.platform.sdk();
        if !sdk.is_p_and_above() {
            return Err(InstallerError::UnsupportedSdk {
                required: version_codes::P,
                current: sdk.get(),
            }
            .into());
        }

        self.platform
            .device_policy()
            .transfer_ownership(&self.admin_component(), &receiver)
            .await?;
        Ok(())
    }
}
