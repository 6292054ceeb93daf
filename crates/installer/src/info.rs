//! Descriptors shown in the installer picker

use aurora_types::{InstallerInfo, InstallerKind};

use crate::constants::{AM_DEBUG_PACKAGE_NAME, AM_PACKAGE_NAME, PRIVILEGED_EXTENSION_PACKAGE_NAME};

/// Descriptor for `kind`
#[must_use]
pub fn installer_info(kind: InstallerKind) -> InstallerInfo {
    match kind {
        InstallerKind::Session => InstallerInfo::new(
            kind,
            "Session installer",
            "Recommended",
            "Installs apps and their split APKs through Android's package installer sessions",
        ),
        InstallerKind::Native => InstallerInfo::new(
            kind,
            "Native installer",
            "Legacy",
            "Opens the system install prompt. Split APKs are not supported",
        ),
        InstallerKind::Root => InstallerInfo::new(
            kind,
            "Root installer",
            "Requires root access",
            "Installs apps silently through a root shell",
        ),
        InstallerKind::Service => InstallerInfo::new(
            kind,
            "Aurora Services",
            "Requires the privileged companion",
            "Installs apps silently through the Aurora Services system app",
        )
        .with_installer_package_names(vec![PRIVILEGED_EXTENSION_PACKAGE_NAME.to_string()]),
        InstallerKind::AppManager => InstallerInfo::new(
            kind,
            "App Manager",
            "Requires App Manager",
            "Hands downloaded APKs over to App Manager for installation",
        )
        .with_installer_package_names(vec![
            AM_PACKAGE_NAME.to_string(),
            AM_DEBUG_PACKAGE_NAME.to_string(),
        ]),
        InstallerKind::Shizuku => InstallerInfo::new(
            kind,
            "Shizuku installer",
            "Requires Shizuku or Sui",
            "Installs apps silently through the Shizuku service",
        ),
        InstallerKind::DeviceOwner => InstallerInfo::new(
            kind,
            "Device owner installer",
            "Requires device owner",
            "Installs apps silently using device policy privileges",
        ),
    }
}
