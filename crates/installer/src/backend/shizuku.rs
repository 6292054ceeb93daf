//! Sessions through the Shizuku / Sui binder

use aurora_types::InstallerKind;

use super::queued::QueuedInstaller;
use super::session::{InstallerSource, PackageInstallerTransport};
use crate::base::InstallerBase;
use crate::params::ParamsProfile;

#[must_use]
pub fn shizuku_installer(base: InstallerBase) -> QueuedInstaller {
    let transport = PackageInstallerTransport::new(
        base.clone(),
        InstallerSource::Shizuku,
        ParamsProfile::SHIZUKU,
    );
    QueuedInstaller::new(InstallerKind::Shizuku, base, Box::new(transport))
}
