//! System install prompt for single APKs

use async_trait::async_trait;
use aurora_errors::{Error, InstallerError};
use aurora_events::EventEmitter;
use aurora_platform::intent::{
    file_uri, IntentExtra, ACTION_VIEW, FLAG_ACTIVITY_NEW_TASK, FLAG_GRANT_READ_URI_PERMISSION,
    MIME_APK,
};
use aurora_platform::Intent;
use aurora_types::{Download, InstallerKind};
use tracing::{info, warn};

use super::InstallerBackend;
use crate::base::InstallerBase;
use crate::constants::{EXTRA_INSTALLER_PACKAGE_NAME, EXTRA_NOT_UNKNOWN_SOURCE};

#[derive(Debug, Clone)]
pub struct NativeInstaller {
    base: InstallerBase,
}

impl NativeInstaller {
    #[must_use]
    pub fn new(base: InstallerBase) -> Self {
        Self { base }
    }

    fn prompt(&self, download: &Download) -> Result<Intent, Error> {
        if download.is_split() || !download.shared_libs.is_empty() {
            return Err(InstallerError::SplitsUnsupported {
                package: download.package_name.clone(),
            }
            .into());
        }
        let file = download
            .files
            .first()
            .ok_or_else(|| InstallerError::NoFiles {
                package: download.package_name.clone(),
            })?;

        Ok(Intent::new(ACTION_VIEW)
            .with_data(file_uri(&file.path))
            .with_type(MIME_APK)
            .add_flags(FLAG_ACTIVITY_NEW_TASK | FLAG_GRANT_READ_URI_PERMISSION)
            .with_extra(EXTRA_NOT_UNKNOWN_SOURCE, IntentExtra::Bool(true))
            .with_extra(
                EXTRA_INSTALLER_PACKAGE_NAME,
                IntentExtra::String(self.base.platform().own_package().to_string()),
            ))
    }
}

#[async_trait]
impl InstallerBackend for NativeInstaller {
    fn kind(&self) -> InstallerKind {
        InstallerKind::Native
    }

    async fn install(&self, download: &Download) {
        let package = download.package_name.as_str();
        let result = async {
            let intent = self.prompt(download)?;
            self.base
                .platform()
                .activity()
                .start_activity(&intent)
                .await?;
            Ok::<_, Error>(())
        }
        .await;

        match result {
            Ok(()) => info!(package, "install prompt launched"),
            Err(e) => {
                warn!(package, error = %e, "native install failed");
                self.base.emit_install_error(package, &e);
            }
        }
    }
}
