//! Hand-off to App Manager

use async_trait::async_trait;
use aurora_errors::{Error, InstallerError};
use aurora_events::EventEmitter;
use aurora_platform::intent::{
    file_uri, IntentExtra, ACTION_SEND_MULTIPLE, ACTION_VIEW, EXTRA_STREAM,
    FLAG_ACTIVITY_NEW_TASK, FLAG_GRANT_READ_URI_PERMISSION, MIME_APK,
};
use aurora_platform::Intent;
use aurora_types::{Download, InstallerKind};
use tracing::{info, warn};

use super::InstallerBackend;
use crate::base::InstallerBase;
use crate::constants::{AM_DEBUG_PACKAGE_NAME, AM_PACKAGE_NAME};

#[derive(Debug, Clone)]
pub struct AppManagerInstaller {
    base: InstallerBase,
}

impl AppManagerInstaller {
    #[must_use]
    pub fn new(base: InstallerBase) -> Self {
        Self { base }
    }

    async fn target_package(&self) -> Result<&'static str, Error> {
        let pm = self.base.platform().package_manager();
        if pm.is_installed(AM_PACKAGE_NAME).await? {
            Ok(AM_PACKAGE_NAME)
        } else if pm.is_installed(AM_DEBUG_PACKAGE_NAME).await? {
            Ok(AM_DEBUG_PACKAGE_NAME)
        } else {
            Err(InstallerError::BackendUnavailable {
                backend: InstallerKind::AppManager.to_string(),
            }
            .into())
        }
    }

    /// View intent for one APK, send-multiple for splits
    #[must_use]
    pub fn handoff_intent(download: &Download, target: &str) -> Option<Intent> {
        let intent = match download.files.as_slice() {
            [] => return None,
            [single] => Intent::new(ACTION_VIEW).with_data(file_uri(&single.path)),
            files => Intent::new(ACTION_SEND_MULTIPLE).with_extra(
                EXTRA_STREAM,
                IntentExtra::UriList(files.iter().map(|f| file_uri(&f.path)).collect()),
            ),
        };
        Some(
            intent
                .with_type(MIME_APK)
                .with_package(target)
                .add_flags(FLAG_ACTIVITY_NEW_TASK | FLAG_GRANT_READ_URI_PERMISSION),
        )
    }
}

#[async_trait]
impl InstallerBackend for AppManagerInstaller {
    fn kind(&self) -> InstallerKind {
        InstallerKind::AppManager
    }

    async fn install(&self, download: &Download) {
        let package = download.package_name.as_str();
        if !download.shared_libs.is_empty() {
            warn!(package, libraries = download.shared_libs.len(), "App Manager receives the main package only");
        }

        let result = async {
            let target = self.target_package().await?;
            let intent = Self::handoff_intent(download, target).ok_or_else(|| {
                InstallerError::NoFiles {
                    package: package.to_string(),
                }
            })?;
            self.base
                .platform()
                .activity()
                .start_activity(&intent)
                .await?;
            Ok::<_, Error>(target)
        }
        .await;

        match result {
            Ok(target) => info!(package, target, "handed over to App Manager"),
            Err(e) => {
                warn!(package, error = %e, "App Manager hand-off failed");
                self.base.emit_install_error(package, &e);
            }
        }
    }
}
