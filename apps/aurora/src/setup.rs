//! Device detection and installer wiring

use std::path::{Path, PathBuf};
use std::sync::Arc;

use aurora_config::{Config, FilePreferenceStore, PreferenceStore};
use aurora_events::EventBus;
use aurora_installer::AppInstaller;
use aurora_platform::implementations::shell::TokioProcessOperations;
use aurora_platform::{ShellPlatform, ShellSettings};
use aurora_types::{Download, DownloadFile, SharedLib};
use tracing::{debug, info};

use crate::error::CliError;

/// Everything a command needs once the device has been probed
pub struct InstallerSetup {
    config: Config,
    installer: AppInstaller,
}

impl InstallerSetup {
    /// Probe the device through its shell and build the installer
    pub async fn initialize(config: Config, config_path: Option<&Path>) -> Result<Self, CliError> {
        let settings = ShellSettings {
            su: config.platform.su.clone(),
            own_package: config.installer.own_package.clone(),
            sdk_override: config.platform.sdk_override,
        };
        let platform = ShellPlatform::detect(Arc::new(TokioProcessOperations::new()), &settings)
            .await
            .map_err(|e| CliError::Setup(e.to_string()))?;
        info!(sdk = %platform.sdk(), own_package = platform.own_package(), "device detected");

        let preference_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Config::default_path()?,
        };
        debug!(path = %preference_path.display(), "installer preference file");
        let preferences: Arc<dyn PreferenceStore> = Arc::new(FilePreferenceStore::new(
            preference_path,
            config.installer.installer_id,
        ));

        let installer = AppInstaller::new(platform, EventBus::new(), preferences);
        Ok(Self { config, installer })
    }

    pub fn installer(&self) -> &AppInstaller {
        &self.installer
    }

    /// Resolve a relative APK path against the configured download directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.config.paths.download_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Assemble the download record handed to the installer
    pub fn download(
        &self,
        package: &str,
        version_code: i64,
        name: Option<String>,
        files: &[PathBuf],
        libs: Vec<SharedLib>,
    ) -> Result<Download, CliError> {
        let mut download = Download::new(
            package,
            version_code,
            name.unwrap_or_else(|| package.to_string()),
        );
        for file in files {
            download = download.with_file(self.existing_file(file)?);
        }
        for lib in libs {
            let mut resolved = SharedLib::new(lib.package_name, lib.version_code);
            for file in &lib.files {
                resolved = resolved.with_file(self.existing_file(&file.path)?);
            }
            download = download.with_shared_lib(resolved);
        }
        Ok(download)
    }

    fn existing_file(&self, path: &Path) -> Result<DownloadFile, CliError> {
        let path = self.resolve(path);
        if !path.is_file() {
            return Err(CliError::InvalidArguments(format!(
                "APK not found: {}",
                path.display()
            )));
        }
        Ok(DownloadFile::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_config::PathConfig;

    fn setup_with_dir(dir: &Path) -> InstallerSetup {
        let config = Config {
            paths: PathConfig {
                download_dir: Some(dir.to_path_buf()),
            },
            ..Config::default()
        };
        let platform = aurora_platform::Platform::builder(aurora_platform::DeviceProfile::new(
            aurora_types::SdkLevel::new(34),
            "com.aurora.store",
            10_000,
        ))
        .build();
        let installer = AppInstaller::new(
            platform,
            EventBus::new(),
            Arc::new(aurora_config::MemoryPreferenceStore::default()),
        );
        InstallerSetup { config, installer }
    }

    #[test]
    fn relative_files_resolve_against_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("base.apk"), b"apk").unwrap();
        std::fs::write(dir.path().join("lib.apk"), b"lib").unwrap();
        let setup = setup_with_dir(dir.path());

        let lib = SharedLib::new("com.lib", 2).with_file(DownloadFile::new("lib.apk"));
        let download = setup
            .download("com.app", 5, None, &[PathBuf::from("base.apk")], vec![lib])
            .unwrap();

        assert_eq!(download.display_name, "com.app");
        assert_eq!(download.files[0].path, dir.path().join("base.apk"));
        assert_eq!(download.shared_libs[0].files[0].path, dir.path().join("lib.apk"));
    }

    #[test]
    fn missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let setup = setup_with_dir(dir.path());

        let result = setup.download("com.app", 5, None, &[PathBuf::from("nope.apk")], Vec::new());
        assert!(matches!(result, Err(CliError::InvalidArguments(_))));
    }
}
