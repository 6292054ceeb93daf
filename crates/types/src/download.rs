//! Download records handed over by the download queue

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One APK file on disk belonging to a download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadFile {
    /// Absolute path of the downloaded file
    pub path: PathBuf,
    /// File name as published by the marketplace (e.g. `base.apk`)
    pub name: String,
}

impl DownloadFile {
    /// Create a file entry, deriving the name from the path when possible
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    /// Create a file entry with an explicit name
    pub fn with_name(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Shared library the main package depends on at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedLib {
    pub package_name: String,
    pub version_code: i64,
    #[serde(default)]
    pub files: Vec<DownloadFile>,
}

impl SharedLib {
    pub fn new(package_name: impl Into<String>, version_code: i64) -> Self {
        Self {
            package_name: package_name.into(),
            version_code,
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: DownloadFile) -> Self {
        self.files.push(file);
        self
    }
}

/// Immutable snapshot of a finished download, passed into `install()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    pub package_name: String,
    pub version_code: i64,
    pub display_name: String,
    #[serde(default)]
    pub icon_url: String,
    /// Ordered split APKs of the main package
    pub files: Vec<DownloadFile>,
    /// Libraries that must be present before the main package installs
    #[serde(default)]
    pub shared_libs: Vec<SharedLib>,
}

impl Download {
    /// Create a download for a package with no files attached yet
    pub fn new(
        package_name: impl Into<String>,
        version_code: i64,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            version_code,
            display_name: display_name.into(),
            icon_url: String::new(),
            files: Vec::new(),
            shared_libs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = icon_url.into();
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: DownloadFile) -> Self {
        self.files.push(file);
        self
    }

    #[must_use]
    pub fn with_shared_lib(mut self, lib: SharedLib) -> Self {
        self.shared_libs.push(lib);
        self
    }

    /// Whether the download consists of more than a single base APK
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.files.len() > 1
    }

    /// Files to write for `package_name`, which is either the main package or
    /// one of its shared libraries
    #[must_use]
    pub fn files_for(&self, package_name: &str) -> &[DownloadFile] {
        if package_name == self.package_name {
            return &self.files;
        }
        self.shared_libs
            .iter()
            .find(|lib| lib.package_name == package_name)
            .map_or(&[], |lib| lib.files.as_slice())
    }
}
