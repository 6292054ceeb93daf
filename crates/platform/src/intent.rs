//! Activity intents and component names

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const ACTION_VIEW: &str = "android.intent.action.VIEW";
pub const ACTION_SEND_MULTIPLE: &str = "android.intent.action.SEND_MULTIPLE";
pub const ACTION_DELETE: &str = "android.intent.action.DELETE";
pub const ACTION_UNINSTALL_PACKAGE: &str = "android.intent.action.UNINSTALL_PACKAGE";
pub const ACTION_DEVICE_ADMIN_ENABLED: &str = "android.app.action.DEVICE_ADMIN_ENABLED";

pub const EXTRA_RETURN_RESULT: &str = "android.intent.extra.RETURN_RESULT";
pub const EXTRA_STREAM: &str = "android.intent.extra.STREAM";

pub const FLAG_GRANT_READ_URI_PERMISSION: u32 = 0x0000_0001;
pub const FLAG_ACTIVITY_NEW_TASK: u32 = 0x1000_0000;

pub const MIME_APK: &str = "application/vnd.android.package-archive";

/// Fully qualified component, rendered as `package/class`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentName {
    pub package_name: String,
    pub class_name: String,
}

impl ComponentName {
    pub fn new(package_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            class_name: class_name.into(),
        }
    }

    /// Parse `package/class`; a class starting with `.` is relative to the package
    #[must_use]
    pub fn unflatten(value: &str) -> Option<Self> {
        let (package, class) = value.trim().split_once('/')?;
        if package.is_empty() || class.is_empty() {
            return None;
        }
        let class_name = if class.starts_with('.') {
            format!("{package}{class}")
        } else {
            class.to_string()
        };
        Some(Self::new(package, class_name))
    }

    #[must_use]
    pub fn flatten(&self) -> String {
        format!("{}/{}", self.package_name, self.class_name)
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package_name, self.class_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentExtra {
    Bool(bool),
    String(String),
    UriList(Vec<String>),
}

/// Description of an activity to launch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub action: String,
    pub data: Option<String>,
    pub mime_type: Option<String>,
    pub component: Option<ComponentName>,
    pub package: Option<String>,
    pub flags: u32,
    pub extras: BTreeMap<String, IntentExtra>,
}

impl Intent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: ComponentName) -> Self {
        self.component = Some(component);
        self
    }

    #[must_use]
    pub fn add_flags(mut self, flags: u32) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: IntentExtra) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }
}

/// `file://` URI for an on-disk file
#[must_use]
pub fn file_uri(path: &std::path::Path) -> String {
    format!("file://{}", path.display())
}

/// `package:<name>` URI
#[must_use]
pub fn package_uri(package_name: &str) -> String {
    format!("package:{package_name}")
}
