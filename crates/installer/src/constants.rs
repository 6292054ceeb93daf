//! Package names and components the installer cooperates with

/// Privileged companion ("Aurora Services")
pub const PRIVILEGED_EXTENSION_PACKAGE_NAME: &str = "com.aurora.services";

/// Oldest companion build speaking the current IPC contract
pub const PRIVILEGED_EXTENSION_MIN_VERSION: i64 = 9;

pub const AM_PACKAGE_NAME: &str = "io.github.muntashirakon.AppManager";
pub const AM_DEBUG_PACKAGE_NAME: &str = "io.github.muntashirakon.AppManager.debug";

pub const SHIZUKU_PACKAGE_NAME: &str = "moe.shizuku.privileged.api";

/// Receiver holding device-owner status inside the store
pub const DEVICE_OWNER_RECEIVER_CLASS: &str = "com.aurora.store.data.receiver.DeviceOwnerReceiver";

/// Intent extras understood by the system package installer UI
pub const EXTRA_NOT_UNKNOWN_SOURCE: &str = "android.intent.extra.NOT_UNKNOWN_SOURCE";
pub const EXTRA_INSTALLER_PACKAGE_NAME: &str = "android.intent.extra.INSTALLER_PACKAGE_NAME";
