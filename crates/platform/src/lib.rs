#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform abstraction layer for the Android services the installer uses.
//!
//! Each service is an async trait so installer backends can be driven by the
//! device shell or by an in-process fake:
//! - Package manager queries and package change notifications
//! - `PackageInstaller` sessions and commit status delivery
//! - Device policy, root shell, Shizuku binder and privileged companion IPC
//! - Activity launching

pub mod activity;
pub mod core;
pub mod implementations;
pub mod installer;
pub mod intent;
pub mod package;
pub mod pm;
pub mod policy;
pub mod process;
pub mod root;
pub mod service;
pub mod session;
pub mod shizuku;
pub mod status;

pub use crate::core::{DeviceProfile, Platform, PlatformBuilder};
pub use implementations::shell::{ShellPlatform, ShellSettings};

/// Re-export commonly used types
pub use activity::ActivityLauncher;
pub use installer::PackageInstallerOperations;
pub use intent::{ComponentName, Intent, IntentExtra};
pub use package::{PackageInfo, PackageManagerOperations};
pub use policy::DevicePolicyOperations;
pub use process::{CommandOutput, PlatformCommand, ProcessOperations};
pub use root::RootShell;
pub use service::{PrivilegedServiceOperations, ServiceInstallResult};
pub use session::{SessionEvent, SessionEventReceiver, SessionEventSender, SessionParams};
pub use shizuku::ShizukuOperations;
pub use status::{
    InstallStatus, InstallStatusCode, PackageEvent, PackageEventReceiver, PackageEventSender,
    StatusExtras, StatusIntent, StatusReceiver, StatusSender,
};
