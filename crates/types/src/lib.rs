#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the Aurora installer
//!
//! This crate provides the data records shared by every installer crate:
//! download descriptions, in-flight session records, installer descriptors,
//! and Android API level handling.

pub mod download;
pub mod installer;
pub mod sdk;
pub mod session;

// Re-export commonly used types
pub use download::{Download, DownloadFile, SharedLib};
pub use installer::{BuildType, InstallerInfo, InstallerKind};
pub use sdk::{version_codes, SdkLevel};
pub use session::SessionInfo;
