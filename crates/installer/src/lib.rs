#![warn(clippy::pedantic)]
#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

//! Installer backends for the Aurora store
//!
//! This crate selects an installer backend from the persisted preference and
//! device capabilities, stages downloads into OS install sessions (shared
//! libraries first, main package last), commits them in order and reports
//! every outcome as an installer event.

pub mod app_installer;
pub mod backend;
pub mod base;
pub mod capability;
pub mod constants;
pub mod info;
pub mod params;
pub mod queue;
pub mod receiver;
pub mod silent;

pub use app_installer::{uninstall_intent, AppInstaller};
pub use backend::{InstallerBackend, QueuedInstaller, SessionTransport};
pub use base::InstallerBase;
pub use capability::CapabilityDetector;
pub use info::installer_info;
pub use queue::{Completion, InstallQueue, Reservation};
pub use receiver::InstallStatusReceiver;
