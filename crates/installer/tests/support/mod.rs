//! In-memory device implementing every platform trait

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use aurora_config::MemoryPreferenceStore;
use aurora_errors::PlatformError;
use aurora_events::{AppEvent, EventBus, EventReceiver, InstallerEvent};
use aurora_installer::AppInstaller;
use aurora_platform::{
    ActivityLauncher, CommandOutput, ComponentName, DevicePolicyOperations, DeviceProfile, Intent,
    InstallStatusCode, PackageEventSender, PackageInfo, PackageInstallerOperations,
    PackageManagerOperations, Platform, PrivilegedServiceOperations, RootShell,
    ServiceInstallResult, SessionEvent, SessionEventSender, SessionParams, ShizukuOperations,
    StatusIntent,
};
use aurora_types::{Download, DownloadFile, InstallerKind, SdkLevel, SharedLib};

pub const OWN_PACKAGE: &str = "com.aurora.store";
pub const OWN_UID: u32 = 10_321;

#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    pub params: SessionParams,
    pub writes: Vec<String>,
}

#[derive(Default)]
pub struct FakeState {
    pub packages: HashMap<String, PackageInfo>,
    pub shared_libs: HashSet<(String, i64)>,
    pub update_owners: HashMap<String, String>,
    pub admin_receivers: HashMap<String, Vec<ComponentName>>,
    pub device_owner: bool,
    pub cleared_owner: bool,
    pub transfers: Vec<(ComponentName, ComponentName)>,
    pub root: bool,
    pub sui: bool,
    pub shizuku_permission: bool,
    pub shizuku_binder: bool,
    pub broken_lookups: bool,
    pub service_bound: bool,
    pub service_code: Option<InstallStatusCode>,
    pub service_calls: Vec<(String, Vec<PathBuf>)>,
    pub next_session: i32,
    pub sessions: BTreeMap<i32, FakeSession>,
    pub created: Vec<i32>,
    pub abandoned: Vec<i32>,
    pub committed: Vec<i32>,
    pub commit_targets: Vec<StatusIntent>,
    pub fail_write_on: Option<String>,
    pub fail_commit: bool,
    /// Drop sessions from the open set once committed, as the shell does
    pub forget_committed: bool,
    pub root_commit_failure: Option<String>,
    pub callbacks: Vec<SessionEventSender>,
    pub callback_registrations: usize,
    pub activities: Vec<Intent>,
}

#[derive(Default)]
pub struct FakeDevice {
    state: Mutex<FakeState>,
}

impl FakeDevice {
    pub fn new() -> Arc<Self> {
        let device = Self::default();
        device.state().next_session = 100;
        device.state().service_bound = true;
        Arc::new(device)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn install_package(&self, package: &str, version_code: i64, target_sdk: u32) {
        self.state().packages.insert(
            package.to_string(),
            PackageInfo {
                package_name: package.to_string(),
                version_code,
                enabled: true,
                target_sdk,
            },
        );
    }

    pub fn platform(self: &Arc<Self>, sdk: u32) -> Platform {
        Platform::builder(DeviceProfile::new(SdkLevel::new(sdk), OWN_PACKAGE, OWN_UID))
            .package_manager(self.clone())
            .package_installer(self.clone())
            .device_policy(self.clone())
            .root_shell(self.clone())
            .shizuku(self.clone())
            .privileged_service(self.clone())
            .activity(self.clone())
            .build()
    }

    /// Session ids in the order they were committed
    pub fn committed(&self) -> Vec<i32> {
        self.state().committed.clone()
    }

    pub fn abandoned(&self) -> Vec<i32> {
        self.state().abandoned.clone()
    }

    pub fn session(&self, id: i32) -> FakeSession {
        self.state().sessions.get(&id).cloned().unwrap_or_default()
    }

    fn lookup_guard(&self) -> Result<(), PlatformError> {
        if self.state().broken_lookups {
            Err(PlatformError::IpcFailed {
                service: "package".to_string(),
                message: "binder died".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn new_session(&self, params: SessionParams) -> i32 {
        let mut state = self.state();
        state.next_session += 1;
        let id = state.next_session;
        state.sessions.insert(
            id,
            FakeSession {
                params,
                writes: Vec::new(),
            },
        );
        state.created.push(id);
        id
    }

    fn record_write(&self, session_id: i32, name: &str) -> Result<(), PlatformError> {
        let mut state = self.state();
        if state.fail_write_on.as_deref() == Some(name) {
            return Err(PlatformError::FileOperationFailed {
                path: name.to_string(),
                message: "I/O error".to_string(),
            });
        }
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or(PlatformError::SessionNotFound { session_id })?;
        session.writes.push(name.to_string());
        Ok(())
    }

    fn record_abandon(&self, session_id: i32) {
        let mut state = self.state();
        state.sessions.remove(&session_id);
        state.abandoned.push(session_id);
    }
}

#[async_trait]
impl PackageManagerOperations for FakeDevice {
    async fn package_info(&self, package_name: &str) -> Result<Option<PackageInfo>, PlatformError> {
        self.lookup_guard()?;
        Ok(self.state().packages.get(package_name).cloned())
    }

    async fn is_shared_library_installed(
        &self,
        package_name: &str,
        version_code: i64,
    ) -> Result<bool, PlatformError> {
        self.lookup_guard()?;
        Ok(self
            .state()
            .shared_libs
            .contains(&(package_name.to_string(), version_code)))
    }

    async fn update_owner_package_name(
        &self,
        package_name: &str,
    ) -> Result<Option<String>, PlatformError> {
        self.lookup_guard()?;
        Ok(self.state().update_owners.get(package_name).cloned())
    }

    async fn query_broadcast_receivers(
        &self,
        package_name: &str,
        _action: &str,
    ) -> Result<Vec<ComponentName>, PlatformError> {
        self.lookup_guard()?;
        Ok(self
            .state()
            .admin_receivers
            .get(package_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn register_package_listener(
        &self,
        _sender: PackageEventSender,
    ) -> Result<(), PlatformError> {
        Ok(())
    }
}

#[async_trait]
impl PackageInstallerOperations for FakeDevice {
    async fn create_session(&self, params: &SessionParams) -> Result<i32, PlatformError> {
        Ok(self.new_session(params.clone()))
    }

    async fn write_session(
        &self,
        session_id: i32,
        name: &str,
        _path: &Path,
    ) -> Result<(), PlatformError> {
        self.record_write(session_id, name)
    }

    async fn abandon_session(&self, session_id: i32) -> Result<(), PlatformError> {
        self.record_abandon(session_id);
        Ok(())
    }

    async fn session_exists(&self, session_id: i32) -> Result<bool, PlatformError> {
        Ok(self.state().sessions.contains_key(&session_id))
    }

    async fn commit_session(
        &self,
        session_id: i32,
        status: StatusIntent,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        if state.fail_commit {
            return Err(PlatformError::SessionOperationFailed {
                operation: "commit".to_string(),
                session_id,
                message: "commit rejected".to_string(),
            });
        }
        state.committed.push(session_id);
        state.commit_targets.push(status);
        if state.forget_committed {
            state.sessions.remove(&session_id);
        }
        Ok(())
    }

    async fn register_session_callback(
        &self,
        sender: SessionEventSender,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.callbacks.push(sender);
        state.callback_registrations += 1;
        Ok(())
    }
}

#[async_trait]
impl DevicePolicyOperations for FakeDevice {
    async fn is_device_owner_app(&self, package_name: &str) -> Result<bool, PlatformError> {
        Ok(package_name == OWN_PACKAGE && self.state().device_owner)
    }

    async fn clear_device_owner_app(&self, _package_name: &str) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.device_owner = false;
        state.cleared_owner = true;
        Ok(())
    }

    async fn transfer_ownership(
        &self,
        admin: &ComponentName,
        target: &ComponentName,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.transfers.push((admin.clone(), target.clone()));
        state.device_owner = false;
        Ok(())
    }
}

#[async_trait]
impl RootShell for FakeDevice {
    async fn exec(&self, args: &[String]) -> Result<CommandOutput, PlatformError> {
        if !self.state().root {
            return Err(PlatformError::PermissionDenied {
                operation: "su".to_string(),
                message: "root denied".to_string(),
            });
        }
        let words: Vec<&str> = args.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["id", "-u"] => Ok(CommandOutput::ok("0")),
            ["pm", "install-create", ..] => {
                let id = self.new_session(SessionParams::default());
                Ok(CommandOutput::ok(format!(
                    "Success: created install session [{id}]"
                )))
            }
            ["pm", "install-write", "-S", _, id, name, _] => {
                let id: i32 = id.parse().unwrap();
                match self.record_write(id, name) {
                    Ok(()) => Ok(CommandOutput::ok("Success: streamed")),
                    Err(e) => Ok(CommandOutput::failed(1, e.to_string())),
                }
            }
            ["pm", "install-commit", id] => {
                let id: i32 = id.parse().unwrap();
                let mut state = self.state();
                state.committed.push(id);
                state.sessions.remove(&id);
                match state.root_commit_failure.clone() {
                    Some(reason) => Ok(CommandOutput::failed(1, format!("Failure [{reason}]"))),
                    None => Ok(CommandOutput::ok("Success")),
                }
            }
            ["pm", "install-abandon", id] => {
                self.record_abandon(id.parse().unwrap());
                Ok(CommandOutput::ok("Success"))
            }
            other => Err(PlatformError::CommandNotFound {
                command: other.join(" "),
            }),
        }
    }
}

#[async_trait]
impl ShizukuOperations for FakeDevice {
    async fn is_sui(&self) -> Result<bool, PlatformError> {
        Ok(self.state().sui)
    }

    async fn check_self_permission(&self) -> Result<bool, PlatformError> {
        if self.state().broken_lookups {
            return Err(PlatformError::IpcFailed {
                service: "shizuku".to_string(),
                message: "binder not received".to_string(),
            });
        }
        Ok(self.state().shizuku_permission)
    }

    async fn package_installer(
        &self,
    ) -> Result<Arc<dyn PackageInstallerOperations>, PlatformError> {
        Err(PlatformError::CapabilityUnavailable {
            capability: "shizuku binder".to_string(),
        })
    }
}

#[async_trait]
impl PrivilegedServiceOperations for FakeDevice {
    async fn install_packages(
        &self,
        package_name: &str,
        files: &[PathBuf],
    ) -> Result<ServiceInstallResult, PlatformError> {
        let mut state = self.state();
        if !state.service_bound {
            return Err(PlatformError::IpcFailed {
                service: "com.aurora.services".to_string(),
                message: "not bound".to_string(),
            });
        }
        state
            .service_calls
            .push((package_name.to_string(), files.to_vec()));
        Ok(ServiceInstallResult {
            package_name: package_name.to_string(),
            code: state.service_code.unwrap_or(InstallStatusCode::Success),
            message: None,
        })
    }
}

#[async_trait]
impl ActivityLauncher for FakeDevice {
    async fn start_activity(&self, intent: &Intent) -> Result<(), PlatformError> {
        self.state().activities.push(intent.clone());
        Ok(())
    }
}

/// Downloads backed by real files in a temporary directory
pub struct Fixture {
    pub dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn file(&self, name: &str) -> DownloadFile {
        let path = self.dir.path().join(name);
        std::fs::write(&path, name.as_bytes()).unwrap();
        DownloadFile::new(path)
    }

    /// `libs` are `(package, files)` pairs, each at version 1
    pub fn download(&self, package: &str, files: &[&str], libs: &[(&str, &[&str])]) -> Download {
        let mut download = Download::new(package, 42, format!("{package} app"));
        for name in files {
            download = download.with_file(self.file(name));
        }
        for (lib, lib_files) in libs {
            let mut shared = SharedLib::new(*lib, 1);
            for name in *lib_files {
                shared = shared.with_file(self.file(name));
            }
            download = download.with_shared_lib(shared);
        }
        download
    }
}

pub fn app_installer(
    device: &Arc<FakeDevice>,
    sdk: u32,
    preferred: InstallerKind,
) -> (AppInstaller, EventReceiver) {
    let bus = EventBus::new();
    let events = bus.subscribe();
    let installer = AppInstaller::new(
        device.platform(sdk),
        bus,
        Arc::new(MemoryPreferenceStore::new(preferred)),
    );
    (installer, events)
}

/// Installer events published so far
pub fn drain(events: &mut EventReceiver) -> Vec<InstallerEvent> {
    let mut out = Vec::new();
    while let Ok(message) = events.try_recv() {
        if let AppEvent::Installer(event) = message.event {
            out.push(event);
        }
    }
    out
}

pub fn failures(events: &[InstallerEvent]) -> Vec<&InstallerEvent> {
    events
        .iter()
        .filter(|e| matches!(e, InstallerEvent::Failed { .. }))
        .collect()
}

pub fn finished(session_id: i32, success: bool) -> SessionEvent {
    SessionEvent::Finished {
        session_id,
        success,
    }
}

/// Backend building blocks without an `AppInstaller`
pub fn base(
    device: &Arc<FakeDevice>,
    sdk: u32,
) -> (
    aurora_installer::InstallerBase,
    EventReceiver,
    aurora_platform::StatusReceiver,
) {
    let bus = EventBus::new();
    let events = bus.subscribe();
    let (status_tx, status_rx) = aurora_platform::status::status_channel();
    (
        aurora_installer::InstallerBase::new(device.platform(sdk), bus, status_tx),
        events,
        status_rx,
    )
}

/// Let spawned pump tasks run until `done` holds
pub async fn settle(mut done: impl FnMut() -> bool) {
    for _ in 0..200 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    assert!(done(), "condition not reached");
}
