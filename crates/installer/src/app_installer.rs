//! Installer selection and the app-wide entry points

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use aurora_config::PreferenceStore;
use aurora_errors::Error;
use aurora_events::{EventBus, EventReceiver};
use aurora_platform::intent::{
    package_uri, IntentExtra, ACTION_DELETE, ACTION_UNINSTALL_PACKAGE, EXTRA_RETURN_RESULT,
    FLAG_ACTIVITY_NEW_TASK,
};
use aurora_platform::status::{package_event_channel, status_channel};
use aurora_platform::{Intent, Platform, StatusReceiver};
use aurora_types::{version_codes, Download, InstallerInfo, InstallerKind};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::device_owner::device_owner_installer;
use crate::backend::root::root_installer;
use crate::backend::service::service_installer;
use crate::backend::session::session_installer;
use crate::backend::shizuku::shizuku_installer;
use crate::backend::{AppManagerInstaller, DeviceOwnerAdmin, InstallerBackend, NativeInstaller};
use crate::base::InstallerBase;
use crate::capability::CapabilityDetector;
use crate::info::installer_info;
use crate::receiver::InstallStatusReceiver;
use crate::silent::target_sdk_allows_silent;

/// Owns one instance of every backend and picks the one to use
pub struct AppInstaller {
    platform: Platform,
    bus: EventBus,
    preferences: Arc<dyn PreferenceStore>,
    capabilities: CapabilityDetector,
    device_owner: DeviceOwnerAdmin,
    /// Indexed by installer id
    backends: [Arc<dyn InstallerBackend>; 7],
    receiver: Arc<InstallStatusReceiver>,
    status_rx: Mutex<Option<StatusReceiver>>,
    started: AtomicBool,
}

impl std::fmt::Debug for AppInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppInstaller")
            .field("platform", &self.platform)
            .field("installer_id", &self.preferences.installer_id())
            .finish_non_exhaustive()
    }
}

impl AppInstaller {
    #[must_use]
    pub fn new(platform: Platform, bus: EventBus, preferences: Arc<dyn PreferenceStore>) -> Self {
        let (status_tx, status_rx) = status_channel();
        let base = InstallerBase::new(platform.clone(), bus.clone(), status_tx);

        // Same order as the persisted ids
        let backends: [Arc<dyn InstallerBackend>; 7] = [
            Arc::new(session_installer(base.clone())),
            Arc::new(NativeInstaller::new(base.clone())),
            Arc::new(root_installer(base.clone())),
            Arc::new(service_installer(base.clone())),
            Arc::new(AppManagerInstaller::new(base.clone())),
            Arc::new(shizuku_installer(base.clone())),
            Arc::new(device_owner_installer(base)),
        ];

        Self {
            capabilities: CapabilityDetector::new(platform.clone()),
            device_owner: DeviceOwnerAdmin::new(platform.clone()),
            receiver: Arc::new(InstallStatusReceiver::new(
                bus.clone(),
                platform.activity().clone(),
            )),
            backends,
            status_rx: Mutex::new(Some(status_rx)),
            started: AtomicBool::new(false),
            platform,
            bus,
            preferences,
        }
    }

    /// Spawn the pumps that forward commit statuses, package removals and
    /// session callbacks. Later calls return no handles.
    pub async fn start(&self) -> Vec<JoinHandle<()>> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Vec::new();
        }
        let mut handles = Vec::new();

        let status_rx = self
            .status_rx
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(mut status_rx) = status_rx {
            let receiver = self.receiver.clone();
            handles.push(tokio::spawn(async move {
                while let Some(status) = status_rx.recv().await {
                    receiver.handle_status(status).await;
                }
            }));
        }

        let (package_tx, mut package_rx) = package_event_channel();
        match self
            .platform
            .package_manager()
            .register_package_listener(package_tx)
            .await
        {
            Ok(()) => {
                let receiver = self.receiver.clone();
                handles.push(tokio::spawn(async move {
                    while let Some(event) = package_rx.recv().await {
                        receiver.handle_package_event(event);
                    }
                }));
            }
            Err(e) => debug!(error = %e, "package listener unavailable"),
        }

        for backend in &self.backends {
            let Some(mut events) = backend.take_session_events() else {
                continue;
            };
            backend.register_callbacks().await;
            let backend = backend.clone();
            handles.push(tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    backend.handle_session_event(event).await;
                }
            }));
        }

        info!(tasks = handles.len(), "installer started");
        handles
    }

    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.bus.subscribe()
    }

    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    #[must_use]
    pub fn status_receiver(&self) -> &Arc<InstallStatusReceiver> {
        &self.receiver
    }

    #[must_use]
    pub fn capabilities(&self) -> &CapabilityDetector {
        &self.capabilities
    }

    /// Backend for `kind` without any prerequisite check
    #[must_use]
    pub fn get_installer(&self, kind: InstallerKind) -> Arc<dyn InstallerBackend> {
        self.backends[usize::from(kind.id())].clone()
    }

    /// Backend named by the persisted preference
    #[must_use]
    pub fn current_installer(&self) -> InstallerKind {
        self.preferences.installer_kind()
    }

    /// Preferred backend if its prerequisite holds right now, else Session
    pub async fn get_preferred_installer(&self) -> Arc<dyn InstallerBackend> {
        let preferred = self.current_installer();
        let usable = match preferred {
            InstallerKind::Session | InstallerKind::Native => true,
            InstallerKind::Root => self.capabilities.has_root_access().await,
            InstallerKind::Service => self.capabilities.has_aurora_service().await,
            InstallerKind::AppManager => self.capabilities.has_app_manager().await,
            InstallerKind::Shizuku => {
                self.capabilities.has_shizuku_or_sui().await
                    && self.capabilities.has_shizuku_perm().await
            }
            InstallerKind::DeviceOwner => self.capabilities.is_device_owner().await,
        };

        if usable {
            self.get_installer(preferred)
        } else {
            info!(preferred = %preferred, "preferred installer unavailable, using session installer");
            self.get_installer(InstallerKind::Session)
        }
    }

    /// Persist a new preferred backend
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be written.
    pub fn set_installer(&self, kind: InstallerKind) -> Result<(), Error> {
        self.preferences.set_installer_id(kind.id())
    }

    /// Install through the preferred backend
    pub async fn install(&self, download: &Download) {
        self.get_preferred_installer().await.install(download).await;
    }

    /// Session and Native always, every other backend whose probe passes
    pub async fn get_available_installers_info(&self) -> Vec<InstallerInfo> {
        let caps = &self.capabilities;
        let (root, service, app_manager, shizuku, device_owner) = futures::join!(
            caps.has_root_access(),
            caps.has_aurora_service(),
            caps.has_app_manager(),
            caps.has_shizuku_or_sui(),
            caps.is_device_owner(),
        );

        [
            (InstallerKind::Session, true),
            (InstallerKind::Native, true),
            (InstallerKind::Root, root),
            (InstallerKind::Service, service),
            (InstallerKind::AppManager, app_manager),
            (InstallerKind::Shizuku, shizuku),
            (InstallerKind::DeviceOwner, device_owner),
        ]
        .into_iter()
        .filter(|(_, available)| *available)
        .map(|(kind, _)| installer_info(kind))
        .collect()
    }

    /// Whether the configured backend can update `package_name` without a prompt
    pub async fn can_install_silently(&self, package_name: &str, target_sdk: u32) -> bool {
        match self.current_installer() {
            InstallerKind::Session => {
                self.session_can_update_silently(package_name, target_sdk)
                    .await
            }
            InstallerKind::Native | InstallerKind::AppManager => false,
            InstallerKind::Root => self.capabilities.has_root_access().await,
            InstallerKind::Service => self.capabilities.has_aurora_service().await,
            InstallerKind::Shizuku => {
                self.capabilities.has_shizuku_or_sui().await
                    && self.capabilities.has_shizuku_perm().await
            }
            InstallerKind::DeviceOwner => self.capabilities.is_device_owner().await,
        }
    }

    async fn session_can_update_silently(&self, package_name: &str, target_sdk: u32) -> bool {
        let sdk = self.platform.sdk();
        if !sdk.is_s_and_above() {
            return false;
        }
        let pm = self.platform.package_manager();
        match pm.is_installed(package_name).await {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                debug!(package = package_name, error = %e, "install state lookup failed");
                return false;
            }
        }
        match pm.update_owner_package_name(package_name).await {
            Ok(Some(owner)) if owner == self.platform.own_package() => {}
            Ok(_) => return false,
            Err(e) => {
                debug!(package = package_name, error = %e, "update owner lookup failed");
                return false;
            }
        }
        target_sdk_allows_silent(sdk, target_sdk)
    }

    /// Launch the system uninstall prompt for `package_name`
    ///
    /// # Errors
    ///
    /// Returns an error if the activity cannot be started.
    pub async fn uninstall(&self, package_name: &str) -> Result<(), Error> {
        let intent = uninstall_intent(self.platform.sdk().get(), package_name);
        self.platform.activity().start_activity(&intent).await?;
        info!(package = package_name, "uninstall prompt launched");
        Ok(())
    }

    pub async fn is_device_owner(&self) -> bool {
        self.device_owner.is_device_owner().await
    }

    pub async fn remove_device_owner(&self) -> bool {
        self.device_owner.remove_device_owner().await
    }

    pub async fn transfer_device_owner(&self, target: &str) -> bool {
        let transferred = self.device_owner.transfer_device_owner(target).await;
        if !transferred {
            warn!(target, "device owner unchanged");
        }
        transferred
    }
}

/// Delete intent for `package_name` on API level `sdk`
#[must_use]
pub fn uninstall_intent(sdk: u32, package_name: &str) -> Intent {
    let intent = if sdk >= version_codes::P {
        Intent::new(ACTION_DELETE)
    } else {
        Intent::new(ACTION_UNINSTALL_PACKAGE)
            .with_extra(EXTRA_RETURN_RESULT, IntentExtra::Bool(true))
    };
    intent
        .with_data(package_uri(package_name))
        .add_flags(FLAG_ACTIVITY_NEW_TASK)
}
