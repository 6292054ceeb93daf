//! Backend selection, availability, silent-update checks and uninstall

mod support;

use std::sync::Arc;

use aurora_config::{MemoryPreferenceStore, PreferenceStore};
use aurora_events::{EventBus, InstallerEvent};
use aurora_installer::constants::{
    AM_PACKAGE_NAME, PRIVILEGED_EXTENSION_PACKAGE_NAME, SHIZUKU_PACKAGE_NAME,
};
use aurora_installer::{uninstall_intent, AppInstaller};
use aurora_platform::intent::{
    IntentExtra, ACTION_DELETE, ACTION_UNINSTALL_PACKAGE, EXTRA_RETURN_RESULT,
    FLAG_ACTIVITY_NEW_TASK,
};
use aurora_platform::InstallStatusCode;
use aurora_types::InstallerKind;
use support::{app_installer, drain, finished, settle, FakeDevice, Fixture, OWN_PACKAGE};

#[tokio::test]
async fn root_preference_without_root_uses_session() {
    let device = FakeDevice::new();
    let (installer, _events) = app_installer(&device, 34, InstallerKind::Root);

    assert_eq!(installer.current_installer(), InstallerKind::Root);
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Session
    );

    device.state().root = true;
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Root
    );
}

#[tokio::test]
async fn shizuku_needs_permission_and_api_26() {
    let device = FakeDevice::new();
    device.state().sui = true;
    let (installer, _events) = app_installer(&device, 26, InstallerKind::Shizuku);
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Session
    );

    device.state().shizuku_permission = true;
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Shizuku
    );

    let (old_device, _events) = app_installer(&device, 25, InstallerKind::Shizuku);
    assert_eq!(
        old_device.get_preferred_installer().await.kind(),
        InstallerKind::Session
    );
}

#[tokio::test]
async fn service_needs_recent_enabled_companion() {
    let device = FakeDevice::new();
    let (installer, _events) = app_installer(&device, 29, InstallerKind::Service);

    device.install_package(PRIVILEGED_EXTENSION_PACKAGE_NAME, 8, 29);
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Session
    );

    device.install_package(PRIVILEGED_EXTENSION_PACKAGE_NAME, 9, 29);
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Service
    );

    if let Some(info) = device
        .state()
        .packages
        .get_mut(PRIVILEGED_EXTENSION_PACKAGE_NAME)
    {
        info.enabled = false;
    }
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Session
    );
}

#[tokio::test]
async fn unknown_persisted_id_resolves_to_session() {
    let device = FakeDevice::new();
    let store = Arc::new(MemoryPreferenceStore::default());
    store.set_installer_id(99).unwrap();
    let installer = AppInstaller::new(device.platform(34), EventBus::new(), store);

    assert_eq!(installer.current_installer(), InstallerKind::Session);
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Session
    );
}

#[tokio::test]
async fn set_installer_persists_choice() {
    let device = FakeDevice::new();
    let (installer, _events) = app_installer(&device, 34, InstallerKind::Session);

    installer.set_installer(InstallerKind::DeviceOwner).unwrap();

    assert_eq!(installer.current_installer(), InstallerKind::DeviceOwner);
    assert_eq!(
        installer.get_installer(InstallerKind::DeviceOwner).kind(),
        InstallerKind::DeviceOwner
    );
}

#[tokio::test]
async fn available_installers_follow_probes() {
    let device = FakeDevice::new();
    let (installer, _events) = app_installer(&device, 34, InstallerKind::Session);

    let kinds: Vec<InstallerKind> = installer
        .get_available_installers_info()
        .await
        .into_iter()
        .map(|info| info.installer)
        .collect();
    assert_eq!(kinds, vec![InstallerKind::Session, InstallerKind::Native]);

    device.state().root = true;
    device.state().device_owner = true;
    device.install_package(AM_PACKAGE_NAME, 430, 34);
    device.install_package(SHIZUKU_PACKAGE_NAME, 1086, 34);
    device.install_package(PRIVILEGED_EXTENSION_PACKAGE_NAME, 10, 29);

    let kinds: Vec<InstallerKind> = installer
        .get_available_installers_info()
        .await
        .into_iter()
        .map(|info| info.installer)
        .collect();
    assert_eq!(kinds, InstallerKind::ALL.to_vec());
}

#[tokio::test]
async fn failing_lookups_make_every_probe_false() {
    let device = FakeDevice::new();
    device.install_package(AM_PACKAGE_NAME, 430, 34);
    device.install_package(PRIVILEGED_EXTENSION_PACKAGE_NAME, 10, 29);
    device.state().sui = true;
    device.state().broken_lookups = true;
    let (installer, _events) = app_installer(&device, 34, InstallerKind::Shizuku);
    let caps = installer.capabilities();

    assert!(!caps.has_root_access().await);
    assert!(!caps.has_aurora_service().await);
    assert!(!caps.has_app_manager().await);
    assert!(!caps.has_shizuku_perm().await);
    assert!(!caps.is_device_owner().await);
    assert_eq!(
        installer.get_preferred_installer().await.kind(),
        InstallerKind::Session
    );
}

#[tokio::test]
async fn session_silent_update_needs_ownership_and_target_sdk() {
    let device = FakeDevice::new();
    let (installer, _events) = app_installer(&device, 34, InstallerKind::Session);

    assert!(!installer.can_install_silently("com.app", 34).await);

    device.install_package("com.app", 1, 33);
    assert!(!installer.can_install_silently("com.app", 34).await);

    device
        .state()
        .update_owners
        .insert("com.app".to_string(), "org.fdroid.fdroid".to_string());
    assert!(!installer.can_install_silently("com.app", 34).await);

    device
        .state()
        .update_owners
        .insert("com.app".to_string(), OWN_PACKAGE.to_string());
    assert!(installer.can_install_silently("com.app", 33).await);
    assert!(!installer.can_install_silently("com.app", 31).await);
}

#[tokio::test]
async fn session_silent_update_never_for_missing_package() {
    let device = FakeDevice::new();
    for sdk in 21..=36 {
        let (installer, _events) = app_installer(&device, sdk, InstallerKind::Session);
        assert!(!installer.can_install_silently("com.app", 36).await, "API {sdk}");
    }
}

#[tokio::test]
async fn session_silent_update_needs_api_31() {
    let device = FakeDevice::new();
    device.install_package("com.app", 1, 30);
    device
        .state()
        .update_owners
        .insert("com.app".to_string(), OWN_PACKAGE.to_string());

    let (old, _events) = app_installer(&device, 30, InstallerKind::Session);
    assert!(!old.can_install_silently("com.app", 30).await);

    let (new, _events) = app_installer(&device, 31, InstallerKind::Session);
    assert!(new.can_install_silently("com.app", 29).await);
    assert!(!new.can_install_silently("com.app", 28).await);
}

#[tokio::test]
async fn privileged_backends_install_silently_when_available() {
    let device = FakeDevice::new();
    let (native, _events) = app_installer(&device, 34, InstallerKind::Native);
    assert!(!native.can_install_silently("com.app", 34).await);

    let (root, _events) = app_installer(&device, 34, InstallerKind::Root);
    assert!(!root.can_install_silently("com.app", 34).await);
    device.state().root = true;
    assert!(root.can_install_silently("com.app", 34).await);

    let (owner, _events) = app_installer(&device, 34, InstallerKind::DeviceOwner);
    assert!(!owner.can_install_silently("com.app", 34).await);
    device.state().device_owner = true;
    assert!(owner.can_install_silently("com.app", 34).await);
}

#[test]
fn uninstall_intent_depends_on_api_level() {
    let modern = uninstall_intent(28, "com.app");
    assert_eq!(modern.action, ACTION_DELETE);
    assert_eq!(modern.data.as_deref(), Some("package:com.app"));
    assert!(modern.has_flag(FLAG_ACTIVITY_NEW_TASK));
    assert!(modern.extras.is_empty());

    let legacy = uninstall_intent(27, "com.app");
    assert_eq!(legacy.action, ACTION_UNINSTALL_PACKAGE);
    assert_eq!(
        legacy.extras.get(EXTRA_RETURN_RESULT),
        Some(&IntentExtra::Bool(true))
    );
}

#[tokio::test]
async fn uninstall_launches_prompt() {
    let device = FakeDevice::new();
    let (installer, _events) = app_installer(&device, 30, InstallerKind::Session);

    installer.uninstall("com.app").await.unwrap();

    let activities = device.state().activities.clone();
    assert_eq!(activities, vec![uninstall_intent(30, "com.app")]);
}

#[tokio::test]
async fn started_installer_drives_sessions_from_callbacks() {
    let device = FakeDevice::new();
    let (installer, mut events) = app_installer(&device, 34, InstallerKind::Session);
    let fixture = Fixture::new();

    let handles = installer.start().await;
    assert!(!handles.is_empty());
    assert!(installer.start().await.is_empty());
    let registrations = device.state().callback_registrations;

    installer
        .install(&fixture.download("com.app", &["base.apk"], &[("com.lib", &["lib.apk"])]))
        .await;
    assert_eq!(device.state().callback_registrations, registrations);
    let head = device.committed()[0];

    let callbacks = device.state().callbacks.clone();
    for callback in &callbacks {
        callback.send(finished(head, true)).unwrap();
    }
    settle(|| device.committed().len() == 2).await;

    let main = device.committed()[1];
    let target = device
        .state()
        .commit_targets
        .iter()
        .find(|t| t.extras.session_id == main)
        .cloned()
        .unwrap();
    target.deliver(InstallStatusCode::Success, None);

    let mut seen = Vec::new();
    settle(|| {
        seen.extend(drain(&mut events));
        seen.contains(&InstallerEvent::installed("com.app"))
    })
    .await;
}
