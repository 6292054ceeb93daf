//! Device-owner status management

mod support;

use aurora_installer::constants::DEVICE_OWNER_RECEIVER_CLASS;
use aurora_platform::ComponentName;
use aurora_types::InstallerKind;
use support::{app_installer, FakeDevice, OWN_PACKAGE};

const TARGET: &str = "org.example.mdm";

fn target_receiver() -> ComponentName {
    ComponentName::new(TARGET, "org.example.mdm.AdminReceiver")
}

fn owner_device() -> std::sync::Arc<FakeDevice> {
    let device = FakeDevice::new();
    device.state().device_owner = true;
    device.install_package(TARGET, 3, 33);
    device
        .state()
        .admin_receivers
        .insert(TARGET.to_string(), vec![target_receiver()]);
    device
}

#[tokio::test]
async fn transfer_hands_ownership_to_admin_receiver() {
    let device = owner_device();
    let (installer, _events) = app_installer(&device, 30, InstallerKind::Session);

    assert!(installer.transfer_device_owner(TARGET).await);

    let transfers = device.state().transfers.clone();
    assert_eq!(
        transfers,
        vec![(
            ComponentName::new(OWN_PACKAGE, DEVICE_OWNER_RECEIVER_CLASS),
            target_receiver()
        )]
    );
    assert!(!installer.is_device_owner().await);
}

#[tokio::test]
async fn transfer_without_admin_receiver_changes_nothing() {
    let device = owner_device();
    device.state().admin_receivers.clear();
    let (installer, _events) = app_installer(&device, 30, InstallerKind::Session);

    assert!(!installer.transfer_device_owner(TARGET).await);
    assert!(device.state().transfers.is_empty());
    assert!(installer.is_device_owner().await);
}

#[tokio::test]
async fn transfer_refused_when_target_missing_or_not_owner() {
    let device = owner_device();
    let (installer, _events) = app_installer(&device, 30, InstallerKind::Session);
    assert!(!installer.transfer_device_owner("org.absent").await);

    device.state().device_owner = false;
    assert!(!installer.transfer_device_owner(TARGET).await);
    assert!(device.state().transfers.is_empty());
}

#[tokio::test]
async fn transfer_requires_api_28() {
    let device = owner_device();
    let (installer, _events) = app_installer(&device, 27, InstallerKind::Session);

    assert!(!installer.transfer_device_owner(TARGET).await);
    assert!(device.state().transfers.is_empty());
    assert!(installer.is_device_owner().await);
}

#[tokio::test]
async fn remove_only_when_owner() {
    let device = FakeDevice::new();
    let (installer, _events) = app_installer(&device, 30, InstallerKind::Session);
    assert!(!installer.remove_device_owner().await);
    assert!(!device.state().cleared_owner);

    device.state().device_owner = true;
    assert!(installer.remove_device_owner().await);
    assert!(device.state().cleared_owner);
    assert!(!installer.is_device_owner().await);
}
