//! Commit status and package removal handling

mod support;

use std::sync::Arc;

use aurora_events::{EventBus, EventReceiver, InstallerEvent};
use aurora_installer::InstallStatusReceiver;
use aurora_platform::intent::FLAG_ACTIVITY_NEW_TASK;
use aurora_platform::{InstallStatus, InstallStatusCode, Intent, PackageEvent, StatusExtras};
use support::{drain, FakeDevice};

fn extras(package: &str) -> StatusExtras {
    StatusExtras {
        session_id: 7,
        package_name: package.to_string(),
        version_code: 42,
        display_name: None,
    }
}

fn receiver(device: &Arc<FakeDevice>) -> (InstallStatusReceiver, EventReceiver) {
    let bus = EventBus::new();
    let events = bus.subscribe();
    (InstallStatusReceiver::new(bus, device.clone()), events)
}

#[tokio::test]
async fn success_emits_installed() {
    let device = FakeDevice::new();
    let (receiver, mut events) = receiver(&device);

    receiver
        .handle_status(InstallStatus::new(extras("com.app"), InstallStatusCode::Success))
        .await;

    assert_eq!(drain(&mut events), vec![InstallerEvent::installed("com.app")]);
}

#[tokio::test]
async fn failure_carries_description_and_platform_message() {
    let device = FakeDevice::new();
    let (receiver, mut events) = receiver(&device);

    receiver
        .handle_status(
            InstallStatus::new(extras("com.app"), InstallStatusCode::FailureStorage)
                .with_message("INSTALL_FAILED_INSUFFICIENT_STORAGE"),
        )
        .await;

    assert_eq!(
        drain(&mut events),
        vec![InstallerEvent::failed(
            "com.app",
            Some("Not enough storage space".to_string()),
            Some("INSTALL_FAILED_INSUFFICIENT_STORAGE".to_string()),
        )]
    );
}

#[tokio::test]
async fn pending_user_action_launches_confirmation() {
    let device = FakeDevice::new();
    let (receiver, mut events) = receiver(&device);
    let confirmation = Intent::new("android.content.pm.action.CONFIRM_INSTALL");

    receiver
        .handle_status(
            InstallStatus::new(extras("com.app"), InstallStatusCode::PendingUserAction)
                .with_confirmation(confirmation.clone()),
        )
        .await;

    let activities = device.state().activities.clone();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].action, confirmation.action);
    assert!(activities[0].has_flag(FLAG_ACTIVITY_NEW_TASK));
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn pending_without_confirmation_is_ignored() {
    let device = FakeDevice::new();
    let (receiver, mut events) = receiver(&device);

    receiver
        .handle_status(InstallStatus::new(
            extras("com.app"),
            InstallStatusCode::PendingUserAction,
        ))
        .await;

    assert!(device.state().activities.is_empty());
    assert!(drain(&mut events).is_empty());
}

#[test]
fn removal_emits_uninstalled() {
    let device = FakeDevice::new();
    let (receiver, mut events) = receiver(&device);

    receiver.handle_package_event(PackageEvent::Added {
        package_name: "com.app".to_string(),
    });
    receiver.handle_package_event(PackageEvent::Removed {
        package_name: "com.app".to_string(),
    });

    assert_eq!(drain(&mut events), vec![InstallerEvent::uninstalled("com.app")]);
}
