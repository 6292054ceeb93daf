//! Commit results and package removals turned into installer events

use aurora_events::{EventBus, EventEmitter};
use aurora_platform::intent::FLAG_ACTIVITY_NEW_TASK;
use aurora_platform::{ActivityLauncher, InstallStatus, InstallStatusCode, PackageEvent};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct InstallStatusReceiver {
    bus: EventBus,
    activity: Arc<dyn ActivityLauncher>,
}

impl InstallStatusReceiver {
    #[must_use]
    pub fn new(bus: EventBus, activity: Arc<dyn ActivityLauncher>) -> Self {
        Self { bus, activity }
    }

    pub async fn handle_status(&self, status: InstallStatus) {
        let package = status.extras.package_name.as_str();
        match status.code {
            InstallStatusCode::PendingUserAction => match &status.confirmation {
                Some(intent) => {
                    let intent = intent.clone().add_flags(FLAG_ACTIVITY_NEW_TASK);
                    if let Err(e) = self.activity.start_activity(&intent).await {
                        warn!(package, error = %e, "failed to launch install confirmation");
                        self.bus.emit_failed(
                            package,
                            Some("Could not ask for install confirmation".to_string()),
                            Some(e.to_string()),
                        );
                    }
                }
                None => debug!(package, "user action pending without confirmation intent"),
            },
            InstallStatusCode::Success => {
                info!(package, version_code = status.extras.version_code, "installed");
                self.bus.emit_installed(package);
            }
            code => {
                warn!(package, ?code, message = ?status.message, "install failed");
                self.bus
                    .emit_failed(package, Some(code.describe().to_string()), status.message);
            }
        }
    }

    pub fn handle_package_event(&self, event: PackageEvent) {
        if let PackageEvent::Removed { package_name } = event {
            debug!(package = %package_name, "package removed");
            self.bus.emit_uninstalled(package_name);
        }
    }
}
