//! State shared by every backend

use aurora_events::{EventBus, EventEmitter};
use aurora_platform::status::StatusExtras;
use aurora_platform::{Platform, StatusIntent, StatusSender};
use aurora_types::SessionInfo;

/// Platform handle, event bus and commit status target
#[derive(Clone)]
pub struct InstallerBase {
    platform: Platform,
    bus: EventBus,
    status: StatusSender,
}

impl std::fmt::Debug for InstallerBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallerBase")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl InstallerBase {
    #[must_use]
    pub fn new(platform: Platform, bus: EventBus, status: StatusSender) -> Self {
        Self {
            platform,
            bus,
            status,
        }
    }

    #[must_use]
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Status target carrying the session's identity
    #[must_use]
    pub fn status_intent(&self, session: &SessionInfo) -> StatusIntent {
        StatusIntent {
            extras: StatusExtras {
                session_id: session.session_id,
                package_name: session.package_name.clone(),
                version_code: session.version_code,
                display_name: session.display_name.clone(),
            },
            reply: self.status.clone(),
        }
    }
}

impl EventEmitter for InstallerBase {
    fn event_bus(&self) -> Option<&EventBus> {
        Some(&self.bus)
    }
}
