use serde::{Deserialize, Serialize};

use crate::EventSource;

pub mod general;
pub mod installer;

pub use general::*;
pub use installer::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, debug output)
    General(GeneralEvent),

    /// Install lifecycle events
    Installer(InstallerEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Installer(_) => EventSource::INSTALLER,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. })
            | Self::Installer(InstallerEvent::Failed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Installer(InstallerEvent::Installing { .. }) => Level::DEBUG,

            Self::Installer(
                InstallerEvent::Installed { .. } | InstallerEvent::Uninstalled { .. },
            ) => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "aurora::events::general",
            Self::Installer(_) => "aurora::events::installer",
        }
    }

    /// Package the event refers to, if any
    #[must_use]
    pub fn package_name(&self) -> Option<&str> {
        match self {
            Self::Installer(event) => Some(event.package_name()),
            Self::General(_) => None,
        }
    }
}
