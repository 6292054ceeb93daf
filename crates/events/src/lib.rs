#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for the Aurora installer
//!
//! Backends never return install outcomes to their caller; they publish them
//! here. Any number of subscribers (UI, background refreshers, the CLI) can
//! attach to the bus and observe `InstallerEvent`s on whatever task they run.
//!
//! ## Architecture
//!
//! - **Domain events**: `AppEvent` groups general and installer events
//! - **`EventEmitter` trait**: single API for every emission site
//! - **Tracing integration**: every published event is also logged at the
//!   level derived from the event

pub mod bus;
pub mod meta;
pub use bus::{EventBus, EventReceiver};
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, GeneralEvent, InstallerEvent};

use serde::{Deserialize, Serialize};

/// Event paired with its metadata, as delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with default metadata
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        Self::new(bus::default_meta(&event), event)
    }
}

/// The unified trait for emitting events throughout the installer
///
/// Implemented by the bus itself and by every component that holds one.
pub trait EventEmitter {
    /// Get the bus for this emitter
    fn event_bus(&self) -> Option<&EventBus>;

    /// Adjust metadata before emission (correlation ids)
    fn enrich_event_meta(&self, _event: &AppEvent, _meta: &mut EventMeta) {}

    /// Emit an event with explicit metadata
    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(bus) = self.event_bus() {
            bus.publish(EventMessage::new(meta, event));
        }
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        let mut meta = bus::default_meta(&event);
        self.enrich_event_meta(&event, &mut meta);
        self.emit_with_meta(meta, event);
    }

    /// Emit install progress for a package
    fn emit_installing(&self, package_name: impl Into<String>, progress: f32) {
        self.emit(AppEvent::Installer(InstallerEvent::installing(
            package_name,
            progress,
        )));
    }

    /// Emit a successful install
    fn emit_installed(&self, package_name: impl Into<String>) {
        self.emit(AppEvent::Installer(InstallerEvent::installed(package_name)));
    }

    /// Emit a package removal
    fn emit_uninstalled(&self, package_name: impl Into<String>) {
        self.emit(AppEvent::Installer(InstallerEvent::uninstalled(
            package_name,
        )));
    }

    /// Emit a failed install with message and detail
    fn emit_failed(
        &self,
        package_name: impl Into<String>,
        error: Option<String>,
        extra: Option<String>,
    ) {
        self.emit(AppEvent::Installer(InstallerEvent::failed(
            package_name,
            error,
            extra,
        )));
    }

    /// Emit a failed install built from an error value
    fn emit_install_error(&self, package_name: impl Into<String>, error: &aurora_errors::Error) {
        self.emit(AppEvent::Installer(InstallerEvent::failed_with_error(
            package_name,
            error,
        )));
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit a warning event with context
    fn emit_warning_with_context(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning_with_context(
            message, context,
        )));
    }

    /// Emit an error event
    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }
}

/// The bus can be used directly wherever an emitter is expected
impl EventEmitter for EventBus {
    fn event_bus(&self) -> Option<&EventBus> {
        Some(self)
    }
}
