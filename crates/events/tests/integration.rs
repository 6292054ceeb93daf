//! Integration tests for events

#[cfg(test)]
mod tests {
    use aurora_events::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test]
    async fn test_every_subscriber_receives_events() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.emit_installed("org.example.app");

        for rx in [&mut first, &mut second] {
            let message = rx.recv().await.unwrap();
            assert!(matches!(
                message.event,
                AppEvent::Installer(InstallerEvent::Installed { ref package_name })
                    if package_name == "org.example.app"
            ));
            assert_eq!(message.meta.correlation_id.as_deref(), Some("org.example.app"));
            assert_eq!(message.meta.source, EventSource::INSTALLER);
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        // Should not panic when nobody listens
        bus.emit_failed("org.example.app", Some("boom".into()), None);
        assert_eq!(bus.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.emit_warning("before");
        let mut rx = bus.subscribe();
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_failed_event_levels_and_serialization() {
        let event = AppEvent::Installer(InstallerEvent::failed(
            "org.example.app",
            Some("denied".into()),
            None,
        ));
        assert_eq!(event.log_level(), tracing::Level::ERROR);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "installer");
        assert_eq!(json["event"]["type"], "Failed");
    }

    #[test]
    fn test_failed_with_error_carries_detail() {
        let error: aurora_errors::Error = aurora_errors::InstallerError::NoFiles {
            package: "org.example.app".into(),
        }
        .into();
        let event = InstallerEvent::failed_with_error("org.example.app", &error);
        let InstallerEvent::Failed { error, extra, .. } = event else {
            panic!("expected failure");
        };
        assert_eq!(error.as_deref(), Some("no APK files to install for org.example.app"));
        assert!(extra.unwrap().contains("NoFiles"));
    }
}
