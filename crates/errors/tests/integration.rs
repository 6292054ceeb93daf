//! Integration tests for error types

#[cfg(test)]
mod tests {
    use aurora_errors::*;

    #[test]
    fn test_error_conversion() {
        let err: Error = InstallerError::DeviceOwnerRequired.into();
        assert!(matches!(err, Error::Installer(_)));
        assert_eq!(err.user_code(), Some("installer.device_owner_required"));
    }

    #[test]
    fn test_error_display() {
        let err = InstallerError::StagingFailed {
            package: "org.example.app".into(),
            message: "disk full".into(),
        };
        assert_eq!(err.to_string(), "failed to stage org.example.app: disk full");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_detail_includes_causes() {
        let err: Error = PlatformError::SessionNotFound { session_id: 7 }.into();
        let detail = err.detail();
        assert!(detail.contains("SessionNotFound"));
        assert!(detail.contains("caused by: session 7 not found"));
    }

    #[test]
    fn test_user_message_for_config() {
        let err: Error = ConfigError::InvalidValue {
            field: "AURORA_INSTALLER_ID".into(),
            value: "x".into(),
        }
        .into();
        assert_eq!(err.user_message(), "invalid value for AURORA_INSTALLER_ID: x");
        assert!(err.user_hint().is_some());
    }
}
