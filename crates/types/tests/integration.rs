//! Integration tests for types

#[cfg(test)]
mod tests {
    use aurora_types::*;

    #[test]
    fn test_download_deserializes_without_optional_fields() {
        let json = r#"{
            "package_name": "org.example.app",
            "version_code": 42,
            "display_name": "Example",
            "files": [{ "path": "/sdcard/base.apk", "name": "base.apk" }]
        }"#;
        let download: Download = serde_json::from_str(json).unwrap();
        assert_eq!(download.version_code, 42);
        assert!(download.shared_libs.is_empty());
        assert!(!download.is_split());
    }

    #[test]
    fn test_installer_kind_serialization() {
        let json = serde_json::to_string(&InstallerKind::DeviceOwner).unwrap();
        assert_eq!(json, r#""device_owner""#);
    }

    #[test]
    fn test_sdk_level_gates() {
        let sdk = SdkLevel::new(version_codes::TIRAMISU);
        assert!(sdk.is_s_and_above());
        assert!(sdk.is_t_and_above());
        assert!(!sdk.is_u_and_above());
        assert_eq!(sdk.to_string(), "API 33");
    }

    #[test]
    fn test_installer_info_defaults_to_all_variants() {
        let info = InstallerInfo::new(InstallerKind::Root, "Root", "su", "Root installer");
        assert_eq!(info.id, 2);
        assert_eq!(info.package_names.len(), BuildType::ALL.len());
    }
}
