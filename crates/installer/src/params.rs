//! Session parameters per backend and OS level

use aurora_platform::session::{
    InstallLocation, InstallReason, PackageSource, SessionMode, SessionParams,
    UserActionRequirement,
};
use aurora_platform::DeviceProfile;
use aurora_types::version_codes;

/// Backend-specific choices that shape [`SessionParams`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamsProfile {
    pub install_reason: InstallReason,
    /// Set the installer package name on every OS level, not only 34+
    pub always_set_installer: bool,
}

impl ParamsProfile {
    pub const SESSION: Self = Self {
        install_reason: InstallReason::User,
        always_set_installer: false,
    };

    pub const DEVICE_OWNER: Self = Self {
        install_reason: InstallReason::Policy,
        always_set_installer: false,
    };

    pub const SHIZUKU: Self = Self {
        install_reason: InstallReason::User,
        always_set_installer: true,
    };
}

/// Parameters for staging `package_name` on `device`
#[must_use]
pub fn session_params(
    device: &DeviceProfile,
    package_name: &str,
    profile: ParamsProfile,
) -> SessionParams {
    let sdk = device.sdk;
    let mut params = SessionParams::new(SessionMode::FullInstall);
    params.app_package_name = Some(package_name.to_string());
    params.install_location = InstallLocation::Auto;

    if sdk.at_least(version_codes::N) {
        params.originating_uid = Some(device.uid);
    }
    if sdk.at_least(version_codes::O) {
        params.install_reason = Some(profile.install_reason);
    }
    if sdk.at_least(version_codes::S) {
        params.require_user_action = Some(UserActionRequirement::NotRequired);
    }
    if sdk.at_least(version_codes::TIRAMISU) {
        params.package_source = Some(PackageSource::Store);
    }
    if sdk.at_least(version_codes::UPSIDE_DOWN_CAKE) {
        params.installer_package_name = Some(device.own_package.clone());
        params.request_update_ownership = true;
        params.application_enabled_setting_persistent = true;
    }
    if profile.always_set_installer {
        params.installer_package_name = Some(device.own_package.clone());
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_types::SdkLevel;

    fn device(sdk: u32) -> DeviceProfile {
        DeviceProfile::new(SdkLevel::new(sdk), "com.aurora.store", 10_234)
    }

    #[test]
    fn lollipop_sets_no_optional_fields() {
        let params = session_params(&device(21), "com.example", ParamsProfile::SESSION);
        assert_eq!(params.app_package_name.as_deref(), Some("com.example"));
        assert_eq!(params.originating_uid, None);
        assert_eq!(params.install_reason, None);
        assert_eq!(params.require_user_action, None);
        assert_eq!(params.package_source, None);
        assert_eq!(params.installer_package_name, None);
        assert!(!params.request_update_ownership);
    }

    #[test]
    fn fields_switch_on_at_their_api_level() {
        let n = session_params(&device(24), "p", ParamsProfile::SESSION);
        assert_eq!(n.originating_uid, Some(10_234));
        assert_eq!(n.install_reason, None);

        let o = session_params(&device(26), "p", ParamsProfile::DEVICE_OWNER);
        assert_eq!(o.install_reason, Some(InstallReason::Policy));

        let s = session_params(&device(31), "p", ParamsProfile::SESSION);
        assert_eq!(s.require_user_action, Some(UserActionRequirement::NotRequired));
        assert_eq!(s.package_source, None);

        let t = session_params(&device(33), "p", ParamsProfile::SESSION);
        assert_eq!(t.package_source, Some(PackageSource::Store));
        assert_eq!(t.installer_package_name, None);

        let u = session_params(&device(34), "p", ParamsProfile::SESSION);
        assert_eq!(u.installer_package_name.as_deref(), Some("com.aurora.store"));
        assert!(u.request_update_ownership);
        assert!(u.application_enabled_setting_persistent);
    }

    #[test]
    fn shizuku_always_names_the_installer() {
        let params = session_params(&device(28), "p", ParamsProfile::SHIZUKU);
        assert_eq!(params.installer_package_name.as_deref(), Some("com.aurora.store"));
        assert_eq!(params.install_reason, Some(InstallReason::User));
        assert!(!params.request_update_ownership);
    }
}
