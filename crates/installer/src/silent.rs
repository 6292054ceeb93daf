//! Silent-install thresholds

use aurora_types::{version_codes, SdkLevel};

/// Lowest `targetSdk` an app may declare and still be updated without a
/// prompt on `os`. `None` when the OS level never allows it.
#[must_use]
pub fn min_target_sdk_for_silent(os: SdkLevel) -> Option<u32> {
    match os.get() {
        version_codes::BAKLAVA => Some(version_codes::VANILLA_ICE_CREAM),
        version_codes::VANILLA_ICE_CREAM => Some(version_codes::UPSIDE_DOWN_CAKE),
        version_codes::UPSIDE_DOWN_CAKE => Some(version_codes::TIRAMISU),
        version_codes::TIRAMISU => Some(version_codes::S),
        version_codes::S | version_codes::S_V2 => Some(version_codes::Q),
        _ => None,
    }
}

/// Whether an app targeting `target_sdk` qualifies on `os`
#[must_use]
pub fn target_sdk_allows_silent(os: SdkLevel, target_sdk: u32) -> bool {
    min_target_sdk_for_silent(os).is_some_and(|min| target_sdk >= min)
}
