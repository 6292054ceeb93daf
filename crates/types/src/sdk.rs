//! Android API level handling

use serde::{Deserialize, Serialize};
use std::fmt;

/// `Build.VERSION_CODES` values the installer gates behaviour on
pub mod version_codes {
    pub const LOLLIPOP: u32 = 21;
    pub const N: u32 = 24;
    pub const O: u32 = 26;
    pub const P: u32 = 28;
    pub const Q: u32 = 29;
    pub const R: u32 = 30;
    pub const S: u32 = 31;
    pub const S_V2: u32 = 32;
    pub const TIRAMISU: u32 = 33;
    pub const UPSIDE_DOWN_CAKE: u32 = 34;
    pub const VANILLA_ICE_CREAM: u32 = 35;
    pub const BAKLAVA: u32 = 36;
}

/// API level of the running OS (`Build.VERSION.SDK_INT`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SdkLevel(pub u32);

impl SdkLevel {
    #[must_use]
    pub const fn new(level: u32) -> Self {
        Self(level)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn at_least(self, level: u32) -> bool {
        self.0 >= level
    }

    #[must_use]
    pub const fn is_l_and_above(self) -> bool {
        self.at_least(version_codes::LOLLIPOP)
    }

    #[must_use]
    pub const fn is_n_and_above(self) -> bool {
        self.at_least(version_codes::N)
    }

    #[must_use]
    pub const fn is_o_and_above(self) -> bool {
        self.at_least(version_codes::O)
    }

    #[must_use]
    pub const fn is_p_and_above(self) -> bool {
        self.at_least(version_codes::P)
    }

    #[must_use]
    pub const fn is_s_and_above(self) -> bool {
        self.at_least(version_codes::S)
    }

    #[must_use]
    pub const fn is_t_and_above(self) -> bool {
        self.at_least(version_codes::TIRAMISU)
    }

    #[must_use]
    pub const fn is_u_and_above(self) -> bool {
        self.at_least(version_codes::UPSIDE_DOWN_CAKE)
    }
}

impl From<u32> for SdkLevel {
    fn from(level: u32) -> Self {
        Self(level)
    }
}

impl fmt::Display for SdkLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API {}", self.0)
    }
}
