//! In-flight install session records

use serde::{Deserialize, Serialize};
use std::fmt;

/// One OS-level install transaction staged by a backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: i32,
    pub package_name: String,
    pub version_code: i64,
    pub display_name: Option<String>,
}

impl SessionInfo {
    pub fn new(session_id: i32, package_name: impl Into<String>, version_code: i64) -> Self {
        Self {
            session_id,
            package_name: package_name.into(),
            version_code,
            display_name: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

impl fmt::Display for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session {} ({}@{})",
            self.session_id, self.package_name, self.version_code
        )
    }
}
