//! `pm install-*` command lines and output parsing
//!
//! Shared by every implementation that drives install sessions through the
//! `pm` binary, whether from a plain shell or a root shell.

use std::path::Path;

use aurora_errors::PlatformError;

use crate::session::{InstallReason, SessionMode, SessionParams};
use crate::status::InstallStatusCode;

/// Arguments for `pm install-create`
#[must_use]
pub fn install_create_args(params: &SessionParams) -> Vec<String> {
    let mut args = vec!["pm".to_string(), "install-create".to_string(), "-r".to_string()];
    if params.mode == SessionMode::InheritExisting {
        if let Some(package) = &params.app_package_name {
            args.extend(["-p".to_string(), package.clone()]);
        }
    } else if let Some(package) = &params.app_package_name {
        args.extend(["--pkg".to_string(), package.clone()]);
    }
    args.extend([
        "--install-location".to_string(),
        params.install_location.code().to_string(),
    ]);
    if let Some(installer) = &params.installer_package_name {
        args.extend(["-i".to_string(), installer.clone()]);
    }
    if let Some(uid) = params.originating_uid {
        args.extend(["--originating-uid".to_string(), uid.to_string()]);
    }
    if let Some(reason) = params.install_reason {
        if reason != InstallReason::Unknown {
            args.extend(["--install-reason".to_string(), reason.code().to_string()]);
        }
    }
    if params.request_update_ownership {
        args.push("--update-ownership".to_string());
    }
    args
}

/// Arguments for `pm install-write`
#[must_use]
pub fn install_write_args(session_id: i32, name: &str, path: &Path, size: u64) -> Vec<String> {
    vec![
        "pm".to_string(),
        "install-write".to_string(),
        "-S".to_string(),
        size.to_string(),
        session_id.to_string(),
        name.to_string(),
        path.display().to_string(),
    ]
}

#[must_use]
pub fn install_commit_args(session_id: i32) -> Vec<String> {
    vec![
        "pm".to_string(),
        "install-commit".to_string(),
        session_id.to_string(),
    ]
}

#[must_use]
pub fn install_abandon_args(session_id: i32) -> Vec<String> {
    vec![
        "pm".to_string(),
        "install-abandon".to_string(),
        session_id.to_string(),
    ]
}

/// Extract the id from `Success: created install session [1234]`
///
/// # Errors
///
/// Returns [`PlatformError::UnexpectedOutput`] when no id is present.
pub fn parse_session_id(output: &str) -> Result<i32, PlatformError> {
    output
        .find('[')
        .zip(output.rfind(']'))
        .filter(|_| output.contains("Success"))
        .and_then(|(open, close)| output.get(open + 1..close))
        .and_then(|id| id.trim().parse().ok())
        .ok_or_else(|| PlatformError::UnexpectedOutput {
            command: "pm install-create".to_string(),
            output: output.to_string(),
        })
}

/// Map `pm install-commit` output to a status and OS message
#[must_use]
pub fn parse_commit_outcome(output: &str) -> (InstallStatusCode, Option<String>) {
    let output = output.trim();
    if output.lines().any(|line| line.trim() == "Success") {
        return (InstallStatusCode::Success, None);
    }

    // Failure [INSTALL_FAILED_OLDER_SDK: Requires newer sdk version]
    let reason = output
        .find("Failure [")
        .map(|start| &output[start + "Failure [".len()..])
        .map(|rest| rest.trim_end_matches(']'))
        .unwrap_or(output);
    let code = InstallStatusCode::from_failure_reason(reason);
    let message = if reason.is_empty() {
        None
    } else {
        Some(reason.to_string())
    };
    (code, message)
}
