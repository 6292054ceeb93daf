//! Host platform operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors raised by the Android service bindings (package installer, package
/// manager, device policy, Shizuku, privileged companion, shell).
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("platform capability not available: {capability}")]
    CapabilityUnavailable { capability: String },

    #[error("permission denied: {operation} - {message}")]
    PermissionDenied { operation: String, message: String },

    #[error("session {session_id} not found")]
    SessionNotFound { session_id: i32 },

    #[error("session operation failed: {operation} on session {session_id} - {message}")]
    SessionOperationFailed {
        operation: String,
        session_id: i32,
        message: String,
    },

    #[error("package not found: {package}")]
    PackageNotFound { package: String },

    #[error("IPC call failed: {service} - {message}")]
    IpcFailed { service: String, message: String },

    #[error("unexpected output from {command}: {output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("file operation failed on {path}: {message}")]
    FileOperationFailed { path: String, message: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied { .. } => {
                Some("Grant the required permission and retry the install.")
            }
            Self::CommandNotFound { .. } => Some("Run the command from an Android shell."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::IpcFailed { .. } | Self::FileOperationFailed { .. }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ProcessExecutionFailed { .. } => "platform.process_failed",
            Self::CommandNotFound { .. } => "platform.command_not_found",
            Self::CapabilityUnavailable { .. } => "platform.capability_unavailable",
            Self::PermissionDenied { .. } => "platform.permission_denied",
            Self::SessionNotFound { .. } => "platform.session_not_found",
            Self::SessionOperationFailed { .. } => "platform.session_failed",
            Self::PackageNotFound { .. } => "platform.package_not_found",
            Self::IpcFailed { .. } => "platform.ipc_failed",
            Self::UnexpectedOutput { .. } => "platform.unexpected_output",
            Self::FileOperationFailed { .. } => "platform.file_failed",
        })
    }
}
