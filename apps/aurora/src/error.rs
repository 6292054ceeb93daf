//! CLI error handling

use std::fmt;

use aurora_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration, platform or installer error
    Installer(aurora_errors::Error),
    /// Device probing failed
    Setup(String),
    /// Invalid command arguments
    InvalidArguments(String),
    /// The install outcome did not arrive in time
    Timeout { package: String, seconds: u64 },
    /// The installer reported a failed install
    InstallFailed { package: String, message: String },
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Installer(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Setup(msg) => write!(f, "Device setup error: {msg}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Timeout { package, seconds } => {
                write!(f, "No install result for {package} after {seconds}s")
            }
            CliError::InstallFailed { package, message } => {
                write!(f, "Failed to install {package}: {message}")
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Installer(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<aurora_errors::Error> for CliError {
    fn from(e: aurora_errors::Error) -> Self {
        CliError::Installer(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
