//! Process execution through `tokio::process`

use async_trait::async_trait;
use aurora_errors::PlatformError;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Host process runner
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessOperations;

impl TokioProcessOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessOperations for TokioProcessOperations {
    async fn execute_command(&self, cmd: PlatformCommand) -> Result<CommandOutput, PlatformError> {
        let start = Instant::now();

        let output = Command::new(cmd.program())
            .args(cmd.get_args())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => PlatformError::CommandNotFound {
                    command: cmd.program().to_string(),
                },
                _ => PlatformError::ProcessExecutionFailed {
                    command: cmd.display(),
                    message: e.to_string(),
                },
            })?;

        debug!(
            command = %cmd.display(),
            exit_code = ?output.status.code(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "command finished"
        );

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
