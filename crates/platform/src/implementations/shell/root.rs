//! Root shell through `su -c`

use std::sync::Arc;

use async_trait::async_trait;
use aurora_errors::PlatformError;

use crate::process::{shell_join, CommandOutput, ProcessOperations};
use crate::root::RootShell;

pub struct SuRootShell {
    process: Arc<dyn ProcessOperations>,
    su: String,
}

impl SuRootShell {
    pub fn new(process: Arc<dyn ProcessOperations>, su: impl Into<String>) -> Self {
        Self {
            process,
            su: su.into(),
        }
    }
}

#[async_trait]
impl RootShell for SuRootShell {
    async fn exec(&self, args: &[String]) -> Result<CommandOutput, PlatformError> {
        let mut cmd = self.process.create_command(&self.su);
        cmd.arg("-c").arg(shell_join(args));
        self.process.execute_command(cmd).await
    }
}
