//! Root shell access

use async_trait::async_trait;
use aurora_errors::PlatformError;

use crate::process::CommandOutput;

#[async_trait]
pub trait RootShell: Send + Sync {
    /// Run `args` as a single command in a root shell
    async fn exec(&self, args: &[String]) -> Result<CommandOutput, PlatformError>;
}
