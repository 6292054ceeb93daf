//! Activity launching

use async_trait::async_trait;
use aurora_errors::PlatformError;

use crate::intent::Intent;

#[async_trait]
pub trait ActivityLauncher: Send + Sync {
    async fn start_activity(&self, intent: &Intent) -> Result<(), PlatformError>;
}
