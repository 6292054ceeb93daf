//! Activity launching through `am start`

use std::sync::Arc;

use async_trait::async_trait;
use aurora_errors::PlatformError;
use tracing::info;

use crate::activity::ActivityLauncher;
use crate::intent::{Intent, IntentExtra};
use crate::process::{PlatformCommand, ProcessOperations};

pub struct AmActivityLauncher {
    process: Arc<dyn ProcessOperations>,
}

impl AmActivityLauncher {
    pub fn new(process: Arc<dyn ProcessOperations>) -> Self {
        Self { process }
    }
}

/// `am start` invocation for `intent`
#[must_use]
pub fn am_start_command(intent: &Intent) -> PlatformCommand {
    let mut cmd = PlatformCommand::new("am");
    cmd.args(["start", "-a", intent.action.as_str()]);
    if let Some(data) = &intent.data {
        cmd.args(["-d", data.as_str()]);
    }
    if let Some(mime_type) = &intent.mime_type {
        cmd.args(["-t", mime_type.as_str()]);
    }
    if let Some(component) = &intent.component {
        cmd.arg("-n").arg(component.flatten());
    } else if let Some(package) = &intent.package {
        cmd.args(["-p", package.as_str()]);
    }
    if intent.flags != 0 {
        cmd.arg("-f").arg(format!("0x{:08x}", intent.flags));
    }
    for (key, value) in &intent.extras {
        match value {
            IntentExtra::Bool(b) => {
                cmd.args(["--ez", key.as_str()]).arg(b.to_string());
            }
            IntentExtra::String(s) => {
                cmd.args(["--es", key.as_str(), s.as_str()]);
            }
            IntentExtra::UriList(uris) => {
                cmd.args(["--eua", key.as_str()]).arg(uris.join(","));
            }
        }
    }
    cmd
}

#[async_trait]
impl ActivityLauncher for AmActivityLauncher {
    async fn start_activity(&self, intent: &Intent) -> Result<(), PlatformError> {
        let cmd = am_start_command(intent);
        let display = cmd.display();
        let output = self.process.execute_command(cmd).await?;
        let text = output.combined();
        if !output.success() || text.contains("Error:") {
            return Err(PlatformError::ProcessExecutionFailed {
                command: display,
                message: text,
            });
        }
        info!(action = %intent.action, "activity started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{
        package_uri, ACTION_DELETE, EXTRA_RETURN_RESULT, FLAG_ACTIVITY_NEW_TASK,
    };

    #[test]
    fn uninstall_intent_renders_flags_and_extras() {
        let intent = Intent::new(ACTION_DELETE)
            .with_data(package_uri("com.example"))
            .add_flags(FLAG_ACTIVITY_NEW_TASK)
            .with_extra(EXTRA_RETURN_RESULT, IntentExtra::Bool(true));
        assert_eq!(
            am_start_command(&intent).display(),
            "am start -a android.intent.action.DELETE -d package:com.example -f 0x10000000 \
             --ez android.intent.extra.RETURN_RESULT true"
        );
    }
}
