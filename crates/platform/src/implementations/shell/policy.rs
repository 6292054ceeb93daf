//! Device policy through `dumpsys device_policy` and `dpm`

use std::sync::Arc;

use async_trait::async_trait;
use aurora_errors::PlatformError;

use crate::intent::ComponentName;
use crate::policy::DevicePolicyOperations;
use crate::process::ProcessOperations;

pub struct ShellDevicePolicy {
    process: Arc<dyn ProcessOperations>,
}

impl ShellDevicePolicy {
    pub fn new(process: Arc<dyn ProcessOperations>) -> Self {
        Self { process }
    }

    async fn device_owner(&self) -> Result<Option<ComponentName>, PlatformError> {
        let mut cmd = self.process.create_command("dumpsys");
        cmd.arg("device_policy");
        let output = self.process.execute_command(cmd).await?;
        Ok(parse_device_owner(&output.stdout_str()))
    }
}

/// Admin component of the `Device Owner:` section, if any
#[must_use]
pub fn parse_device_owner(dump: &str) -> Option<ComponentName> {
    dump.lines()
        .skip_while(|line| !line.trim_start().starts_with("Device Owner"))
        .skip(1)
        .take_while(|line| line.starts_with("    ") || line.trim().is_empty())
        .find_map(|line| {
            let value = line.trim().strip_prefix("admin=ComponentInfo{")?;
            ComponentName::unflatten(value.trim_end_matches('}'))
        })
}

#[async_trait]
impl DevicePolicyOperations for ShellDevicePolicy {
    async fn is_device_owner_app(&self, package_name: &str) -> Result<bool, PlatformError> {
        Ok(self
            .device_owner()
            .await?
            .is_some_and(|admin| admin.package_name == package_name))
    }

    async fn clear_device_owner_app(&self, package_name: &str) -> Result<(), PlatformError> {
        let admin = self
            .device_owner()
            .await?
            .filter(|admin| admin.package_name == package_name)
            .ok_or_else(|| PlatformError::PermissionDenied {
                operation: "clear device owner".to_string(),
                message: format!("{package_name} is not the device owner"),
            })?;

        let mut cmd = self.process.create_command("dpm");
        cmd.arg("remove-active-admin").arg(admin.flatten());
        let output = self.process.execute_command(cmd).await?;
        if output.success() && output.combined().contains("Success") {
            Ok(())
        } else {
            Err(PlatformError::PermissionDenied {
                operation: "dpm remove-active-admin".to_string(),
                message: output.combined(),
            })
        }
    }

    async fn transfer_ownership(
        &self,
        _admin: &ComponentName,
        _target: &ComponentName,
    ) -> Result<(), PlatformError> {
        // Only the owning app can call transferOwnership; dpm has no equivalent.
        Err(PlatformError::CapabilityUnavailable {
            capability: "device owner transfer from shell".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_owner_section_is_parsed() {
        let dump = "\
Current Device Policy Manager state:
  Device Owner:
    admin=ComponentInfo{com.aurora.store/com.aurora.store.data.receiver.DeviceOwnerReceiver}
    name=
    package=com.aurora.store
    User ID: 0

  Profile Owner (User 0):
    admin=ComponentInfo{com.work/.Admin}
";
        let owner = parse_device_owner(dump).unwrap();
        assert_eq!(owner.package_name, "com.aurora.store");
        assert!(parse_device_owner("Current Device Policy Manager state:\n").is_none());
    }
}
