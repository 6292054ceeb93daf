//! Package manager queries through `pm` and `dumpsys package`

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aurora_errors::PlatformError;
use tracing::{debug, warn};

use crate::intent::ComponentName;
use crate::package::{PackageInfo, PackageManagerOperations};
use crate::process::ProcessOperations;
use crate::status::{PackageEvent, PackageEventSender};

const LISTENER_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct ShellPackageManager {
    process: Arc<dyn ProcessOperations>,
}

impl ShellPackageManager {
    pub fn new(process: Arc<dyn ProcessOperations>) -> Self {
        Self { process }
    }

    async fn dumpsys_package(&self, package_name: &str) -> Result<String, PlatformError> {
        let mut cmd = self.process.create_command("dumpsys");
        cmd.args(["package", package_name]);
        let output = self.process.execute_command(cmd).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Fields of one `Package [name]` block in `dumpsys package`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DumpsysPackage {
    pub version_code: i64,
    pub target_sdk: u32,
    pub installed: bool,
    pub enabled: bool,
    pub update_owner: Option<String>,
}

/// Parse the block for `package_name`; `None` when the package is absent
#[must_use]
pub fn parse_dumpsys_package(package_name: &str, dump: &str) -> Option<DumpsysPackage> {
    let header = format!("Package [{package_name}]");
    let mut lines = dump.lines().skip_while(|line| !line.contains(&header));
    lines.next()?;

    let mut parsed = DumpsysPackage {
        installed: true,
        enabled: true,
        ..DumpsysPackage::default()
    };
    let mut seen_user = false;

    for line in lines.take_while(|line| !line.contains("Package [")) {
        let trimmed = line.trim();
        if trimmed.starts_with("User ") && !seen_user {
            seen_user = true;
            for (key, value) in pairs(trimmed) {
                match key {
                    "installed" => parsed.installed = value == "true",
                    // 0 default, 1 enabled, 2..=4 disabled variants
                    "enabled" => parsed.enabled = matches!(value, "0" | "1"),
                    _ => {}
                }
            }
            continue;
        }
        for (key, value) in pairs(trimmed) {
            match key {
                "versionCode" => parsed.version_code = value.parse().unwrap_or_default(),
                "targetSdk" => parsed.target_sdk = value.parse().unwrap_or_default(),
                "updateOwnerPackageName" if value != "null" => {
                    parsed.update_owner = Some(value.to_string());
                }
                _ => {}
            }
        }
    }

    Some(parsed)
}

fn pairs(line: &str) -> impl Iterator<Item = (&str, &str)> {
    line.split_whitespace().filter_map(|token| token.split_once('='))
}

/// Package names from `pm list packages`
#[must_use]
pub fn parse_package_list(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("package:"))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl PackageManagerOperations for ShellPackageManager {
    async fn package_info(&self, package_name: &str) -> Result<Option<PackageInfo>, PlatformError> {
        let dump = self.dumpsys_package(package_name).await?;
        Ok(parse_dumpsys_package(package_name, &dump)
            .filter(|parsed| parsed.installed)
            .map(|parsed| PackageInfo {
                package_name: package_name.to_string(),
                version_code: parsed.version_code,
                enabled: parsed.enabled,
                target_sdk: parsed.target_sdk,
            }))
    }

    async fn is_shared_library_installed(
        &self,
        package_name: &str,
        version_code: i64,
    ) -> Result<bool, PlatformError> {
        Ok(self
            .package_info(package_name)
            .await?
            .is_some_and(|info| info.version_code == version_code))
    }

    async fn update_owner_package_name(
        &self,
        package_name: &str,
    ) -> Result<Option<String>, PlatformError> {
        let dump = self.dumpsys_package(package_name).await?;
        Ok(parse_dumpsys_package(package_name, &dump).and_then(|parsed| parsed.update_owner))
    }

    async fn query_broadcast_receivers(
        &self,
        package_name: &str,
        action: &str,
    ) -> Result<Vec<ComponentName>, PlatformError> {
        let mut cmd = self.process.create_command("pm");
        cmd.args(["query-receivers", "--components", "-a", action, "-p", package_name]);
        let output = self.process.execute_command(cmd).await?;
        Ok(output
            .stdout_str()
            .lines()
            .filter_map(ComponentName::unflatten)
            .filter(|component| component.package_name == package_name)
            .collect())
    }

    async fn register_package_listener(
        &self,
        sender: PackageEventSender,
    ) -> Result<(), PlatformError> {
        let process = self.process.clone();
        let list = move || {
            let process = process.clone();
            async move {
                let mut cmd = process.create_command("pm");
                cmd.args(["list", "packages"]);
                process
                    .execute_command(cmd)
                    .await
                    .map(|output| parse_package_list(&output.stdout_str()))
            }
        };

        let mut known = list().await?;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(LISTENER_POLL_INTERVAL);
            ticker.tick().await;
            while !sender.is_closed() {
                ticker.tick().await;
                let current = match list().await {
                    Ok(current) => current,
                    Err(e) => {
                        warn!(error = %e, "package listing failed");
                        continue;
                    }
                };
                for removed in known.difference(&current) {
                    debug!(package = %removed, "package removed");
                    let _ = sender.send(PackageEvent::Removed {
                        package_name: removed.clone(),
                    });
                }
                for added in current.difference(&known) {
                    let _ = sender.send(PackageEvent::Added {
                        package_name: added.clone(),
                    });
                }
                known = current;
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
Packages:
  Package [com.example] (4f1c2a):
    userId=10123
    versionCode=4021 minSdk=24 targetSdk=33
    versionName=4.2.1
    installerPackageName=com.aurora.store
    updateOwnerPackageName=com.aurora.store
    User 0: ceDataInode=1 installed=true hidden=false suspended=false stopped=false enabled=0 instant=false
  Package [com.other] (9b2e11):
    versionCode=7 minSdk=21 targetSdk=34
";

    #[test]
    fn parses_package_block() {
        let parsed = parse_dumpsys_package("com.example", DUMP).unwrap();
        assert_eq!(parsed.version_code, 4021);
        assert_eq!(parsed.target_sdk, 33);
        assert!(parsed.installed);
        assert!(parsed.enabled);
        assert_eq!(parsed.update_owner.as_deref(), Some("com.aurora.store"));
    }

    #[test]
    fn block_boundaries_are_respected() {
        let parsed = parse_dumpsys_package("com.other", DUMP).unwrap();
        assert_eq!(parsed.version_code, 7);
        assert_eq!(parsed.update_owner, None);
        assert!(parse_dumpsys_package("com.missing", DUMP).is_none());
    }

    #[test]
    fn disabled_state_is_detected() {
        let dump = "  Package [com.x] (1):\n    versionCode=1 targetSdk=30\n    User 0: installed=true enabled=3\n";
        assert!(!parse_dumpsys_package("com.x", dump).unwrap().enabled);
    }

    #[test]
    fn package_list() {
        let list = parse_package_list("package:com.a\npackage:com.b\n\n");
        assert_eq!(list.len(), 2);
        assert!(list.contains("com.b"));
    }
}
