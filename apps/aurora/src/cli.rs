//! Command line interface definition

use aurora_types::{DownloadFile, InstallerKind, SharedLib};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// aurora - install APKs through the Aurora installer backends
#[derive(Parser)]
#[command(name = "aurora")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install APKs through the Aurora installer backends")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the cache directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Assume this API level instead of reading it from the device
    #[arg(long, global = true, value_name = "LEVEL")]
    pub sdk: Option<u32>,

    /// Binary used to acquire a root shell
    #[arg(long, global = true, value_name = "BINARY")]
    pub su: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the installer backends usable on this device
    #[command(alias = "ls")]
    Installers,

    /// Install a package from downloaded APK files
    #[command(alias = "i")]
    Install {
        /// Package name of the app
        package: String,

        /// APK files, base first (relative paths resolve against the download dir)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Version code of the download
        #[arg(long, default_value_t = 0)]
        version_code: i64,

        /// Display name shown in events
        #[arg(long)]
        name: Option<String>,

        /// Shared library as PACKAGE:VERSION=FILE[,FILE...]
        #[arg(long = "lib", value_name = "PKG:VER=FILES", value_parser = parse_shared_lib)]
        libs: Vec<SharedLib>,

        /// Use this backend instead of the configured one
        #[arg(long, value_enum)]
        installer: Option<InstallerKind>,

        /// Return once the install is handed to the backend
        #[arg(long)]
        no_wait: bool,

        /// Seconds to wait for the install result
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },

    /// Check whether an update can be installed without user interaction
    Silent {
        /// Package name of the installed app
        package: String,

        /// Target SDK of the update
        #[arg(long)]
        target_sdk: u32,
    },

    /// Ask the system to uninstall a package
    #[command(alias = "rm")]
    Uninstall {
        /// Package name to uninstall
        package: String,
    },

    /// Persist the preferred installer backend
    SetInstaller {
        #[arg(value_enum)]
        installer: InstallerKind,
    },

    /// Device owner administration
    #[command(subcommand)]
    DeviceOwner(DeviceOwnerCommands),
}

#[derive(Subcommand)]
pub enum DeviceOwnerCommands {
    /// Show whether this app is device owner
    Status,
    /// Give up device ownership
    Remove,
    /// Hand device ownership to another installed app
    Transfer {
        /// Package declaring a device admin receiver
        target: String,
    },
}

/// Parse `com.example.lib:3=/path/a.apk,/path/b.apk`
pub fn parse_shared_lib(value: &str) -> Result<SharedLib, String> {
    let (head, files) = value
        .split_once('=')
        .ok_or_else(|| format!("expected PACKAGE:VERSION=FILE[,FILE...], got '{value}'"))?;
    let (package, version) = head
        .split_once(':')
        .ok_or_else(|| format!("missing version code in '{head}'"))?;
    if package.is_empty() {
        return Err(format!("missing package name in '{value}'"));
    }
    let version_code = version
        .parse::<i64>()
        .map_err(|e| format!("invalid version code '{version}': {e}"))?;

    let mut lib = SharedLib::new(package, version_code);
    for file in files.split(',').filter(|f| !f.is_empty()) {
        lib = lib.with_file(DownloadFile::new(file));
    }
    if lib.files.is_empty() {
        return Err(format!("no files given for {package}"));
    }
    Ok(lib)
}
