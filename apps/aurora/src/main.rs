//! aurora - install APKs on an Android device
//!
//! Thin CLI over the installer crate: probes the device through its shell,
//! picks the configured backend and streams installer events while a command
//! runs.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod setup;

use std::process;
use std::time::Duration;

use aurora_config::Config;
use aurora_events::{AppEvent, EventReceiver};
use aurora_installer::{AppInstaller, InstallerBackend};
use aurora_types::InstallerKind;
use clap::Parser;
use tokio::select;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

use crate::cli::{Cli, ColorChoice, Commands, DeviceOwnerCommands};
use crate::display::{CommandResult, OutputRenderer};
use crate::error::CliError;
use crate::events::{outcome_for, EventHandler};
use crate::setup::InstallerSetup;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    logging::init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting aurora v{}", env!("CARGO_PKG_VERSION"));

    // file, then environment, then flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global);

    let setup = InstallerSetup::initialize(config, cli.global.config.as_deref()).await?;
    let installer = setup.installer();
    let _pumps = installer.start().await;
    let events = installer.subscribe();

    let colors = match cli.global.color.unwrap_or(ColorChoice::Auto) {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let handler = EventHandler::new(colors, cli.global.json);
    let renderer = OutputRenderer::new(cli.global.json, colors);

    let result = execute_command(cli.command, &setup, events, &handler).await?;
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) {
    if let Some(sdk) = global.sdk {
        config.platform.sdk_override = Some(sdk);
    }
    if let Some(su) = &global.su {
        config.platform.su.clone_from(su);
    }
}

async fn execute_command(
    command: Commands,
    setup: &InstallerSetup,
    events: EventReceiver,
    handler: &EventHandler,
) -> Result<CommandResult, CliError> {
    let installer = setup.installer();
    match command {
        Commands::Installers => Ok(CommandResult::Installers {
            current: installer.current_installer(),
            available: installer.get_available_installers_info().await,
        }),

        Commands::Install {
            package,
            files,
            version_code,
            name,
            libs,
            installer: kind,
            no_wait,
            timeout,
        } => {
            let download = setup.download(&package, version_code, name, &files, libs)?;
            let backend = match kind {
                Some(kind) => installer.get_installer(kind),
                None => installer.get_preferred_installer().await,
            };
            let kind = backend.kind();
            info!(package = %package, installer = %kind, "installing");

            let mut events = events;
            let install = backend.install(&download);
            tokio::pin!(install);
            let mut outcome = None;
            loop {
                select! {
                    () = &mut install => break,
                    message = events.recv() => {
                        if let Some(done) = observe(message, &package, handler) {
                            outcome = Some(done);
                        }
                    }
                }
            }

            // prompt-based backends finish outside this process
            let prompt_only = matches!(kind, InstallerKind::Native | InstallerKind::AppManager);
            if outcome.is_none() && !no_wait && !prompt_only {
                outcome = wait_for_outcome(&mut events, &package, handler, timeout).await?;
            } else {
                drain(&mut events, &package, handler, &mut outcome);
            }

            match outcome {
                Some(Err(message)) => Err(CliError::InstallFailed { package, message }),
                Some(Ok(())) => Ok(CommandResult::success(format!("Installed {package}"))),
                None => Ok(CommandResult::success(format!(
                    "Handed {package} to the {kind} installer"
                ))),
            }
        }

        Commands::Silent {
            package,
            target_sdk,
        } => {
            let silent = installer.can_install_silently(&package, target_sdk).await;
            Ok(CommandResult::check(
                format!("{package} updates silently with {}", installer.current_installer()),
                silent,
            ))
        }

        Commands::Uninstall { package } => {
            installer.uninstall(&package).await?;
            Ok(CommandResult::success(format!(
                "Uninstall of {package} requested"
            )))
        }

        Commands::SetInstaller { installer: kind } => {
            installer.set_installer(kind)?;
            warn_if_unusable(installer, kind).await;
            Ok(CommandResult::success(format!("Installer set to {kind}")))
        }

        Commands::DeviceOwner(command) => match command {
            DeviceOwnerCommands::Status => Ok(CommandResult::check(
                "Device owner",
                installer.is_device_owner().await,
            )),
            DeviceOwnerCommands::Remove => {
                if installer.remove_device_owner().await {
                    Ok(CommandResult::success("Device owner removed"))
                } else {
                    Err(CliError::InvalidArguments(
                        "device owner could not be removed".to_string(),
                    ))
                }
            }
            DeviceOwnerCommands::Transfer { target } => {
                if installer.transfer_device_owner(&target).await {
                    Ok(CommandResult::success(format!(
                        "Device owner transferred to {target}"
                    )))
                } else {
                    Err(CliError::InvalidArguments(format!(
                        "device owner could not be transferred to {target}"
                    )))
                }
            }
        },
    }
}

type Outcome = Result<(), String>;

/// Display one received message and report whether it settles `package`
fn observe(
    message: Result<aurora_events::EventMessage, RecvError>,
    package: &str,
    handler: &EventHandler,
) -> Option<Outcome> {
    match message {
        Ok(message) => {
            handler.handle_event(&message);
            match &message.event {
                AppEvent::Installer(event) => {
                    outcome_for(event, package).map(|r| r.map_err(str::to_string))
                }
                AppEvent::General(_) => None,
            }
        }
        Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "event display fell behind");
            None
        }
        Err(RecvError::Closed) => None,
    }
}

fn drain(
    events: &mut EventReceiver,
    package: &str,
    handler: &EventHandler,
    outcome: &mut Option<Outcome>,
) {
    while let Ok(message) = events.try_recv() {
        if let Some(done) = observe(Ok(message), package, handler) {
            *outcome = Some(done);
        }
    }
}

async fn wait_for_outcome(
    events: &mut EventReceiver,
    package: &str,
    handler: &EventHandler,
    timeout: u64,
) -> Result<Option<Outcome>, CliError> {
    let deadline = Instant::now() + Duration::from_secs(timeout);
    loop {
        select! {
            () = sleep(deadline.saturating_duration_since(Instant::now())) => {
                return Err(CliError::Timeout {
                    package: package.to_string(),
                    seconds: timeout,
                });
            }
            message = events.recv() => {
                if matches!(message, Err(RecvError::Closed)) {
                    return Ok(None);
                }
                if let Some(done) = observe(message, package, handler) {
                    return Ok(Some(done));
                }
            }
        }
    }
}

async fn warn_if_unusable(installer: &AppInstaller, kind: InstallerKind) {
    let preferred = installer.get_preferred_installer().await.kind();
    if preferred != kind {
        warn!(installer = %kind, "installer prerequisites are not met; installs use {preferred}");
        eprintln!("Note: {kind} is not usable right now, installs will use {preferred}.");
    }
}
