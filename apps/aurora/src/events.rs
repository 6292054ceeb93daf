//! Installer event display

use aurora_events::{AppEvent, EventMessage, GeneralEvent, InstallerEvent};
use console::Style;

/// Prints installer events as they arrive
pub struct EventHandler {
    json: bool,
    ok: Style,
    warn: Style,
    err: Style,
    dim: Style,
}

impl EventHandler {
    pub fn new(colors: bool, json: bool) -> Self {
        let style = |s: Style| if colors { s } else { Style::new() };
        Self {
            json,
            ok: style(Style::new().green()),
            warn: style(Style::new().yellow()),
            err: style(Style::new().red().bold()),
            dim: style(Style::new().dim()),
        }
    }

    pub fn handle_event(&self, message: &EventMessage) {
        if self.json {
            if let AppEvent::Installer(_) = message.event {
                if let Ok(line) = serde_json::to_string(message) {
                    println!("{line}");
                }
            }
            return;
        }

        match &message.event {
            AppEvent::Installer(event) => self.show_installer_event(event),
            AppEvent::General(GeneralEvent::Warning { message, .. }) => {
                eprintln!("{} {message}", self.warn.apply_to("warning:"));
            }
            AppEvent::General(_) => {}
        }
    }

    fn show_installer_event(&self, event: &InstallerEvent) {
        match event {
            InstallerEvent::Installing {
                package_name,
                progress,
            } => {
                let percent = (progress.clamp(0.0, 1.0) * 100.0).round();
                eprintln!(
                    "{} {package_name} {percent}%",
                    self.dim.apply_to("installing")
                );
            }
            InstallerEvent::Installed { package_name } => {
                eprintln!("{} {package_name}", self.ok.apply_to("installed"));
            }
            InstallerEvent::Uninstalled { package_name } => {
                eprintln!("{} {package_name}", self.ok.apply_to("uninstalled"));
            }
            InstallerEvent::Failed {
                package_name,
                error,
                extra,
            } => {
                eprintln!(
                    "{} {package_name}: {}",
                    self.err.apply_to("failed"),
                    error.as_deref().unwrap_or("unknown error")
                );
                if let Some(extra) = extra {
                    eprintln!("  {}", self.dim.apply_to(extra));
                }
            }
        }
    }
}

/// Terminal outcome of `package`, if `event` is one
pub fn outcome_for<'a>(event: &'a InstallerEvent, package: &str) -> Option<Result<(), &'a str>> {
    match event {
        InstallerEvent::Installed { package_name } if package_name == package => Some(Ok(())),
        InstallerEvent::Failed {
            package_name,
            error,
            ..
        } if package_name == package => Some(Err(error.as_deref().unwrap_or("unknown error"))),
        _ => None,
    }
}
