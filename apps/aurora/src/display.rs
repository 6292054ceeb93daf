//! Output rendering and formatting

use aurora_types::{InstallerInfo, InstallerKind};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::io;

/// Final result of a command
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    Installers {
        current: InstallerKind,
        available: Vec<InstallerInfo>,
    },
    Check {
        label: String,
        value: bool,
    },
    Success {
        message: String,
    },
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    pub fn check(label: impl Into<String>, value: bool) -> Self {
        Self::Check {
            label: label.into(),
            value,
        }
    }
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    json_output: bool,
    colors: bool,
}

impl OutputRenderer {
    pub fn new(json_output: bool, colors: bool) -> Self {
        Self {
            json_output,
            colors,
        }
    }

    pub fn render_result(&self, result: &CommandResult) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        match result {
            CommandResult::Installers { current, available } => {
                self.render_installers(*current, available);
            }
            CommandResult::Check { label, value } => {
                println!("{label}: {}", if *value { "yes" } else { "no" });
            }
            CommandResult::Success { message } => println!("{message}"),
        }
        Ok(())
    }

    fn render_installers(&self, current: InstallerKind, available: &[InstallerInfo]) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Id", "Installer", "Name", "Notes"]);

        for info in available {
            let mut name = Cell::new(&info.title);
            if info.installer == current {
                name = name.add_attribute(Attribute::Bold);
                if self.colors {
                    name = name.fg(Color::Green);
                }
            }
            table.add_row(vec![
                Cell::new(info.id),
                Cell::new(info.installer),
                name,
                Cell::new(&info.subtitle),
            ]);
        }
        println!("{table}");

        if !available.iter().any(|info| info.installer == current) {
            println!("Configured installer '{current}' is unavailable; the session installer is used.");
        }
    }
}
