//! Tracing subscriber setup
//!
//! Normal runs log warnings to stderr. `--debug` writes structured JSON logs
//! to a timestamped file; in `--json` mode nothing reaches the terminal.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

const DEBUG_FILTER: &str = "info,aurora=debug,aurora_installer=debug,aurora_platform=debug";
const NORMAL_FILTER: &str = "warn,aurora=info";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Directory debug logs are written to
fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("aurora")
        .join("logs")
}

fn open_log_file() -> std::io::Result<(PathBuf, std::fs::File)> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!(
        "aurora-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    let file = std::fs::File::create(&path)?;
    Ok((path, file))
}

/// Initialize tracing/logging
pub fn init_tracing(json_mode: bool, debug_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_flag;

    if debug_enabled {
        match open_log_file() {
            Ok((path, file)) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(filter(DEBUG_FILTER))
                    .init();
                if !json_mode {
                    eprintln!("Debug logging enabled: {}", path.display());
                }
                return;
            }
            Err(e) if !json_mode => eprintln!("Warning: Failed to create log file: {e}"),
            Err(_) => {}
        }
    }

    if json_mode {
        // keep stdout parseable
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter(NORMAL_FILTER))
            .init();
    }
}
