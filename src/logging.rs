//! Logging configuration for the SQL sandbox.
//!
//! Interactive sessions log to a file so log lines do not interleave with
//! the prompt; one-shot runs (`-e`, `--script`) log to stderr.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Where log events go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// `sql-sandbox.log` under the platform state directory.
    File,
    Stderr,
}

impl LogTarget {
    /// File logging when the user is at the prompt, stderr otherwise.
    pub fn for_mode(interactive: bool) -> Self {
        if interactive {
            Self::File
        } else {
            Self::Stderr
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// If the log file cannot be created the sandbox logs to stderr instead.
pub fn init(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match target {
        LogTarget::File => open_log_file()
            .map_err(|e| eprintln!("Warning: {e}; logging to stderr"))
            .ok(),
        LogTarget::Stderr => None,
    };

    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Creates the log file, truncating any previous run's log.
fn open_log_file() -> Result<File, String> {
    let path = get_log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Could not create log directory {}: {e}", parent.display()))?;
    }
    File::create(&path).map_err(|e| format!("Could not create log file {}: {e}", path.display()))
}

/// Returns the path for the log file.
///
/// Prefers the XDG state directory (`~/.local/state/sql-sandbox/`), then the
/// config directory, then the temp directory.
pub fn get_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("sql-sandbox").join("sql-sandbox.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("sql-sandbox.log"))
}
