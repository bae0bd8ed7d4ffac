//! Logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the level comes from `-v` flags.
//! The TUI owns the terminal, so in TUI mode logs go to a file or nowhere.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, EXIT_OUTPUT};

/// Where log lines are written.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbose: u8, target: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    // `try_init` only fails when a subscriber is already installed.
    match target {
        LogTarget::Stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        LogTarget::File(path) => {
            let file = File::create(&path).map_err(|e| {
                AppError::new(EXIT_OUTPUT, format!("Failed to create log file '{}': {e}", path.display()))
            })?;
            let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
        }
        LogTarget::Discard => {
            let _ = builder.with_writer(std::io::sink).try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(5), "debug");
    }
}
