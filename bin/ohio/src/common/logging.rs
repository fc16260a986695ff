//! Logging configuration for the ohio CLI tool.
//!
//! Verbosity comes from `-v` flags unless `RUST_LOG` is set; logs go to stderr or to
//! `--log.file`.

use std::path::PathBuf;

use clap::Args;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use super::{OhioError, Result};

/// Logging configuration arguments.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Increase logging verbosity (-v = error, -vv = warn, -vvv = info, -vvvv = debug, -vvvvv =
    /// trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log file path. If specified, logs are written to this file instead of stderr.
    #[arg(long = "log.file", visible_aliases = ["log-file"], global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable colorful console logging. Only applies when logging to stderr (no --log.file).
    #[arg(long = "log.no-color", visible_aliases = ["log-no-color"], global = true)]
    pub log_no_color: bool,
}

impl LogArgs {
    /// The filter directive derived from `-v` flags, `None` when logging is off.
    pub fn directive(&self) -> Option<String> {
        let level = match self.verbose {
            0 => return None,
            1 => Level::ERROR,
            2 => Level::WARN,
            3 => Level::INFO,
            4 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Some(format!("ohio={level},ohio_sim={level}"))
    }

    /// Initialize the tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over `-v` flags. Without either, logging is off. The log
    /// target is only shown from DEBUG on.
    pub fn init(&self) -> Result<()> {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.directive().unwrap_or_else(|| "off".to_string()))
        };
        let show_target = self.verbose >= 4;

        let result = if let Some(ref log_file) = self.log_file {
            let file = std::fs::File::create(log_file).map_err(|e| {
                OhioError::Logging(format!("cannot create {}: {e}", log_file.display()))
            })?;
            fmt()
                .with_env_filter(filter)
                .with_target(show_target)
                .with_writer(file)
                .with_ansi(false)
                .try_init()
        } else {
            fmt()
                .with_env_filter(filter)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .with_ansi(!self.log_no_color)
                .try_init()
        };
        result.map_err(|e| OhioError::Logging(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directive() {
        assert_eq!(LogArgs::default().directive(), None);
        let args = LogArgs { verbose: 3, ..Default::default() };
        assert_eq!(args.directive().as_deref(), Some("ohio=INFO,ohio_sim=INFO"));
        let args = LogArgs { verbose: 9, ..Default::default() };
        assert_eq!(args.directive().as_deref(), Some("ohio=TRACE,ohio_sim=TRACE"));
    }
}
