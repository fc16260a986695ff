use clap::{Parser, Subcommand};

use crate::common::{LogArgs, OhioError};

/// Command line interface of the `ohio` tool
#[derive(Parser, Debug)]
#[command(infer_subcommands = true, version)]
pub struct Cli {
    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: MainCmd,
}

/// Main command enumeration for the ohio CLI tool
#[derive(Subcommand, Debug)]
pub enum MainCmd {
    /// Replay a mined transaction on a fork of its block
    Replay(crate::replay::Cmd),
    /// Execute a call against a fork
    Call(crate::call::Cmd),
    /// Follow new blocks
    Head(crate::head::Cmd),
}

/// Error types for the main command system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command error
    #[error("{0}")]
    Ohio(#[from] OhioError),
}

impl MainCmd {
    /// Execute the main command
    pub async fn run(&self) -> Result<(), Error> {
        match self {
            Self::Replay(cmd) => cmd.run().await?,
            Self::Call(cmd) => cmd.run().await?,
            Self::Head(cmd) => cmd.run().await?,
        }
        Ok(())
    }
}
