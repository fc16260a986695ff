//! `ohio` CLI tool for replaying historical EVM transactions
//!
//! Transactions are replayed against a fork of the node they were mined on, reached over
//! websockets.

use clap::Parser;

mod cmd;
pub use cmd::*;

mod call;
mod common;
mod head;
mod replay;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    cli.log_args.init()?;
    cli.command.run().await.inspect_err(|e| eprintln!("{e}"))
}
