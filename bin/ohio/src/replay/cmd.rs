use std::time::Instant;

use clap::Parser;
use ohio_sim::{OhioWrapper, ReplayTransactionResponse};
use tracing::info;

use crate::common::{ConnectArgs, OhioError, Result};

/// Replay a transaction from RPC
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Transaction hash to replay
    #[arg(value_name = "TX_HASH")]
    pub tx_hash: String,

    /// Node connection
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cmd {
    /// Execute the replay command
    pub async fn run(&self) -> Result<()> {
        let wrapper = OhioWrapper::with_config(self.connect.config()?);
        wrapper.async_init().await?;

        let start = Instant::now();
        let response = wrapper.replay_transaction(&self.tx_hash).await;
        info!(elapsed = ?start.elapsed(), "Replay done");

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            print_response(&response);
        }

        if response.is_ok() {
            Ok(())
        } else {
            Err(OhioError::ReplayFailed(response.message))
        }
    }
}

fn print_response(response: &ReplayTransactionResponse) {
    println!("status:        {}", response.status);
    println!("gas used:      {}", response.gas_used);
    if !response.transaction_revert_message.is_empty() {
        println!("revert reason: {}", response.transaction_revert_message);
    }
    if !response.message.is_empty() {
        println!("message:       {}", response.message);
    }
}
