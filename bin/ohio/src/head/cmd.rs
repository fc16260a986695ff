use std::num::NonZeroUsize;

use clap::Parser;
use ohio_sim::EvmSimulator;
use tracing::debug;

use crate::common::{ConnectArgs, Result};

/// Follow new blocks through the block sync task
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Stop after this many blocks, at least one
    #[arg(long)]
    pub count: Option<NonZeroUsize>,

    /// Node connection
    #[command(flatten)]
    pub connect: ConnectArgs,
}

impl Cmd {
    /// Execute the head command
    pub async fn run(&self) -> Result<()> {
        let simulator = EvmSimulator::connect(self.connect.config()?).await?;
        let mut heads = simulator.subscribe_latest_block();
        let sync = simulator.spawn_block_sync();

        let mut seen = 0;
        loop {
            tokio::select! {
                changed = heads.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let head = *heads.borrow_and_update();
                    println!("block {} timestamp {}", head.number, head.timestamp);
                    seen += 1;
                    if self.count.is_some_and(|count| seen >= count.get()) {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupted");
                    break;
                }
            }
        }

        sync.abort();
        Ok(())
    }
}
