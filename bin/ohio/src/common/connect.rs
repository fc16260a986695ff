use alloy_primitives::Address;
use clap::Args;
use ohio_sim::{Network, SimulatorConfig};

use super::{Hardfork, OhioError, Result};

/// Node connection arguments shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectArgs {
    /// Websocket URL of the node, takes precedence over --network
    #[arg(long = "rpc", env = "OHIO_WS_URL")]
    pub rpc: Option<String>,

    /// Known network whose public endpoint is used
    #[arg(long, short = 'n')]
    pub network: Option<Network>,

    /// Hardfork to execute under on chains without a known schedule
    #[arg(long, value_enum, default_value_t)]
    pub hardfork: Hardfork,

    /// Chain id to assume instead of asking the node
    #[arg(long = "chain-id")]
    pub chain_id: Option<u64>,

    /// Additional senders whose transactions are skipped in the block prefix
    #[arg(long = "skip-sender", value_name = "ADDRESS")]
    pub skip_senders: Vec<Address>,
}

impl ConnectArgs {
    /// Websocket URL to connect to.
    pub fn ws_url(&self) -> Result<String> {
        match (&self.rpc, self.network) {
            (Some(url), _) => Ok(url.clone()),
            (None, Some(network)) => Ok(network.default_ws_url().to_string()),
            (None, None) => Err(OhioError::InvalidInput(
                "either --rpc, --network or OHIO_WS_URL is required".to_string(),
            )),
        }
    }

    /// Builds the simulator configuration.
    pub fn config(&self) -> Result<SimulatorConfig> {
        let mut config =
            SimulatorConfig::new(self.ws_url()?).with_fallback_spec(self.hardfork.into());
        // A known network implies its chain id.
        if let Some(chain_id) = self.chain_id.or_else(|| self.network.map(Network::chain_id)) {
            config = config.with_chain_id(chain_id);
        }
        config.skip_senders.extend(self.skip_senders.iter().copied());
        Ok(config)
    }
}
