use alloy_primitives::{Address, U256};
use clap::Parser;
use ohio_sim::{CallRequest, EvmSimulator, ReplayOutcome};

use crate::common::{decode_hex, ConnectArgs, Result};

/// Execute a call against the state of a block
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Callee
    #[arg(long)]
    pub to: Address,

    /// Caller
    #[arg(long)]
    pub from: Option<Address>,

    /// Calldata as hex
    #[arg(long, default_value = "")]
    pub input: String,

    /// Value to send, in wei
    #[arg(long, default_value = "0")]
    pub value: U256,

    /// Gas limit
    #[arg(long)]
    pub gas: Option<u64>,

    /// Block whose post-state is used, latest by default
    #[arg(long)]
    pub block: Option<u64>,

    /// Node connection
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cmd {
    /// Builds the call request from the arguments.
    pub fn request(&self) -> Result<CallRequest> {
        let mut request =
            CallRequest::new(self.to, decode_hex(&self.input)?).with_value(self.value);
        if let Some(from) = self.from {
            request = request.with_from(from);
        }
        if let Some(gas) = self.gas {
            request = request.with_gas_limit(gas);
        }
        Ok(request)
    }

    /// Execute the call command
    pub async fn run(&self) -> Result<()> {
        let request = self.request()?;
        let simulator = EvmSimulator::connect(self.connect.config()?).await?;
        let outcome = simulator.call(request, self.block).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            return Ok(());
        }

        println!("gas used: {}", outcome.gas_used());
        match &outcome {
            ReplayOutcome::Success { output, .. } => println!("output:   {output}"),
            ReplayOutcome::Revert { message, .. } => println!("reverted: {message}"),
            ReplayOutcome::Halt { reason, .. } => println!("halted:   {reason}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohio_sim::constants::SIMULATION_CALLER;

    #[test]
    fn test_request_from_args() {
        let cmd = Cmd::try_parse_from([
            "call",
            "--to",
            "0x00000000000000000000000000000000c0ffee00",
            "--input",
            "0x70a08231",
            "--gas",
            "100000",
            "--network",
            "ethereum",
        ])
        .unwrap();
        let request = cmd.request().unwrap();
        assert_eq!(request.from, SIMULATION_CALLER);
        assert_eq!(&request.data[..], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(request.gas_limit, Some(100_000));
        assert_eq!(request.value, U256::ZERO);
    }
}
