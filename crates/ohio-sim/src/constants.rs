//! Constants shared by the simulator.

use alloy_primitives::{address, Address};

/// Sender of the L1 bookkeeping transaction Arbitrum injects at the start of every block. It
/// carries zero gas price and zero gas limit, so executing it locally always fails.
pub const ARBITRUM_SENDER: Address = address!("0x00000000000000000000000000000000000a4b05");

/// Default caller for ad-hoc calls against a fork.
pub const SIMULATION_CALLER: Address = address!("0x9a6dcf5e566fa65c67a5f82aa98d03207e065726");

/// Gas limit used by ad-hoc calls when none is given. Capped by the block gas limit.
pub const DEFAULT_CALL_GAS_LIMIT: u64 = 30_000_000;

/// Status reported by a replay that produced an execution outcome.
pub const STATUS_OK: &str = "OK";

/// Status reported by a replay that could not produce an execution outcome.
pub const STATUS_FAILED: &str = "FAILED";

/// Ethereum mainnet activation timestamps, newest first.
pub mod mainnet {
    /// Prague activation timestamp.
    pub const PRAGUE_TIMESTAMP: u64 = 1_746_612_311;
    /// Cancun activation timestamp.
    pub const CANCUN_TIMESTAMP: u64 = 1_710_338_135;
    /// Shanghai activation timestamp.
    pub const SHANGHAI_TIMESTAMP: u64 = 1_681_338_455;
    /// First post-merge block.
    pub const MERGE_BLOCK: u64 = 15_537_394;
    /// London activation block.
    pub const LONDON_BLOCK: u64 = 12_965_000;
    /// Berlin activation block.
    pub const BERLIN_BLOCK: u64 = 12_244_000;
}
