//! Lazily populated views of remote chain state.

use alloy_eips::BlockId;
use alloy_network::AnyNetwork;
use alloy_provider::{DynProvider, Provider};
use revm::database::{AlloyDB, CacheDB, WrapDatabaseAsync};
use tracing::debug;

use crate::{Result, SimulationError};

/// Remote state read through the provider, blocking on the tokio runtime for each lookup.
pub type RemoteDb<P = DynProvider<AnyNetwork>> = WrapDatabaseAsync<AlloyDB<AnyNetwork, P>>;

/// A fork: remote state with a local overlay that receives every committed change.
pub type ForkDb<P = DynProvider<AnyNetwork>> = CacheDB<RemoteDb<P>>;

/// Forks the post-state of `block_number` on the current tokio runtime.
///
/// Accounts, code and storage are fetched on first access only. Lookups block on the runtime,
/// so a multi-threaded runtime is required; anywhere else this fails with
/// [`SimulationError::ForkUnavailable`].
pub fn fork_at<P>(provider: P, block_number: u64) -> Result<ForkDb<P>>
where
    P: Provider<AnyNetwork>,
{
    let alloy_db = AlloyDB::new(provider, BlockId::number(block_number));
    let remote = WrapDatabaseAsync::new(alloy_db).ok_or(SimulationError::ForkUnavailable)?;
    debug!(block_number, "Forked remote state");
    Ok(CacheDB::new(remote))
}
