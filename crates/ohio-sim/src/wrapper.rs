//! Session handle answering replay requests with flat responses.

use std::{fmt, sync::Arc};

use alloy_network::AnyNetwork;
use alloy_provider::DynProvider;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    constants::{STATUS_FAILED, STATUS_OK},
    parse_tx_hash, EvmSimulator, ReplayOutcome, Result, SimulationError, SimulatorConfig,
};

/// Whether a replay produced an execution result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    /// The transaction was executed, possibly reverting
    Ok,
    /// The transaction could not be replayed
    Failed,
}

impl ReplayStatus {
    /// The wire form of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => STATUS_OK,
            Self::Failed => STATUS_FAILED,
        }
    }
}

impl fmt::Display for ReplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`OhioWrapper::replay_transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayTransactionResponse {
    /// `"OK"` or `"FAILED"`
    pub status: String,
    /// Error description when the replay failed
    pub message: String,
    /// Revert or halt reason of the replayed transaction
    pub transaction_revert_message: String,
    /// Gas used by the replayed transaction
    pub gas_used: u64,
}

impl Default for ReplayTransactionResponse {
    fn default() -> Self {
        Self {
            status: ReplayStatus::Failed.to_string(),
            message: String::new(),
            transaction_revert_message: String::new(),
            gas_used: 0,
        }
    }
}

impl ReplayTransactionResponse {
    /// A `FAILED` response carrying `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Default::default() }
    }

    /// Whether the replay produced an execution result.
    pub fn is_ok(&self) -> bool {
        self.status == ReplayStatus::Ok.as_str()
    }
}

impl From<ReplayOutcome> for ReplayTransactionResponse {
    fn from(outcome: ReplayOutcome) -> Self {
        Self {
            status: ReplayStatus::Ok.to_string(),
            message: String::new(),
            transaction_revert_message: outcome.revert_message().to_string(),
            gas_used: outcome.gas_used(),
        }
    }
}

impl From<SimulationError> for ReplayTransactionResponse {
    fn from(err: SimulationError) -> Self {
        Self::failed(err.to_string())
    }
}

impl From<Result<ReplayOutcome>> for ReplayTransactionResponse {
    fn from(result: Result<ReplayOutcome>) -> Self {
        result.map_or_else(Self::from, Self::from)
    }
}

#[derive(Debug)]
struct Backend {
    config: SimulatorConfig,
    simulator: Option<EvmSimulator>,
}

/// Cloneable handle around a lazily connected [`EvmSimulator`].
///
/// Every operation takes the same lock, so an initialisation always completes before a replay
/// that was issued after it.
#[derive(Debug, Clone)]
pub struct OhioWrapper {
    backend: Arc<Mutex<Backend>>,
}

impl OhioWrapper {
    /// Creates an uninitialised handle for `ws_url`. No I/O happens until
    /// [`Self::async_init`].
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self::with_config(SimulatorConfig::new(ws_url))
    }

    /// Creates an uninitialised handle from a full configuration.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { backend: Arc::new(Mutex::new(Backend { config, simulator: None })) }
    }

    /// Connects to the node. Calling it again replaces the connection.
    ///
    /// A failed attempt leaves the previous connection in place.
    pub async fn async_init(&self) -> Result<()> {
        let mut backend = self.backend.lock().await;
        let simulator = EvmSimulator::connect(backend.config.clone()).await?;
        info!(
            url = %backend.config.ws_url,
            chain_id = simulator.chain_id(),
            "Wrapper initialised"
        );
        backend.simulator = Some(simulator);
        Ok(())
    }

    /// Initialises the handle on top of an existing provider, replacing any connection.
    pub async fn init_with_provider(&self, provider: DynProvider<AnyNetwork>) -> Result<()> {
        let mut backend = self.backend.lock().await;
        let simulator = EvmSimulator::from_provider(provider, backend.config.clone()).await?;
        info!(chain_id = simulator.chain_id(), "Wrapper initialised from provider");
        backend.simulator = Some(simulator);
        Ok(())
    }

    /// Whether [`Self::async_init`] has succeeded.
    pub async fn is_initialized(&self) -> bool {
        self.backend.lock().await.simulator.is_some()
    }

    /// The connected simulator, if any.
    pub async fn simulator(&self) -> Option<EvmSimulator> {
        self.backend.lock().await.simulator.clone()
    }

    /// Replays the transaction with the given hex hash.
    ///
    /// Never fails: errors are reported as a `FAILED` response.
    pub async fn replay_transaction(&self, tx_hash: impl AsRef<str>) -> ReplayTransactionResponse {
        let backend = self.backend.lock().await;
        let result = match parse_tx_hash(tx_hash.as_ref()) {
            Ok(hash) => match &backend.simulator {
                Some(simulator) => simulator.replay_transaction(hash).await,
                None => Err(SimulationError::NotInitialized),
            },
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(tx_hash = tx_hash.as_ref(), %err, "Replay failed");
        }
        result.into()
    }
}
