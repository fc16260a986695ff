use std::{sync::Arc, time::Duration};

use alloy_eips::BlockNumberOrTag;
use alloy_network::{AnyNetwork, AnyRpcBlock, TransactionResponse};
use alloy_primitives::{Address, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder, WsConnect};
use futures::StreamExt;
use revm::{context::CfgEnv, primitives::hardfork::SpecId};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, trace, warn};

use crate::{
    fork_at, spec_for_block, system_senders, BlockContext, BlockInfo, CallRequest, ReplayExecutor,
    ReplayOutcome, ReplayTx, Result, SimulationError,
};

/// Delay before resubscribing after the block subscription could not be created.
const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(1);

/// Everything needed to replay a transaction, gathered from the node.
#[derive(Debug, Clone)]
pub struct ReplayPlan {
    /// The transaction to replay
    pub target: ReplayTx,
    /// Transactions before the target in its block
    pub preceding: Vec<ReplayTx>,
    /// Block whose post-state is forked, the parent of the target's block
    pub fork_block: u64,
    /// Spec the target's block executes under
    pub spec: SpecId,
    /// Header fields of the target's block
    pub block: BlockContext,
}

/// Configuration of an [`EvmSimulator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Websocket endpoint of the node
    pub ws_url: String,
    /// Spec used for chains without a known activation schedule
    pub fallback_spec: SpecId,
    /// Extra senders to skip when replaying the start of a block
    pub skip_senders: Vec<Address>,
    /// Chain id; asked from the node when `None`
    pub chain_id: Option<u64>,
}

impl SimulatorConfig {
    /// Creates a configuration for the given websocket endpoint.
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            fallback_spec: SpecId::PRAGUE,
            skip_senders: Vec::new(),
            chain_id: None,
        }
    }

    /// Sets the spec used for chains without a known activation schedule.
    pub const fn with_fallback_spec(mut self, spec: SpecId) -> Self {
        self.fallback_spec = spec;
        self
    }

    /// Adds a sender to skip when replaying the start of a block.
    pub fn with_skip_sender(mut self, sender: Address) -> Self {
        self.skip_senders.push(sender);
        self
    }

    /// Pins the chain id instead of asking the node.
    pub const fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Checks that the URL is a websocket URL.
    pub fn validate(&self) -> Result<()> {
        let url = self.ws_url.trim();
        let rest = url
            .strip_prefix("wss://")
            .or_else(|| url.strip_prefix("ws://"))
            .ok_or_else(|| SimulationError::InvalidUrl {
                url: self.ws_url.clone(),
                reason: "expected a ws:// or wss:// URL".to_string(),
            })?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(SimulationError::InvalidUrl {
                url: self.ws_url.clone(),
                reason: "missing host".to_string(),
            });
        }
        Ok(())
    }
}

/// Replays transactions against forks of a remote node.
#[derive(Debug, Clone)]
pub struct EvmSimulator {
    provider: DynProvider<AnyNetwork>,
    config: SimulatorConfig,
    chain_id: u64,
    latest_block: Arc<watch::Sender<BlockInfo>>,
}

impl EvmSimulator {
    /// Connects to the node over websockets.
    pub async fn connect(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        info!(url = %config.ws_url, "Connecting to node");
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<AnyNetwork>()
            .connect_ws(WsConnect::new(config.ws_url.trim()))
            .await
            .map_err(|source| SimulationError::Connection { url: config.ws_url.clone(), source })?;
        Self::from_provider(DynProvider::new(provider), config).await
    }

    /// Creates a simulator on top of an existing provider.
    pub async fn from_provider(
        provider: DynProvider<AnyNetwork>,
        config: SimulatorConfig,
    ) -> Result<Self> {
        let chain_id = match config.chain_id {
            Some(chain_id) => chain_id,
            None => provider.get_chain_id().await?,
        };
        info!(chain_id, "Simulator ready");
        let (latest_block, _) = watch::channel(BlockInfo::default());
        Ok(Self { provider, config, chain_id, latest_block: Arc::new(latest_block) })
    }

    /// Chain id of the node.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The configuration the simulator was created with.
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// The underlying provider.
    pub const fn provider(&self) -> &DynProvider<AnyNetwork> {
        &self.provider
    }

    fn skip_senders(&self) -> Vec<Address> {
        let mut senders = system_senders(self.chain_id);
        senders.extend(self.config.skip_senders.iter().copied());
        senders
    }

    fn cfg_env(&self, spec: SpecId) -> CfgEnv {
        let mut cfg = CfgEnv::new_with_spec(spec);
        cfg.chain_id = self.chain_id;
        cfg
    }

    fn spec_for(&self, context: &BlockContext) -> SpecId {
        spec_for_block(self.chain_id, context.number, context.timestamp, self.config.fallback_spec)
    }

    /// Replays a mined transaction.
    ///
    /// The state of the parent block is forked, the transactions preceding the target in its
    /// block are re-applied and the target is executed last.
    pub async fn replay_transaction(&self, tx_hash: TxHash) -> Result<ReplayOutcome> {
        let plan = self.plan_replay(tx_hash).await?;
        self.execute_plan(plan).await
    }

    /// Fetches the target, its block and the transactions preceding it.
    pub async fn plan_replay(&self, tx_hash: TxHash) -> Result<ReplayPlan> {
        let tx = self
            .provider
            .get_transaction_by_hash(tx_hash)
            .await?
            .ok_or(SimulationError::TransactionNotFound(tx_hash))?;
        let block_number = tx.block_number().ok_or(SimulationError::TransactionPending(tx_hash))?;
        if block_number == 0 {
            return Err(SimulationError::GenesisTransaction(tx_hash));
        }
        debug!(%tx_hash, block_number, "Transaction found");

        let block = self
            .provider
            .get_block_by_number(block_number.into())
            .full()
            .await?
            .ok_or(SimulationError::BlockNotFound(block_number))?;
        let context = BlockContext::from_header(&block.header);
        let preceding = self.preceding_transactions(&block, tx_hash).await?;

        Ok(ReplayPlan {
            target: ReplayTx::from_rpc(&tx),
            preceding,
            fork_block: block_number - 1,
            spec: self.spec_for(&context),
            block: context,
        })
    }

    /// Forks the state of the plan's parent block and replays the block prefix and the target.
    pub async fn execute_plan(&self, plan: ReplayPlan) -> Result<ReplayOutcome> {
        let ReplayPlan { target, preceding, fork_block, spec, block } = plan;
        let cfg = self.cfg_env(spec);
        let block_env = block.to_block_env(spec);
        let db = fork_at(self.provider.clone(), fork_block)?;
        let skip_senders = self.skip_senders();
        info!(
            tx_hash = %target.hash,
            block_number = block.number,
            ?spec,
            preceding = preceding.len(),
            "Replaying transaction"
        );

        let tx_hash = target.hash;
        let outcome = tokio::task::spawn_blocking(move || {
            ReplayExecutor::new(db, cfg, block_env)
                .with_skip_senders(skip_senders)
                .replay_in_block(&preceding, &target)
        })
        .await
        .map_err(|e| SimulationError::TaskFailed(e.to_string()))??;

        info!(
            %tx_hash,
            gas_used = outcome.gas_used(),
            success = outcome.is_success(),
            "Replay finished"
        );
        Ok(outcome)
    }

    /// Returns the transactions of `block` that precede `target`.
    async fn preceding_transactions(
        &self,
        block: &AnyRpcBlock,
        target: TxHash,
    ) -> Result<Vec<ReplayTx>> {
        if let Some(txs) = block.transactions.as_transactions() {
            return Ok(txs
                .iter()
                .take_while(|tx| tx.tx_hash() != target)
                .map(ReplayTx::from_rpc)
                .collect());
        }

        // The node returned hashes only, fetch the prefix one by one.
        let mut txs = Vec::new();
        for hash in block.transactions.hashes().take_while(|hash| *hash != target) {
            let tx = self
                .provider
                .get_transaction_by_hash(hash)
                .await?
                .ok_or(SimulationError::TransactionNotFound(hash))?;
            trace!(%hash, "Fetched preceding transaction");
            txs.push(ReplayTx::from_rpc(&tx));
        }
        Ok(txs)
    }

    /// Executes a call against the post-state of `block`, or of the latest block.
    pub async fn call(&self, request: CallRequest, block: Option<u64>) -> Result<ReplayOutcome> {
        let tag = block.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number);
        let header_block = self
            .provider
            .get_block_by_number(tag)
            .await?
            .ok_or(SimulationError::BlockNotFound(block.unwrap_or_default()))?;
        let context = BlockContext::from_header(&header_block.header);

        let spec = self.spec_for(&context);
        let cfg = self.cfg_env(spec);
        let block_env = context.to_block_env(spec);
        let db = fork_at(self.provider.clone(), context.number)?;
        debug!(to = %request.to, block_number = context.number, "Executing call");

        tokio::task::spawn_blocking(move || ReplayExecutor::new(db, cfg, block_env).call(&request))
            .await
            .map_err(|e| SimulationError::TaskFailed(e.to_string()))?
    }

    /// Latest chain head seen by the block sync task.
    pub fn latest_block(&self) -> BlockInfo {
        *self.latest_block.borrow()
    }

    /// Subscribes to chain head updates published by the block sync task.
    pub fn subscribe_latest_block(&self) -> watch::Receiver<BlockInfo> {
        self.latest_block.subscribe()
    }

    /// Spawns a task that follows new heads and publishes them as [`BlockInfo`].
    ///
    /// The task resubscribes whenever the subscription ends and runs until the returned handle
    /// is aborted.
    pub fn spawn_block_sync(&self) -> JoinHandle<()> {
        let provider = self.provider.clone();
        let latest_block = Arc::clone(&self.latest_block);
        tokio::spawn(async move {
            loop {
                let subscription = match provider.subscribe_blocks().await {
                    Ok(subscription) => subscription,
                    Err(err) => {
                        warn!(%err, "Failed to subscribe to new blocks");
                        tokio::time::sleep(RESUBSCRIBE_DELAY).await;
                        continue;
                    }
                };

                let mut stream = subscription.into_stream();
                while let Some(header) = stream.next().await {
                    let info = BlockInfo::from_header(&header);
                    trace!(number = info.number, timestamp = info.timestamp, "New block");
                    latest_block.send_replace(info);
                }
                debug!("Block subscription ended, resubscribing");
            }
        })
    }
}
