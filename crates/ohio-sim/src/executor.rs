use core::fmt::Display;

use alloy_primitives::{Address, TxKind};
use revm::{
    context::{result::ExecutionResult, BlockEnv, CfgEnv, Context, TxEnv},
    Database, DatabaseCommit, ExecuteCommitEvm, MainBuilder, MainContext,
};
use tracing::{debug, trace, warn};

use crate::{
    constants::DEFAULT_CALL_GAS_LIMIT, CallRequest, ReplayOutcome, ReplayTx, ReplayTxKind, Result,
    SimulationError,
};

/// Executes the transactions of one block on top of a database.
///
/// Every executed transaction is committed, so later transactions observe the state left by
/// earlier ones, exactly as they did on chain.
#[derive(Debug)]
pub struct ReplayExecutor<DB> {
    db: DB,
    cfg: CfgEnv,
    block: BlockEnv,
    skip_senders: Vec<Address>,
}

impl<DB> ReplayExecutor<DB>
where
    DB: Database + DatabaseCommit,
    DB::Error: Display,
{
    /// Creates an executor for the block described by `block`.
    pub const fn new(db: DB, cfg: CfgEnv, block: BlockEnv) -> Self {
        Self { db, cfg, block, skip_senders: Vec::new() }
    }

    /// Transactions from these senders are not executed when replaying the start of a block.
    pub fn with_skip_senders(mut self, senders: impl IntoIterator<Item = Address>) -> Self {
        self.skip_senders.extend(senders);
        self
    }

    /// Returns the underlying database.
    pub const fn db(&self) -> &DB {
        &self.db
    }

    /// Executes `tx` and commits its state changes.
    fn transact_commit(
        &mut self,
        cfg: CfgEnv,
        block: BlockEnv,
        tx: TxEnv,
    ) -> core::result::Result<ExecutionResult, String> {
        let mut evm = Context::mainnet()
            .with_db(&mut self.db)
            .with_block(block)
            .with_cfg(cfg)
            .build_mainnet();
        evm.transact_commit(tx).map_err(|e| e.to_string())
    }

    /// Executes and commits the given transactions in order.
    ///
    /// System transactions and transactions from skipped senders are not executed. Returns the
    /// number of executed transactions.
    pub fn apply_preceding<'a>(
        &mut self,
        txs: impl IntoIterator<Item = &'a ReplayTx>,
    ) -> Result<usize> {
        let mut executed = 0;
        for tx in txs {
            let tx_env = match &tx.kind {
                ReplayTxKind::System(ty) => {
                    debug!(hash = %tx.hash, ty, "Skipping system transaction");
                    continue;
                }
                ReplayTxKind::Executable(_) if self.skip_senders.contains(&tx.sender) => {
                    debug!(
                        hash = %tx.hash,
                        sender = %tx.sender,
                        "Skipping transaction from system sender"
                    );
                    continue;
                }
                ReplayTxKind::Executable(tx_env) => (**tx_env).clone(),
            };

            let result = self
                .transact_commit(self.cfg.clone(), self.block.clone(), tx_env)
                .map_err(|reason| {
                    warn!(hash = %tx.hash, %reason, "Preceding transaction failed validation");
                    SimulationError::PrecedingTransaction { hash: tx.hash, reason }
                })?;
            trace!(
                hash = %tx.hash,
                gas_used = result.gas_used(),
                success = result.is_success(),
                "Applied preceding transaction"
            );
            executed += 1;
        }
        Ok(executed)
    }

    /// Executes the target transaction and commits it.
    pub fn execute_target(&mut self, tx: &ReplayTx) -> Result<ReplayOutcome> {
        let tx_env = match &tx.kind {
            ReplayTxKind::Executable(tx_env) => (**tx_env).clone(),
            ReplayTxKind::System(ty) => {
                return Err(SimulationError::UnsupportedTransactionType { hash: tx.hash, ty: *ty });
            }
        };

        let result = self
            .transact_commit(self.cfg.clone(), self.block.clone(), tx_env)
            .map_err(|reason| SimulationError::Execution { hash: tx.hash, reason })?;
        debug!(
            hash = %tx.hash,
            gas_used = result.gas_used(),
            success = result.is_success(),
            "Executed target transaction"
        );
        Ok(result.into())
    }

    /// Replays `target` after every transaction that precedes it in `block_txs`.
    ///
    /// Only transactions strictly before the target are applied. If the target is not part of
    /// `block_txs`, the whole block is applied first.
    pub fn replay_in_block(
        &mut self,
        block_txs: &[ReplayTx],
        target: &ReplayTx,
    ) -> Result<ReplayOutcome> {
        let preceding = block_txs.iter().take_while(|tx| tx.hash != target.hash);
        let executed = self.apply_preceding(preceding)?;
        debug!(hash = %target.hash, executed, "Block prefix applied");
        self.execute_target(target)
    }

    /// Executes an ad-hoc call.
    ///
    /// Nonce checks are disabled and the call pays no gas, so any caller can be used.
    pub fn call(&mut self, request: &CallRequest) -> Result<ReplayOutcome> {
        let mut cfg = self.cfg.clone();
        cfg.disable_nonce_check = true;

        let mut block = self.block.clone();
        block.basefee = 0;

        let gas_limit = request.gas_limit.unwrap_or(DEFAULT_CALL_GAS_LIMIT).min(block.gas_limit);
        let tx = TxEnv {
            caller: request.from,
            kind: TxKind::Call(request.to),
            data: request.data.clone(),
            value: request.value,
            gas_limit,
            gas_price: 0,
            chain_id: Some(cfg.chain_id),
            ..Default::default()
        };

        let result = self.transact_commit(cfg, block, tx).map_err(SimulationError::Call)?;
        debug!(to = %request.to, gas_used = result.gas_used(), "Executed call");
        Ok(result.into())
    }
}
