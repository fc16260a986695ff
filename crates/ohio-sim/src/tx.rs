use core::str::FromStr;

use alloy_eips::Typed2718;
use alloy_evm::FromRecoveredTx;
use alloy_network::{AnyRpcTransaction, AnyTxEnvelope, TransactionResponse};
use alloy_primitives::{Address, TxHash};
use revm::context::TxEnv;

use crate::{Result, SimulationError};

/// Parses a transaction hash, with or without the `0x` prefix.
pub fn parse_tx_hash(s: &str) -> Result<TxHash> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 64 {
        return Err(SimulationError::InvalidTransactionHash(s.to_string()));
    }
    TxHash::from_str(digits).map_err(|_| SimulationError::InvalidTransactionHash(s.to_string()))
}

/// How a transaction takes part in a replay.
#[derive(Debug, Clone)]
pub enum ReplayTxKind {
    /// An Ethereum envelope, ready for the EVM
    Executable(Box<TxEnv>),
    /// A chain-specific envelope with the given type byte, e.g. an OP-stack deposit
    System(u8),
}

/// A transaction of the replayed block.
#[derive(Debug, Clone)]
pub struct ReplayTx {
    /// Transaction hash
    pub hash: TxHash,
    /// Recovered sender
    pub sender: Address,
    /// Execution payload
    pub kind: ReplayTxKind,
}

impl ReplayTx {
    /// Creates an executable transaction.
    pub fn executable(hash: TxHash, tx: TxEnv) -> Self {
        Self { hash, sender: tx.caller, kind: ReplayTxKind::Executable(Box::new(tx)) }
    }

    /// Converts an RPC transaction.
    pub fn from_rpc(tx: &AnyRpcTransaction) -> Self {
        let hash = tx.tx_hash();
        let sender = tx.from();
        let kind = match tx.inner.inner.inner() {
            AnyTxEnvelope::Ethereum(envelope) => {
                ReplayTxKind::Executable(Box::new(TxEnv::from_recovered_tx(envelope, sender)))
            }
            other => ReplayTxKind::System(other.ty()),
        };
        Self { hash, sender, kind }
    }

    /// Whether the transaction can be executed by the EVM.
    pub const fn is_executable(&self) -> bool {
        matches!(self.kind, ReplayTxKind::Executable(_))
    }
}
