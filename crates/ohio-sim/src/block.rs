use alloy_consensus::BlockHeader;
use alloy_primitives::{Address, B256, U256};
use revm::{
    context::BlockEnv,
    primitives::{eip4844, hardfork::SpecId},
};
use serde::{Deserialize, Serialize};

/// Latest chain head as seen by the block sync task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: u64,
}

impl BlockInfo {
    /// Reads the head fields from a block header.
    pub fn from_header<H: BlockHeader>(header: &H) -> Self {
        Self { number: header.number(), timestamp: header.timestamp() }
    }
}

/// Header fields needed to execute transactions of a block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockContext {
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: u64,
    /// Fee recipient
    pub beneficiary: Address,
    /// Block gas limit
    pub gas_limit: u64,
    /// EIP-1559 base fee, zero before London
    pub basefee: u64,
    /// Difficulty, zero after the merge
    pub difficulty: U256,
    /// Mix hash, used as `PREVRANDAO` after the merge
    pub prevrandao: Option<B256>,
    /// EIP-4844 excess blob gas
    pub excess_blob_gas: Option<u64>,
}

impl BlockContext {
    /// Extracts the execution context from a block header.
    pub fn from_header<H: BlockHeader>(header: &H) -> Self {
        Self {
            number: header.number(),
            timestamp: header.timestamp(),
            beneficiary: header.beneficiary(),
            gas_limit: header.gas_limit(),
            basefee: header.base_fee_per_gas().unwrap_or_default(),
            difficulty: header.difficulty(),
            prevrandao: header.mix_hash(),
            excess_blob_gas: header.excess_blob_gas(),
        }
    }

    /// Creates the [`BlockEnv`] for `spec`.
    ///
    /// Blob gas pricing is always populated so Cancun validation passes on chains that do not
    /// report an excess blob gas.
    pub fn to_block_env(&self, spec: SpecId) -> BlockEnv {
        let mut block = BlockEnv::default();
        block.number = U256::from(self.number);
        block.timestamp = U256::from(self.timestamp);
        block.beneficiary = self.beneficiary;
        block.gas_limit = self.gas_limit;
        block.basefee = self.basefee;
        block.difficulty = self.difficulty;
        block.prevrandao = if spec.is_enabled_in(SpecId::MERGE) {
            Some(self.prevrandao.unwrap_or_default())
        } else {
            self.prevrandao
        };

        let update_fraction = if spec.is_enabled_in(SpecId::PRAGUE) {
            eip4844::BLOB_BASE_FEE_UPDATE_FRACTION_PRAGUE
        } else {
            eip4844::BLOB_BASE_FEE_UPDATE_FRACTION_CANCUN
        };
        block.set_blob_excess_gas_and_price(
            self.excess_blob_gas.unwrap_or_default(),
            update_fraction,
        );
        block
    }
}
