use alloy_primitives::{Address, Bytes, TxHash, TxKind, U256};
use revm::{
    context::{BlockEnv, CfgEnv, TxEnv},
    primitives::{eip4844::BLOB_BASE_FEE_UPDATE_FRACTION_PRAGUE, hardfork::SpecId},
};

use crate::ReplayTx;

/// Chain id used by test environments.
pub const TEST_CHAIN_ID: u64 = 1;

/// Block gas limit used by test environments.
pub const TEST_BLOCK_GAS_LIMIT: u64 = 30_000_000;

/// Prague configuration for [`TEST_CHAIN_ID`].
pub fn test_cfg() -> CfgEnv {
    let mut cfg = CfgEnv::new_with_spec(SpecId::PRAGUE);
    cfg.chain_id = TEST_CHAIN_ID;
    cfg
}

/// A post-merge block with a zero base fee.
pub fn test_block(number: u64) -> BlockEnv {
    let mut block = BlockEnv::default();
    block.number = U256::from(number);
    block.timestamp = U256::from(1_750_000_000 + number * 12);
    block.gas_limit = TEST_BLOCK_GAS_LIMIT;
    block.basefee = 0;
    block.prevrandao = Some(Default::default());
    block.set_blob_excess_gas_and_price(0, BLOB_BASE_FEE_UPDATE_FRACTION_PRAGUE);
    block
}

/// A legacy transaction environment with zero gas price.
pub fn legacy_tx(
    caller: Address,
    nonce: u64,
    to: Option<Address>,
    data: Bytes,
    value: U256,
) -> TxEnv {
    TxEnv {
        caller,
        nonce,
        kind: to.map_or(TxKind::Create, TxKind::Call),
        data,
        value,
        gas_limit: 1_000_000,
        gas_price: 0,
        chain_id: Some(TEST_CHAIN_ID),
        ..Default::default()
    }
}

/// An executable replay transaction whose hash is derived from `seed`.
pub fn replay_tx(seed: u8, tx: TxEnv) -> ReplayTx {
    ReplayTx::executable(TxHash::repeat_byte(seed), tx)
}
