//! Replays of in-memory blocks through [`ReplayExecutor`].

use alloy_primitives::{address, Address, Bytes, TxHash, U256};
use alloy_sol_types::{Panic, PanicKind, Revert, SolError};
use ohio_sim::{
    constants::ARBITRUM_SENDER,
    test_utils::{
        legacy_tx, replay_tx, test_block, test_cfg, BytecodeBuilder, MemoryDatabase,
        TEST_BLOCK_GAS_LIMIT,
    },
    CallRequest, ReplayExecutor, ReplayOutcome, ReplayTransactionResponse, ReplayTx, ReplayTxKind,
    SimulationError,
};
use revm::bytecode::opcode::INVALID;
use rstest::rstest;

const ALICE: Address = address!("00000000000000000000000000000000000a11ce");
const BOB: Address = address!("0000000000000000000000000000000000000b0b");
const CONTRACT: Address = address!("00000000000000000000000000000000c0ffee00");

fn executor(db: MemoryDatabase) -> ReplayExecutor<MemoryDatabase> {
    ReplayExecutor::new(db, test_cfg(), test_block(100))
}

fn call_contract(seed: u8, nonce: u64) -> ReplayTx {
    replay_tx(seed, legacy_tx(ALICE, nonce, Some(CONTRACT), Bytes::new(), U256::ZERO))
}

fn counter_db() -> MemoryDatabase {
    let counter = BytecodeBuilder::default().sincrement(0, 1).stop().build();
    MemoryDatabase::default().account_code(CONTRACT, counter)
}

#[test]
fn test_plain_transfer_uses_intrinsic_gas() {
    let db = MemoryDatabase::default().account_balance(ALICE, U256::from(1_000_000));
    let target = replay_tx(1, legacy_tx(ALICE, 0, Some(BOB), Bytes::new(), U256::from(100)));

    let mut executor = executor(db);
    let outcome = executor.replay_in_block(&[], &target).unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.gas_used(), 21_000);
    assert_eq!(executor.db().balance_of(BOB), U256::from(100));
    assert_eq!(executor.db().nonce_of(ALICE), 1);
}

#[rstest]
#[case::error_string(Revert { reason: "nope".into() }.abi_encode(), "nope")]
#[case::custom_error(vec![0xde, 0xad, 0xbe, 0xef], "0xdeadbeef")]
#[case::empty(vec![], "")]
fn test_revert_message_is_decoded(#[case] revert_data: Vec<u8>, #[case] expected: &str) {
    let code = BytecodeBuilder::default().revert_with_data(&revert_data).build();
    let db = MemoryDatabase::default().account_code(CONTRACT, code);

    let outcome = executor(db).replay_in_block(&[], &call_contract(1, 0)).unwrap();

    assert!(matches!(outcome, ReplayOutcome::Revert { .. }), "{outcome:?}");
    assert_eq!(outcome.revert_message(), expected);
    assert!(outcome.gas_used() > 21_000);

    let response = ReplayTransactionResponse::from(outcome);
    assert_eq!(response.status, "OK");
    assert_eq!(response.transaction_revert_message, expected);
}

#[test]
fn test_panic_is_decoded() {
    let code = BytecodeBuilder::default()
        .revert_with_data(Panic::from(PanicKind::UnderOverflow).abi_encode())
        .build();
    let db = MemoryDatabase::default().account_code(CONTRACT, code);

    let outcome = executor(db).replay_in_block(&[], &call_contract(1, 0)).unwrap();

    assert!(outcome.revert_message().starts_with("Panic: "), "{outcome:?}");
}

#[test]
fn test_halt_is_reported_with_reason() {
    let code = BytecodeBuilder::default().append(INVALID).build();
    let db = MemoryDatabase::default().account_code(CONTRACT, code);

    let outcome = executor(db).replay_in_block(&[], &call_contract(1, 0)).unwrap();

    assert!(matches!(outcome, ReplayOutcome::Halt { .. }), "{outcome:?}");
    assert!(!outcome.revert_message().is_empty());
    // A halt consumes the whole gas limit.
    assert_eq!(outcome.gas_used(), 1_000_000);
}

#[test]
fn test_preceding_transactions_shape_the_target_state() {
    let block_txs = [call_contract(1, 0), call_contract(2, 1), call_contract(3, 2)];
    let target = block_txs[1].clone();

    let mut executor = executor(counter_db());
    let outcome = executor.replay_in_block(&block_txs, &target).unwrap();

    assert!(outcome.is_success());
    // The first transaction and the target ran, the one after the target did not.
    assert_eq!(executor.db().storage_of(CONTRACT, U256::ZERO), U256::from(2));
    assert_eq!(executor.db().nonce_of(ALICE), 2);
}

#[test]
fn test_target_missing_from_block_runs_after_whole_block() {
    let block_txs = [call_contract(1, 0), call_contract(2, 1)];
    let target = call_contract(9, 2);

    let mut executor = executor(counter_db());
    executor.replay_in_block(&block_txs, &target).unwrap();

    assert_eq!(executor.db().storage_of(CONTRACT, U256::ZERO), U256::from(3));
}

#[test]
fn test_system_transactions_are_skipped() {
    let deposit = ReplayTx {
        hash: TxHash::repeat_byte(0x7e),
        sender: Address::repeat_byte(0xde),
        kind: ReplayTxKind::System(0x7e),
    };
    let block_txs = [deposit, call_contract(1, 0)];

    let mut executor = executor(counter_db());
    let executed = executor.apply_preceding(&block_txs).unwrap();

    assert_eq!(executed, 1);
    assert_eq!(executor.db().storage_of(CONTRACT, U256::ZERO), U256::from(1));
}

#[test]
fn test_skip_senders_are_not_executed() {
    // Nonce 7 would fail validation if the transaction were executed.
    let bookkeeping =
        replay_tx(1, legacy_tx(ARBITRUM_SENDER, 7, Some(CONTRACT), Bytes::new(), U256::ZERO));
    let target = call_contract(2, 0);

    let mut executor = executor(counter_db()).with_skip_senders([ARBITRUM_SENDER]);
    let outcome = executor.replay_in_block(&[bookkeeping, target.clone()], &target).unwrap();

    assert!(outcome.is_success());
    assert_eq!(executor.db().storage_of(CONTRACT, U256::ZERO), U256::from(1));
}

#[test]
fn test_invalid_preceding_transaction_aborts_replay() {
    let bad = call_contract(1, 5);
    let target = call_contract(2, 0);

    let err = executor(counter_db()).replay_in_block(&[bad, target.clone()], &target).unwrap_err();

    match err {
        SimulationError::PrecedingTransaction { hash, .. } => {
            assert_eq!(hash, TxHash::repeat_byte(1))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_target_is_an_execution_error() {
    let err = executor(counter_db()).replay_in_block(&[], &call_contract(1, 3)).unwrap_err();
    assert!(matches!(err, SimulationError::Execution { .. }), "{err}");
}

#[test]
fn test_system_target_is_unsupported() {
    let target = ReplayTx {
        hash: TxHash::repeat_byte(0x7e),
        sender: Address::ZERO,
        kind: ReplayTxKind::System(0x7e),
    };
    let err = executor(counter_db()).execute_target(&target).unwrap_err();
    assert!(matches!(err, SimulationError::UnsupportedTransactionType { ty: 0x7e, .. }));
}

#[test]
fn test_contract_creation_reports_address() {
    let runtime = BytecodeBuilder::default().stop().build();
    let init_code = BytecodeBuilder::default().return_with_data(&runtime).build();
    let target = replay_tx(1, legacy_tx(ALICE, 0, None, init_code, U256::ZERO));

    let outcome = executor(MemoryDatabase::default()).replay_in_block(&[], &target).unwrap();

    match outcome {
        ReplayOutcome::Success { created, output, .. } => {
            assert_eq!(created, Some(ALICE.create(0)));
            assert_eq!(output, runtime);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_call_ignores_nonce_and_fees() {
    let code =
        BytecodeBuilder::default().return_with_data(U256::from(42).to_be_bytes::<32>()).build();
    let db = MemoryDatabase::default().account_code(CONTRACT, code);

    let request = CallRequest::new(CONTRACT, Bytes::new()).with_from(BOB).with_gas_limit(u64::MAX);
    let outcome = executor(db).call(&request).unwrap();

    match outcome {
        ReplayOutcome::Success { output, .. } => {
            assert_eq!(U256::from_be_slice(&output), U256::from(42))
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_call_gas_limit_is_capped_by_block() {
    let code = BytecodeBuilder::default().append(INVALID).build();
    let db = MemoryDatabase::default().account_code(CONTRACT, code);

    let request = CallRequest::new(CONTRACT, Bytes::new()).with_gas_limit(u64::MAX);
    let outcome = executor(db).call(&request).unwrap();

    assert_eq!(outcome.gas_used(), TEST_BLOCK_GAS_LIMIT);
}
