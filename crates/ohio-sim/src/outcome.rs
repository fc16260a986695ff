//! Execution outcomes and revert decoding.

use alloy_primitives::{hex, Address, Bytes, U256};
use alloy_sol_types::{Panic, Revert, SolError};
use revm::context::result::{ExecutionResult, HaltReason, Output};
use serde::{Deserialize, Serialize};

use crate::constants::SIMULATION_CALLER;

/// Outcome of executing a transaction that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReplayOutcome {
    /// The transaction succeeded
    Success {
        /// Gas used after refunds
        gas_used: u64,
        /// Gas refunded
        gas_refunded: u64,
        /// Return data, or the deployed code for a creation
        output: Bytes,
        /// Address of the created contract, if any
        created: Option<Address>,
    },
    /// The transaction reverted
    Revert {
        /// Gas used
        gas_used: u64,
        /// Decoded revert reason
        message: String,
    },
    /// The transaction halted (out of gas, invalid opcode, ...)
    Halt {
        /// Gas used
        gas_used: u64,
        /// Halt reason
        reason: String,
    },
}

impl ReplayOutcome {
    /// Gas used by the transaction.
    pub const fn gas_used(&self) -> u64 {
        match self {
            Self::Success { gas_used, .. } |
            Self::Revert { gas_used, .. } |
            Self::Halt { gas_used, .. } => *gas_used,
        }
    }

    /// Whether the transaction succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The revert or halt message, empty on success.
    pub fn revert_message(&self) -> &str {
        match self {
            Self::Success { .. } => "",
            Self::Revert { message, .. } => message,
            Self::Halt { reason, .. } => reason,
        }
    }
}

impl From<ExecutionResult<HaltReason>> for ReplayOutcome {
    fn from(result: ExecutionResult<HaltReason>) -> Self {
        match result {
            ExecutionResult::Success { gas_used, gas_refunded, output, .. } => match output {
                Output::Call(output) => {
                    Self::Success { gas_used, gas_refunded, output, created: None }
                }
                Output::Create(output, created) => {
                    Self::Success { gas_used, gas_refunded, output, created }
                }
            },
            ExecutionResult::Revert { gas_used, output } => {
                Self::Revert { gas_used, message: decode_revert_reason(&output) }
            }
            ExecutionResult::Halt { reason, gas_used } => {
                Self::Halt { gas_used, reason: format!("{reason:?}") }
            }
        }
    }
}

/// Decodes revert data using alloy's built-in decoders.
///
/// Supports:
/// - `Error(string)`, returned as the bare reason
/// - `Panic(uint256)`, returned as `Panic: <kind>`
/// - anything else, returned as raw hex (custom errors)
///
/// Empty revert data yields an empty string.
pub fn decode_revert_reason(output: &Bytes) -> String {
    if output.is_empty() {
        return String::new();
    }

    if let Ok(revert) = Revert::abi_decode(output) {
        return revert.reason;
    }

    if let Ok(panic) = Panic::abi_decode(output) {
        return if let Some(kind) = panic.kind() {
            format!("Panic: {kind}")
        } else {
            format!("Panic(0x{:x})", panic.code)
        };
    }

    format!("0x{}", hex::encode(output))
}

/// An ad-hoc call to execute against a fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Caller
    pub from: Address,
    /// Callee
    pub to: Address,
    /// Calldata
    pub data: Bytes,
    /// Value sent along
    pub value: U256,
    /// Gas limit, defaults to [`crate::constants::DEFAULT_CALL_GAS_LIMIT`]
    pub gas_limit: Option<u64>,
}

impl CallRequest {
    /// Creates a call to `to` from [`SIMULATION_CALLER`].
    pub fn new(to: Address, data: Bytes) -> Self {
        Self { from: SIMULATION_CALLER, to, data, value: U256::ZERO, gas_limit: None }
    }

    /// Sets the caller.
    pub const fn with_from(mut self, from: Address) -> Self {
        self.from = from;
        self
    }

    /// Sets the value.
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Sets the gas limit.
    pub const fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::PanicKind;
    use revm::context::result::{OutOfGasError, SuccessReason};

    #[test]
    fn test_decode_error_string() {
        let data = Revert { reason: "ERC20: transfer amount exceeds balance".into() }.abi_encode();
        assert_eq!(decode_revert_reason(&data.into()), "ERC20: transfer amount exceeds balance");
    }

    #[test]
    fn test_decode_panic() {
        let data = Panic::from(PanicKind::DivisionByZero).abi_encode();
        let message = decode_revert_reason(&data.into());
        assert!(message.starts_with("Panic: "), "{message}");
    }

    #[test]
    fn test_decode_unknown_panic_code() {
        let data = Panic { code: U256::from(0x99) }.abi_encode();
        assert_eq!(decode_revert_reason(&data.into()), "Panic(0x99)");
    }

    #[test]
    fn test_decode_custom_error_as_hex() {
        let data = Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_revert_reason(&data), "0xdeadbeef");
    }

    #[test]
    fn test_decode_empty_output() {
        assert_eq!(decode_revert_reason(&Bytes::new()), "");
    }

    #[test]
    fn test_outcome_from_execution_result() {
        let success = ExecutionResult::Success {
            reason: SuccessReason::Stop,
            gas_used: 21_000,
            gas_refunded: 0,
            logs: vec![],
            output: Output::Call(Bytes::new()),
        };
        let outcome = ReplayOutcome::from(success);
        assert!(outcome.is_success());
        assert_eq!(outcome.gas_used(), 21_000);
        assert_eq!(outcome.revert_message(), "");

        let halt: ExecutionResult<HaltReason> = ExecutionResult::Halt {
            reason: HaltReason::OutOfGas(OutOfGasError::Basic),
            gas_used: 50_000,
        };
        let outcome = ReplayOutcome::from(halt);
        assert_eq!(outcome.gas_used(), 50_000);
        assert!(outcome.revert_message().contains("OutOfGas"));
    }
}
