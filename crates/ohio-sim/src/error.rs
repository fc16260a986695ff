use alloy_primitives::TxHash;
use alloy_transport::TransportError;

/// Errors raised while replaying a transaction.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The websocket URL could not be used
    #[error("Invalid websocket URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Connecting to the node failed
    #[error("Failed to connect to {url}: {source}")]
    Connection {
        /// The URL we tried to connect to
        url: String,
        /// The transport failure
        #[source]
        source: TransportError,
    },

    /// A request to the node failed
    #[error("RPC transport error: {0}")]
    Rpc(#[from] TransportError),

    /// The hash string is not a 32-byte hex value
    #[error("Invalid transaction hash '{0}'")]
    InvalidTransactionHash(String),

    /// The node does not know the transaction
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TxHash),

    /// The transaction has not been included in a block yet
    #[error("Transaction {0} is pending and has no block to replay against")]
    TransactionPending(TxHash),

    /// The node does not know the block
    #[error("Block not found: {0}")]
    BlockNotFound(u64),

    /// Transactions in the genesis block have no parent state to fork from
    #[error("Transaction {0} is in the genesis block and cannot be replayed")]
    GenesisTransaction(TxHash),

    /// The transaction envelope is not an Ethereum one
    #[error("Transaction {hash} has unsupported type 0x{ty:02x}")]
    UnsupportedTransactionType {
        /// The transaction hash
        hash: TxHash,
        /// The EIP-2718 type byte
        ty: u8,
    },

    /// A transaction before the target could not be executed
    #[error("Failed to execute preceding transaction {hash}: {reason}")]
    PrecedingTransaction {
        /// The failing transaction
        hash: TxHash,
        /// The EVM error
        reason: String,
    },

    /// The target transaction could not be executed
    #[error("Failed to execute transaction {hash}: {reason}")]
    Execution {
        /// The failing transaction
        hash: TxHash,
        /// The EVM error
        reason: String,
    },

    /// An ad-hoc call could not be executed
    #[error("Failed to execute call: {0}")]
    Call(String),

    /// The forked database needs a multi-threaded tokio runtime
    #[error("Forked state needs a multi-threaded tokio runtime")]
    ForkUnavailable,

    /// The blocking execution task did not finish
    #[error("Execution task failed: {0}")]
    TaskFailed(String),

    /// The simulator was used before `async_init`
    #[error("Simulator is not initialized, call async_init first")]
    NotInitialized,
}

/// Result type for the simulator.
pub type Result<T> = std::result::Result<T, SimulationError>;
