use alloy_primitives::hex::FromHexError;
use ohio_sim::SimulationError;

/// Error types for the ohio commands
#[derive(Debug, thiserror::Error)]
pub enum OhioError {
    /// Simulator error
    #[error("{0}")]
    Simulation(#[from] SimulationError),

    /// The replay produced a `FAILED` response
    #[error("Replay failed: {0}")]
    ReplayFailed(String),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to create the log file or install the subscriber
    #[error("Failed to set up logging: {0}")]
    Logging(String),
}

/// Result type for the ohio commands
pub type Result<T> = std::result::Result<T, OhioError>;
