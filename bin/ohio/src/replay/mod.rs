//! Replay a mined transaction

mod cmd;
pub use cmd::*;
