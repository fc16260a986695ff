//! Execute a call against a fork

mod cmd;
pub use cmd::*;
