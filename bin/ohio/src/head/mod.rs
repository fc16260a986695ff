//! Follow new blocks

mod cmd;
pub use cmd::*;
