//! Helpers for executing replays against in-memory state.

mod bytecode;
mod database;
mod env;

pub use bytecode::*;
pub use database::*;
pub use env::*;
