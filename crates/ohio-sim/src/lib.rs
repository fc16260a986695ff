//! Replay historical EVM transactions against a fork of a remote node.
//!
//! [`EvmSimulator`] talks to a node over websockets, forks the state of the parent block,
//! re-applies the transactions that precede the target in its block and finally executes the
//! target itself. [`OhioWrapper`] is the session handle built on top of it: it is constructed
//! from a URL, initialised once and then answers replay requests with a flat
//! [`ReplayTransactionResponse`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use alloy_primitives;
pub use revm;

pub mod constants;

mod block;
pub use block::*;

mod error;
pub use error::*;

mod executor;
pub use executor::*;

mod fork;
pub use fork::*;

mod network;
pub use network::*;

mod outcome;
pub use outcome::*;

mod simulator;
pub use simulator::*;

mod tx;
pub use tx::*;

mod wrapper;
pub use wrapper::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
