//! Known networks and per-chain replay rules.

use core::{fmt, str::FromStr};

use alloy_primitives::Address;
use revm::primitives::hardfork::SpecId;

use crate::constants::{mainnet, ARBITRUM_SENDER};

/// Networks with a known public websocket endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Ethereum mainnet
    Ethereum,
    /// Arbitrum One
    Arbitrum,
    /// BNB Smart Chain
    Bsc,
    /// Mantle mainnet
    Mantle,
    /// Mantle Sepolia testnet
    MantleSepolia,
}

impl Network {
    /// All known networks.
    pub const ALL: [Self; 5] =
        [Self::Ethereum, Self::Arbitrum, Self::Bsc, Self::Mantle, Self::MantleSepolia];

    /// Chain id of the network.
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Arbitrum => 42161,
            Self::Bsc => 56,
            Self::Mantle => 5000,
            Self::MantleSepolia => 5003,
        }
    }

    /// Public websocket endpoint of the network.
    pub const fn default_ws_url(self) -> &'static str {
        match self {
            Self::Ethereum => "wss://ethereum-rpc.publicnode.com",
            Self::Arbitrum => "wss://arbitrum-one-rpc.publicnode.com",
            Self::Bsc => "wss://bsc-rpc.publicnode.com",
            Self::Mantle => "wss://wss.mantle.xyz",
            Self::MantleSepolia => "wss://wss.sepolia.mantle.xyz",
        }
    }

    /// Looks up a network by chain id.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|network| network.chain_id() == chain_id)
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Arbitrum => "arbitrum",
            Self::Bsc => "bsc",
            Self::Mantle => "mantle",
            Self::MantleSepolia => "mantle-sepolia",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown network name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown network '{0}'")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ethereum" | "eth" | "mainnet" => Ok(Self::Ethereum),
            "arbitrum" | "arbi" | "arb" => Ok(Self::Arbitrum),
            "bsc" | "bnb" => Ok(Self::Bsc),
            "mantle" => Ok(Self::Mantle),
            "mantle-sepolia" | "mantle_sepolia" => Ok(Self::MantleSepolia),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

/// Picks the spec a block on `chain_id` executes under.
///
/// Ethereum mainnet follows its activation schedule; every other chain runs under `fallback`.
pub fn spec_for_block(chain_id: u64, number: u64, timestamp: u64, fallback: SpecId) -> SpecId {
    if chain_id != Network::Ethereum.chain_id() {
        return fallback;
    }
    if timestamp >= mainnet::PRAGUE_TIMESTAMP {
        SpecId::PRAGUE
    } else if timestamp >= mainnet::CANCUN_TIMESTAMP {
        SpecId::CANCUN
    } else if timestamp >= mainnet::SHANGHAI_TIMESTAMP {
        SpecId::SHANGHAI
    } else if number >= mainnet::MERGE_BLOCK {
        SpecId::MERGE
    } else if number >= mainnet::LONDON_BLOCK {
        SpecId::LONDON
    } else if number >= mainnet::BERLIN_BLOCK {
        SpecId::BERLIN
    } else {
        SpecId::ISTANBUL
    }
}

/// Senders whose transactions are skipped when replaying the start of a block.
///
/// Arbitrum's L1 sender is skipped on every chain; no chain has extra senders yet.
pub fn system_senders(_chain_id: u64) -> Vec<Address> {
    vec![ARBITRUM_SENDER]
}
