//! Type-safe names for the Move networks the tooling knows about.
//!
//! Each variant carries static metadata (display name, chain id and public
//! full-node REST endpoint). Configuration may override the endpoint, but the
//! keys themselves are fixed here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Known Move networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    /// Aptos mainnet
    AptosMainnet,
    /// Aptos testnet
    AptosTestnet,
    /// Movement mainnet
    MovementMainnet,
    /// Movement testnet
    MovementTestnet,
}

/// Metadata for a network variant.
struct NetworkMetadata {
    key: &'static str,
    display_name: &'static str,
    chain_id: u64,
    rpc_url: &'static str,
}

static NETWORK_METADATA: [NetworkMetadata; 4] = [
    NetworkMetadata {
        key: "aptos_mainnet",
        display_name: "Aptos Mainnet",
        chain_id: 1,
        rpc_url: "https://fullnode.mainnet.aptoslabs.com/v1",
    },
    NetworkMetadata {
        key: "aptos_testnet",
        display_name: "Aptos Testnet",
        chain_id: 2,
        rpc_url: "https://fullnode.testnet.aptoslabs.com/v1",
    },
    NetworkMetadata {
        key: "movement_mainnet",
        display_name: "Movement Mainnet",
        chain_id: 1,
        rpc_url: "https://full.mainnet.movementinfra.xyz/v1",
    },
    NetworkMetadata {
        key: "movement_testnet",
        display_name: "Movement Testnet",
        chain_id: 2,
        rpc_url: "https://full.testnet.movementinfra.xyz/v1",
    },
];

impl Network {
    /// All known networks, in declaration order.
    pub const ALL: [Network; 4] = [
        Network::AptosMainnet,
        Network::AptosTestnet,
        Network::MovementMainnet,
        Network::MovementTestnet,
    ];

    fn metadata(&self) -> &'static NetworkMetadata {
        let index = match self {
            Network::AptosMainnet => 0,
            Network::AptosTestnet => 1,
            Network::MovementMainnet => 2,
            Network::MovementTestnet => 3,
        };
        &NETWORK_METADATA[index]
    }

    /// Configuration key, e.g. `movement_mainnet`.
    pub fn as_str(&self) -> &'static str { self.metadata().key }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str { self.metadata().display_name }

    /// Chain id reported in generated documents.
    pub fn chain_id(&self) -> u64 { self.metadata().chain_id }

    /// Default public REST endpoint, including the `/v1` prefix.
    pub fn default_rpc_url(&self) -> &'static str { self.metadata().rpc_url }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Network::ALL
            .iter()
            .copied()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| format!("Unknown network: {}", s))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}
