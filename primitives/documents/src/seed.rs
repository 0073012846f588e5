//! Seed list of protocol addresses used to generate an SCL.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{ protocols: [{ name, addresses: [{ address }] }] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedList {
    /// Protocols and their publishing addresses
    #[serde(default)]
    pub protocols: Vec<SeedProtocol>,
}

/// A protocol in the seed list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedProtocol {
    /// Protocol name
    #[serde(default)]
    pub name: String,
    /// Addresses attributed to the protocol
    #[serde(default)]
    pub addresses: Vec<SeedAddress>,
}

/// One address record. Only `address` is interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedAddress {
    /// Raw address string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Remaining fields (label, notes, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
