//! Protocol-interaction matrix schema.
//!
//! The matrix is a second opinion on the per-token interaction lists: for a
//! protocol and interaction type it names the expected entry point and the
//! tokens and routes expected to exercise it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::InteractionKey;

/// `{ protocols: [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolMatrix {
    /// One entry per protocol
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub protocols: Vec<ProtocolEntry>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A protocol and its interaction mappings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolEntry {
    /// Protocol name, matched against an interaction's `platform`
    pub name: String,
    /// Mappings for this protocol
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub interactions: Vec<MatrixMapping>,
}

/// Maps `(protocol, type)` to an expected `(module, function)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixMapping {
    /// Interaction kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Expected module reference, `address::module`
    pub module: String,
    /// Expected function name
    pub function: String,
    /// Token symbols expected to carry this interaction
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub tokens: Vec<String>,
    /// Route keys expected to contain a step for this interaction
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub route_keys: Vec<String>,
}

impl MatrixMapping {
    /// The `(type, platform)` key this mapping describes under `protocol`.
    pub fn key(&self, protocol: &str) -> InteractionKey {
        InteractionKey::new(&self.kind, protocol)
    }
}

impl ProtocolMatrix {
    /// Total number of mappings.
    pub fn mapping_count(&self) -> usize {
        self.protocols.iter().map(|p| p.interactions.len()).sum()
    }
}
