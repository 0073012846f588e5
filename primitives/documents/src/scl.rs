//! Smart Contract List (SCL) schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Smart Contract List document: `{ name, timestamp, version, smartContracts: [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContractList {
    /// List name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Generation timestamp (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// List version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ListVersion>,
    /// One entry per `(address, moduleName)`
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub smart_contracts: Vec<SmartContractEntry>,
    /// Fields not interpreted by the tooling (logoURI, keywords, tags, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Semantic version of a list document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListVersion {
    /// Major version
    #[serde(default)]
    pub major: u32,
    /// Minor version
    #[serde(default)]
    pub minor: u32,
    /// Patch version
    #[serde(default)]
    pub patch: u32,
}

/// One module entry of the SCL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContractEntry {
    /// Chain id the module was fetched from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Publishing address, as written in the document
    pub address: String,
    /// Module name
    pub module_name: String,
    /// Platform / protocol name
    #[serde(default)]
    pub platform: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Tag set
    #[serde(default)]
    pub tags: Vec<String>,
    /// Exposed functions
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub functions: Vec<FunctionDescriptor>,
    /// Struct declarations
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub structs: Vec<StructDescriptor>,
    /// Audit/governance/etc. bag, opaque to the tooling
    #[serde(default)]
    pub extensions: Map<String, Value>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A function signature as recorded in the SCL (snake_case keys, as the chain ABI).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Function name
    pub name: String,
    /// `public`, `friend` or `private`
    #[serde(default)]
    pub visibility: String,
    /// Whether the function is callable directly as a transaction
    #[serde(default)]
    pub is_entry: bool,
    /// Full Move parameter list, including `&signer`
    #[serde(default)]
    pub params: Vec<String>,
    /// Return types
    #[serde(default, rename = "return")]
    pub returns: Vec<String>,
    /// Generic type parameter constraints
    #[serde(default)]
    pub generic_type_params: Vec<Value>,
    /// Remaining fields (audited, auditors, acquires, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A struct declaration as recorded in the SCL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructDescriptor {
    /// Struct name
    pub name: String,
    /// Move abilities (`copy`, `drop`, `store`, `key`)
    #[serde(default)]
    pub abilities: Vec<String>,
    /// Fields
    #[serde(default)]
    pub fields: Vec<Value>,
    /// Whether the struct has the `key` ability
    #[serde(default)]
    pub is_resource: bool,
}

impl SmartContractList {
    /// Total number of function descriptors across all entries.
    pub fn function_count(&self) -> usize {
        self.smart_contracts.iter().map(|c| c.functions.len()).sum()
    }
}
