//! Payloads returned by the chain node REST API.
//!
//! Only the fields the verifier and the SCL fetcher need are typed; the
//! node returns many more.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload type of an entry-function transaction.
pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// One element of `GET /accounts/{address}/modules`.
///
/// Nodes return `{ bytecode, abi }` wrappers; some mirrors return the bare ABI.
/// Both shapes are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountModule {
    /// A bare module ABI
    Bare(ModuleAbi),
    /// A `{ bytecode, abi }` wrapper. `abi` is absent for modules published without metadata.
    Wrapped {
        /// Module bytecode (hex)
        #[serde(default)]
        bytecode: Option<String>,
        /// Module ABI
        #[serde(default)]
        abi: Option<ModuleAbi>,
    },
}

impl AccountModule {
    /// Consume into the module ABI, if any.
    pub fn into_abi(self) -> Option<ModuleAbi> {
        match self {
            AccountModule::Bare(abi) => Some(abi),
            AccountModule::Wrapped { abi, .. } => abi,
        }
    }
}

/// Move module ABI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleAbi {
    /// Publishing address
    #[serde(default)]
    pub address: String,
    /// Module name
    pub name: String,
    /// Friend modules
    #[serde(default)]
    pub friends: Vec<String>,
    /// Public and entry functions
    #[serde(default)]
    pub exposed_functions: Vec<ExposedFunction>,
    /// Struct declarations
    #[serde(default)]
    pub structs: Vec<MoveStruct>,
}

/// A function exposed by a module ABI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExposedFunction {
    /// Function name
    pub name: String,
    /// Visibility
    #[serde(default)]
    pub visibility: String,
    /// Entry flag
    #[serde(default)]
    pub is_entry: bool,
    /// View flag
    #[serde(default)]
    pub is_view: bool,
    /// Generic type parameter constraints
    #[serde(default)]
    pub generic_type_params: Vec<Value>,
    /// Parameter types
    #[serde(default)]
    pub params: Vec<String>,
    /// Return types
    #[serde(default, rename = "return")]
    pub returns: Vec<String>,
    /// Resources the function acquires
    #[serde(default)]
    pub acquires: Vec<String>,
}

/// A struct declared by a module ABI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveStruct {
    /// Struct name
    pub name: String,
    /// Native flag
    #[serde(default)]
    pub is_native: bool,
    /// Abilities
    #[serde(default)]
    pub abilities: Vec<String>,
    /// Generic type parameters
    #[serde(default)]
    pub generic_type_params: Vec<Value>,
    /// Fields (`{ name, type }`)
    #[serde(default)]
    pub fields: Vec<Value>,
}

/// One element of `GET /accounts/{address}/transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction kind, e.g. `user_transaction`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Transaction hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Ledger version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Payload, absent for non-user transactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<TransactionPayload>,
}

/// Transaction payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// Payload kind, e.g. `entry_function_payload`
    #[serde(default, rename = "type")]
    pub kind: String,
    /// `address::module::function` for entry-function payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl Transaction {
    /// The invoked function when the payload is an entry-function call.
    pub fn entry_function(&self) -> Option<&str> {
        let payload = self.payload.as_ref()?;
        if payload.kind != ENTRY_FUNCTION_PAYLOAD {
            return None;
        }
        payload.function.as_deref().filter(|f| !f.trim().is_empty())
    }
}
