#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Typed document schemas.
//!
//! Every JSON document the tooling reads or writes is parsed once into the
//! structs defined here. Fields the tooling does not interpret are preserved
//! in `extra` maps so that rewritten documents do not lose data.

pub mod interaction_list;
pub mod param_matrix;
pub mod protocol_matrix;
pub mod rpc;
pub mod scl;
pub mod seed;

pub use interaction_list::{
    Interaction, InteractionArguments, InteractionKey, InteractionListDocument, RouteStep,
    TokenInfo,
};
pub use param_matrix::{ArityDefault, ArityOverride, ParamMatrix};
pub use protocol_matrix::{MatrixMapping, ProtocolEntry, ProtocolMatrix};
pub use rpc::{AccountModule, ExposedFunction, ModuleAbi, MoveStruct, Transaction};
pub use scl::{
    FunctionDescriptor, ListVersion, SmartContractEntry, SmartContractList, StructDescriptor,
};
pub use seed::{SeedAddress, SeedList, SeedProtocol};

use std::path::Path;

use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` the same way as a missing field.
///
/// Used with `#[serde(default, deserialize_with = "null_as_default")]` on
/// collection fields that hand-edited documents sometimes null out.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read and parse a JSON document from `path`.
pub fn from_file<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a document to `path` as pretty-printed JSON, creating parent directories.
pub fn to_file<T: serde::Serialize>(
    value: &T,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}
