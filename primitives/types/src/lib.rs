// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Core identifier types for the smart-contract registry tooling.
//!
//! Every other crate in the workspace compares chain addresses, module
//! references and function references through the canonical forms defined
//! here. Raw strings taken from documents or RPC payloads are normalized once
//! at the boundary and never compared in their original spelling.

/// Chain address normalization.
pub mod address;
/// Module and function references (`address::module[::function]`).
pub mod identifier;
/// Known chain networks and their metadata.
pub mod network;

pub use address::{is_missing, normalize_address, ADDRESS_HEX_LEN};
pub use identifier::{
    function_id, module_id, parse_function_ref, parse_module_ref, FunctionRef, IdentifierError,
    ModuleRef,
};
pub use network::Network;
