//! Module and function references.
//!
//! A module reference is `(address, module_name)`, written
//! `address::module_name`. A function reference adds a trailing function
//! name: `address::module_name::function_name`. Both types always hold a
//! canonical address, so their string forms can be used directly as map keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::normalize_address;

/// Separator between address, module and function segments.
pub const SEPARATOR: &str = "::";

/// Errors produced while parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The reference does not have the expected `a::b[::c]` shape.
    #[error("malformed reference `{raw}`: {reason}")]
    MalformedReference {
        /// The input that failed to parse
        raw: String,
        /// What was wrong with it
        reason: &'static str,
    },
}

impl IdentifierError {
    fn malformed(raw: &str, reason: &'static str) -> Self {
        IdentifierError::MalformedReference { raw: raw.to_string(), reason }
    }
}

/// A reference to a module published at an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleRef {
    /// Canonical address
    pub address: String,
    /// Module name, verbatim
    pub name: String,
}

impl ModuleRef {
    /// Build a module reference, normalizing the address.
    pub fn new(address: &str, name: impl Into<String>) -> Self {
        Self { address: normalize_address(address), name: name.into() }
    }

    /// Canonical string form, `address::module`.
    pub fn id(&self) -> String { module_id(&self.address, &self.name) }

    /// Reference to a function inside this module.
    pub fn function(&self, name: impl Into<String>) -> FunctionRef {
        FunctionRef { module: self.clone(), name: name.into() }
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.address, SEPARATOR, self.name)
    }
}

/// A reference to a function inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionRef {
    /// Owning module
    pub module: ModuleRef,
    /// Function name, verbatim
    pub name: String,
}

impl FunctionRef {
    /// Canonical string form, `address::module::function`.
    pub fn id(&self) -> String { function_id(&self.module.address, &self.module.name, &self.name) }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.module, SEPARATOR, self.name)
    }
}

/// Compose a canonical module id. The address is normalized.
pub fn module_id(address: &str, module_name: &str) -> String {
    format!("{}{}{}", normalize_address(address), SEPARATOR, module_name)
}

/// Compose a canonical function id. The address is normalized.
pub fn function_id(address: &str, module_name: &str, function_name: &str) -> String {
    format!("{}{}{}", module_id(address, module_name), SEPARATOR, function_name)
}

/// Parse `address::module` into a [`ModuleRef`].
///
/// Exactly two non-empty segments are accepted; module names and addresses
/// never contain `::`.
pub fn parse_module_ref(raw: &str) -> Result<ModuleRef, IdentifierError> {
    let trimmed = raw.trim();
    let (address, name) = trimmed
        .split_once(SEPARATOR)
        .ok_or_else(|| IdentifierError::malformed(raw, "expected `address::module`"))?;

    if name.contains(SEPARATOR) {
        return Err(IdentifierError::malformed(raw, "too many `::` segments for a module"));
    }
    if name.is_empty() {
        return Err(IdentifierError::malformed(raw, "empty module name"));
    }
    let address = normalize_address(address);
    if address.is_empty() {
        return Err(IdentifierError::malformed(raw, "empty address"));
    }

    Ok(ModuleRef { address, name: name.to_string() })
}

/// Parse `address::module::function` into a [`FunctionRef`].
///
/// The function name is taken after the last `::`; the remainder must be a
/// valid module reference.
pub fn parse_function_ref(raw: &str) -> Result<FunctionRef, IdentifierError> {
    let trimmed = raw.trim();
    let (module_part, name) = trimmed
        .rsplit_once(SEPARATOR)
        .ok_or_else(|| IdentifierError::malformed(raw, "expected `address::module::function`"))?;

    if name.is_empty() {
        return Err(IdentifierError::malformed(raw, "empty function name"));
    }
    let module = parse_module_ref(module_part)
        .map_err(|_| IdentifierError::malformed(raw, "expected `address::module::function`"))?;

    Ok(module.function(name))
}
