//! Interaction List (IL) schema: one document per token.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A per-token interaction list: `{ token: {symbol}, interactions: [...], routes: {...} }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionListDocument {
    /// Token this document describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenInfo>,
    /// User-facing actions
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub interactions: Vec<Interaction>,
    /// Named multi-step flows, each step referencing an interaction
    #[serde(default, deserialize_with = "crate::null_as_default")]
    pub routes: BTreeMap<String, Vec<RouteStep>>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token header of an IL document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token symbol, e.g. `USDC`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One user-facing action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Interaction kind (`lend`, `borrow`, `swap`, `lp`, `vault`, `stake`, ...)
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Protocol name
    #[serde(default)]
    pub platform: String,
    /// Module reference, `address::module`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Function name inside `module`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Generic type arguments passed to the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_arguments: Option<Vec<Value>>,
    /// Where the type arguments come from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_arguments_source: Option<Value>,
    /// Ordered argument slots sent by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
    /// Alternative argument description carrying a `schema` list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<InteractionArguments>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `arguments` object of an interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionArguments {
    /// Ordered argument schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<Value>>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One step of a route. Steps reference interactions by `(type, platform)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteStep {
    /// Interaction kind
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Protocol name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `(type, platform)` pair that ties route steps, matrix mappings and
/// arity rules to interactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InteractionKey {
    /// Interaction kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Protocol name
    pub platform: String,
}

impl InteractionKey {
    /// Build a key from its parts.
    pub fn new(kind: impl Into<String>, platform: impl Into<String>) -> Self {
        Self { kind: kind.into(), platform: platform.into() }
    }
}

impl fmt::Display for InteractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.platform)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Interaction {
    /// The `(type, platform)` key of this interaction.
    pub fn key(&self) -> InteractionKey { InteractionKey::new(&self.kind, &self.platform) }

    /// Module reference, treating a blank string as absent.
    pub fn module_ref(&self) -> Option<&str> { non_blank(&self.module) }

    /// Function name, treating a blank string as absent.
    pub fn function_name(&self) -> Option<&str> { non_blank(&self.function) }

    /// Number of arguments the interaction declares itself: the length of
    /// `params`, else the length of `arguments.schema`.
    pub fn declared_arg_count(&self) -> Option<usize> {
        if let Some(params) = &self.params {
            return Some(params.len());
        }
        self.arguments.as_ref().and_then(|a| a.schema.as_ref()).map(|s| s.len())
    }
}

impl RouteStep {
    /// The `(type, platform)` key of this step. Missing parts become empty
    /// strings, which never match a real interaction.
    pub fn key(&self) -> InteractionKey {
        InteractionKey::new(
            self.kind.clone().unwrap_or_default(),
            self.platform.clone().unwrap_or_default(),
        )
    }
}

impl InteractionListDocument {
    /// The declared token symbol, uppercased, if present and non-blank.
    pub fn declared_symbol(&self) -> Option<String> {
        self.token
            .as_ref()
            .and_then(|t| non_blank(&t.symbol))
            .map(|s| s.to_uppercase())
    }

    /// Whether any interaction in this document has the given key.
    pub fn has_interaction(&self, key: &InteractionKey) -> bool {
        self.interactions.iter().any(|i| i.kind == key.kind && i.platform == key.platform)
    }
}
