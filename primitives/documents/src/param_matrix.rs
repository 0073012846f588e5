//! Optional param-matrix schema used by the arity auditor.

use serde::{Deserialize, Serialize};

/// `{ defaults: [...], overrides: [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamMatrix {
    /// Expected argument counts keyed by interaction type
    #[serde(default)]
    pub defaults: Vec<ArityDefault>,
    /// Expected argument counts keyed by `(type, platform)`
    #[serde(default)]
    pub overrides: Vec<ArityOverride>,
}

/// Default expected argument count for an interaction type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArityDefault {
    /// Interaction kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Expected argument count
    pub expected_arg_count: usize,
}

/// Expected argument count for a `(type, platform)` pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArityOverride {
    /// Interaction kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Protocol name
    pub platform: String,
    /// Expected argument count
    pub expected_arg_count: usize,
}

impl ParamMatrix {
    /// The override for `(kind, platform)`, if any. Later entries win.
    pub fn override_for(&self, kind: &str, platform: &str) -> Option<usize> {
        self.overrides
            .iter()
            .rev()
            .find(|o| o.kind == kind && o.platform == platform)
            .map(|o| o.expected_arg_count)
    }

    /// The default for `kind`, if any. Later entries win.
    pub fn default_for(&self, kind: &str) -> Option<usize> {
        self.defaults.iter().rev().find(|d| d.kind == kind).map(|d| d.expected_arg_count)
    }
}
