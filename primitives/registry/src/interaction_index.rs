//! Reference index derived from interaction lists.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use documents::Interaction;
use serde::Serialize;
use types::parse_module_ref;

use crate::LoadedDocument;

/// An interaction whose `module` string does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedInteraction {
    /// Token symbol of the owning document
    pub token: String,
    /// Owning document
    pub path: PathBuf,
    /// The raw `module` value
    pub module: String,
    /// Parse error
    pub message: String,
}

/// Module and function references used across all interaction lists.
#[derive(Debug, Clone, Default)]
pub struct InteractionIndex {
    /// Canonical module ids referenced by any interaction
    pub modules: BTreeSet<String>,
    /// Canonical function ids referenced by interactions declaring both parts
    pub functions: BTreeSet<String>,
    /// Interactions grouped by token symbol
    pub by_token: BTreeMap<String, Vec<Interaction>>,
    /// Interactions whose module reference failed to parse
    pub malformed: Vec<MalformedInteraction>,
}

/// Derive the reference index from loaded documents.
pub fn index_interactions(docs: &[LoadedDocument]) -> InteractionIndex {
    let mut index = InteractionIndex::default();

    for doc in docs {
        let bucket = index.by_token.entry(doc.token.clone()).or_default();
        for interaction in &doc.document.interactions {
            bucket.push(interaction.clone());

            let Some(raw_module) = interaction.module_ref() else { continue };
            match parse_module_ref(raw_module) {
                Ok(module) => {
                    if let Some(function) = interaction.function_name() {
                        index.functions.insert(module.function(function).id());
                    }
                    index.modules.insert(module.id());
                }
                Err(e) => index.malformed.push(MalformedInteraction {
                    token: doc.token.clone(),
                    path: doc.path.clone(),
                    module: raw_module.to_string(),
                    message: e.to_string(),
                }),
            }
        }
    }

    index
}
