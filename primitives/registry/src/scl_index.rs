//! SCL lookup index.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use documents::SmartContractList;
use serde::Serialize;
use types::{function_id, module_id};

use crate::{RegistryError, RegistryResult};

/// Attributes of an SCL function needed by the validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    /// Entry flag as recorded in the SCL
    pub is_entry: bool,
    /// Length of the full Move parameter list
    pub param_count: usize,
    /// Number of generic type parameters
    pub generic_type_param_count: usize,
}

/// A function name that appears more than once inside one SCL entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateFunction {
    /// Canonical module id of the entry
    pub module_id: String,
    /// Duplicated function name
    pub function: String,
    /// How many times it appears
    pub occurrences: usize,
}

/// Module and function lookup built from one SCL document.
#[derive(Debug, Default, Clone)]
pub struct SclIndex {
    /// Canonical module ids
    modules: BTreeSet<String>,
    /// Canonical function id to attributes. Duplicates resolve last-wins.
    functions: BTreeMap<String, FunctionInfo>,
    /// Data-quality findings collected while indexing
    duplicates: Vec<DuplicateFunction>,
    /// File the index was loaded from
    source: Option<PathBuf>,
}

/// Read-only interface to an SCL index.
pub trait SclReader {
    /// Whether the canonical module id is listed.
    fn has_module(&self, module_id: &str) -> bool;

    /// Attributes of the canonical function id, if listed.
    fn get_function(&self, function_id: &str) -> Option<&FunctionInfo>;

    /// Number of distinct modules.
    fn module_count(&self) -> usize;

    /// Number of distinct functions.
    fn function_count(&self) -> usize;
}

impl SclReader for SclIndex {
    fn has_module(&self, module_id: &str) -> bool { self.modules.contains(module_id) }

    fn get_function(&self, function_id: &str) -> Option<&FunctionInfo> {
        self.functions.get(function_id)
    }

    fn module_count(&self) -> usize { self.modules.len() }

    fn function_count(&self) -> usize { self.functions.len() }
}

impl SclIndex {
    /// Build the index from a parsed SCL document.
    pub fn from_list(list: &SmartContractList) -> Self {
        let mut index = Self::default();

        for entry in &list.smart_contracts {
            let module = module_id(&entry.address, &entry.module_name);
            index.modules.insert(module.clone());

            let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
            for f in &entry.functions {
                *seen.entry(f.name.as_str()).or_insert(0) += 1;
                index.functions.insert(
                    function_id(&entry.address, &entry.module_name, &f.name),
                    FunctionInfo {
                        is_entry: f.is_entry,
                        param_count: f.params.len(),
                        generic_type_param_count: f.generic_type_params.len(),
                    },
                );
            }

            for (name, occurrences) in seen {
                if occurrences > 1 {
                    index.duplicates.push(DuplicateFunction {
                        module_id: module.clone(),
                        function: name.to_string(),
                        occurrences,
                    });
                }
            }
        }

        index
    }

    /// Function names declared more than once within one entry.
    pub fn duplicates(&self) -> &[DuplicateFunction] { &self.duplicates }

    /// File the index was loaded from, if loaded from disk.
    pub fn source(&self) -> Option<&Path> { self.source.as_deref() }
}

/// Load the SCL from `primary`, falling back to `fallback` when the primary
/// path does not exist.
///
/// # Errors
///
/// - [`RegistryError::SclNotFound`] when neither path exists
/// - [`RegistryError::SclParse`] when the chosen file is not a valid SCL
pub fn load_scl(primary: &Path, fallback: Option<&Path>) -> RegistryResult<SclIndex> {
    let path = if primary.exists() {
        primary
    } else if let Some(fb) = fallback.filter(|p| p.exists()) {
        tracing::warn!(
            "primary SCL {} missing, using fallback {}",
            primary.display(),
            fb.display()
        );
        fb
    } else {
        return Err(RegistryError::SclNotFound {
            primary: primary.to_path_buf(),
            fallback: fallback.map(Path::to_path_buf),
        });
    };

    let content = std::fs::read_to_string(path)?;
    let list: SmartContractList = serde_json::from_str(&content)
        .map_err(|source| RegistryError::SclParse { path: path.to_path_buf(), source })?;

    let mut index = SclIndex::from_list(&list);
    index.source = Some(path.to_path_buf());
    tracing::debug!(
        "loaded SCL {}: {} modules, {} functions",
        path.display(),
        index.module_count(),
        index.function_count()
    );
    Ok(index)
}
