//! Interaction-list directory loader.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use documents::InteractionListDocument;
use serde::Serialize;

use crate::{RegistryError, RegistryResult};

/// How a batch load treats a malformed file.
///
/// Chosen per call: validators that want a full report use
/// [`LoadMode::Tolerant`]; tools that rewrite documents use
/// [`LoadMode::Atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Record the file as a per-file error and keep going
    #[default]
    Tolerant,
    /// Fail the whole load on the first malformed file
    Atomic,
}

/// A parsed interaction list with its origin.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File the document was read from
    pub path: PathBuf,
    /// Uppercased token symbol: the declared symbol, else the file stem
    pub token: String,
    /// Parsed document
    pub document: InteractionListDocument,
}

/// A file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLoadError {
    /// Offending file
    pub path: PathBuf,
    /// What went wrong
    pub message: String,
}

/// Outcome of a tolerant batch load.
#[derive(Debug, Clone, Default)]
pub struct LoadedInteractionLists {
    /// Successfully parsed documents, sorted by file name
    pub documents: Vec<LoadedDocument>,
    /// Files excluded from `documents`
    pub errors: Vec<FileLoadError>,
}

impl LoadedInteractionLists {
    /// Every document for a token symbol (case-insensitive), in file order.
    ///
    /// More than one document may declare the same symbol; callers treat
    /// their interactions and routes as one list.
    pub fn by_token(&self, symbol: &str) -> Vec<&LoadedDocument> {
        let wanted = symbol.trim().to_uppercase();
        self.documents.iter().filter(|d| d.token == wanted).collect()
    }

    /// Symbols declared by more than one document.
    pub fn duplicate_tokens(&self) -> BTreeMap<String, Vec<PathBuf>> {
        duplicate_tokens(&self.documents)
    }
}

/// Symbols declared by more than one of `docs`, with the declaring files.
pub fn duplicate_tokens(docs: &[LoadedDocument]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for doc in docs {
        files.entry(doc.token.clone()).or_default().push(doc.path.clone());
    }
    files.retain(|_, paths| paths.len() > 1);
    files
}

impl LoadedDocument {
    /// Wrap a parsed document, deriving its token symbol.
    pub fn new(path: impl Into<PathBuf>, document: InteractionListDocument) -> Self {
        let path = path.into();
        let token = document.declared_symbol().unwrap_or_else(|| file_stem_symbol(&path));
        Self { path, token, document }
    }
}

fn file_stem_symbol(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().to_uppercase()).unwrap_or_default()
}

/// Load every `*.json` file in `dir`, in file-name order.
///
/// # Errors
///
/// - [`RegistryError::InteractionDirNotFound`] when `dir` is missing
/// - [`RegistryError::DocumentParse`] on the first bad file in [`LoadMode::Atomic`]
pub fn load_interaction_lists(
    dir: &Path,
    mode: LoadMode,
) -> RegistryResult<LoadedInteractionLists> {
    if !dir.is_dir() {
        return Err(RegistryError::InteractionDirNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut loaded = LoadedInteractionLists::default();
    for path in paths {
        match read_document(&path) {
            Ok(document) => loaded.documents.push(LoadedDocument::new(path, document)),
            Err(message) => {
                if mode == LoadMode::Atomic {
                    return Err(RegistryError::DocumentParse { path, message });
                }
                tracing::warn!("skipping interaction list {}: {}", path.display(), message);
                loaded.errors.push(FileLoadError { path, message });
            }
        }
    }

    for (token, paths) in loaded.duplicate_tokens() {
        tracing::warn!("token {} is declared by {} interaction lists", token, paths.len());
    }

    tracing::debug!(
        "loaded {} interaction lists from {} ({} skipped)",
        loaded.documents.len(),
        dir.display(),
        loaded.errors.len()
    );
    Ok(loaded)
}

fn read_document(path: &Path) -> Result<InteractionListDocument, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}
