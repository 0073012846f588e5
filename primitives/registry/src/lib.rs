#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Registry loaders: in-memory indexes over the registry documents.
//!
//! This crate reads the Smart Contract List and the per-token Interaction
//! Lists from disk and builds the lookup structures every validator works
//! against. It performs no network access.

pub mod interaction_index;
pub mod interaction_lists;
pub mod scl_index;

use std::path::PathBuf;

pub use interaction_index::{index_interactions, InteractionIndex, MalformedInteraction};
pub use interaction_lists::{
    duplicate_tokens, load_interaction_lists, FileLoadError, LoadMode, LoadedDocument,
    LoadedInteractionLists,
};
pub use scl_index::{load_scl, DuplicateFunction, FunctionInfo, SclIndex, SclReader};

/// Errors that abort loading a required input.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Neither the primary nor the fallback SCL path exists
    #[error("SCL not found at {primary:?} (fallback: {fallback:?})")]
    SclNotFound {
        /// Primary path
        primary: PathBuf,
        /// Fallback path, if one was configured
        fallback: Option<PathBuf>,
    },
    /// The SCL exists but is not valid JSON for the schema
    #[error("failed to parse SCL {path}: {source}")]
    SclParse {
        /// Offending file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
    /// The interaction-list directory does not exist
    #[error("interaction list directory not found: {0}")]
    InteractionDirNotFound(PathBuf),
    /// An interaction list failed to parse while loading atomically
    #[error("failed to parse interaction list {path}: {message}")]
    DocumentParse {
        /// Offending file
        path: PathBuf,
        /// Parse error message
        message: String,
    },
    /// I/O failure while reading inputs
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
