#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! sclkit Analysis
//!
//! Validators, auditors and reporters over the loaded registry documents,
//! plus the on-chain verifier and the SCL fetcher. Offline checks implement
//! [`AuditPhase`] and run against a shared [`AuditContext`]; the networked
//! components are async and talk through a [`transport::DynTransport`].

use std::collections::BTreeMap;

use documents::{ParamMatrix, ProtocolMatrix};
use registry::{index_interactions, InteractionIndex, LoadedInteractionLists, SclIndex};
use serde_json::Value;
use thiserror::Error;

pub mod chain;
pub mod onchain;
pub mod overlap;
pub mod param_arity;
pub mod protocol_matrix;
pub mod report;
pub mod scl_fetch;
pub mod static_consistency;

pub use chain::{ChainClient, ModuleCache};
pub use onchain::{OnchainReport, OnchainVerifier};
pub use overlap::{OverlapReport, OverlapReporter};
pub use param_arity::{ArityPolicy, AritySource, ParamArityAuditor, ParamArityReport};
pub use protocol_matrix::{MatrixReport, ProtocolMatrixValidator};
pub use report::{write_report, Issue, IssueKind, Report, ReportBody, OFFLINE_NETWORK};
pub use scl_fetch::{FetchReport, SclFetcher};
pub use static_consistency::{StaticConsistencyValidator, StaticReport};

/// Shared state for one offline audit run.
///
/// Built once from the loaded documents and passed to each phase in turn.
#[derive(Debug)]
pub struct AuditContext {
    /// SCL lookup index
    pub scl: SclIndex,
    /// Interaction lists, with per-file load errors
    pub lists: LoadedInteractionLists,
    /// References derived from `lists`
    pub index: InteractionIndex,
    /// Protocol-interaction matrix, when one was loaded
    pub matrix: Option<ProtocolMatrix>,
    /// Diagnostics accumulated by phases
    pub diagnostics: AuditDiagnostics,
}

impl AuditContext {
    /// Create a context, deriving the interaction index from `lists`.
    pub fn new(scl: SclIndex, lists: LoadedInteractionLists) -> Self {
        let index = index_interactions(&lists.documents);
        Self { scl, lists, index, matrix: None, diagnostics: AuditDiagnostics::default() }
    }

    /// Attach a protocol-interaction matrix.
    pub fn with_matrix(mut self, matrix: ProtocolMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Record the serialized report of a phase.
    pub fn add_report(&mut self, command: &str, report: Value, issues: usize) {
        self.diagnostics.issue_count += issues;
        self.diagnostics.stats.insert(format!("{}_issues", command), issues);
        self.diagnostics.reports.insert(command.to_string(), report);
    }
}

/// What the phases of one run produced.
#[derive(Debug, Default, Clone)]
pub struct AuditDiagnostics {
    /// Total itemized issues across phases
    pub issue_count: usize,
    /// Per-phase statistics
    pub stats: BTreeMap<String, usize>,
    /// Serialized report per command name
    pub reports: BTreeMap<String, Value>,
}

#[derive(Debug, Error)]
/// Errors that abort a phase or a networked run.
pub enum AnalysisError {
    /// I/O failure while writing reports or documents.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON serialization error.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// A required registry input could not be loaded.
    #[error(transparent)]
    Registry(#[from] registry::RegistryError),
    /// An address pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] regex::Error),
    /// A phase needs an input the context does not carry.
    #[error("missing input: {0}")]
    MissingInput(String),
    /// A document other than the SCL or interaction lists failed to load.
    #[error("failed to load {path}: {message}")]
    Document {
        /// Offending file
        path: std::path::PathBuf,
        /// Error message
        message: String,
    },
}

/// Result alias for phase execution.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Result of a phase. Itemized findings live in the context, not here.
pub type PhaseResult = Result<()>;

/// Common interface of the offline checks.
pub trait AuditPhase {
    /// Command name, also the report file stem
    fn name(&self) -> &str;

    /// Description of what this phase checks
    fn description(&self) -> &str;

    /// Execute this phase on the context
    fn run(&self, ctx: &mut AuditContext) -> PhaseResult;
}

/// Load an optional arity matrix document.
pub fn load_param_matrix(path: &std::path::Path) -> Result<ParamMatrix> {
    documents::from_file(path)
        .map_err(|e| AnalysisError::Document { path: path.to_path_buf(), message: e.to_string() })
}

/// Load the protocol-interaction matrix.
pub fn load_protocol_matrix(path: &std::path::Path) -> Result<ProtocolMatrix> {
    documents::from_file(path)
        .map_err(|e| AnalysisError::Document { path: path.to_path_buf(), message: e.to_string() })
}
