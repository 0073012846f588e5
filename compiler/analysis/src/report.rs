//! Itemized issues and the report envelope shared by every command.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Network label written by checks that do not touch a chain.
pub const OFFLINE_NETWORK: &str = "offline";

/// What went wrong. Serialized under `kind` in snake_case, with any
/// payload fields alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// An identifier string does not parse
    MalformedReference,
    /// A matrix mapping names a token without an interaction list
    TokenMissingFromIl,
    /// Interaction module absent from the SCL
    ModuleNotInScl,
    /// Interaction function absent from the SCL
    FunctionNotInScl,
    /// Interaction function present in the SCL but not an entry function
    SclFunctionNotEntry,
    /// Interaction declares only one of `module`/`function`
    PartialModuleFunctionReference,
    /// Route step with no same-document interaction
    RouteStepMissingInteraction,
    /// Matrix mapping with no interaction of its `(type, platform)`
    NoMatchingInteraction,
    /// Matching interactions exist but none use the expected module/function
    ModuleFunctionMismatch,
    /// A declared route lacks a step for the mapping
    RouteMissingExpectedStep,
    /// Arity audit could not resolve the SCL function
    SclFunctionMissing,
    /// Arity disagreement
    ParamCountMismatch {
        /// SCL-declared parameter count
        expected: usize,
        /// Count resolved for the interaction
        our: usize,
    },
    /// Module absent on chain
    ModuleNotFound,
    /// Function absent from the on-chain module ABI
    FunctionNotFound,
    /// On-chain function exists but is not an entry function
    NotEntry,
    /// Module list for an address could not be fetched
    AccountModulesFetchFailed,
    /// Transactions for a wallet could not be fetched
    WalletFetchFailed,
    /// A function name repeated inside one SCL entry
    DuplicateSclFunction,
    /// One token symbol declared by several interaction lists
    DuplicateTokenSymbol,
}

impl IssueKind {
    /// Stable snake_case name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MalformedReference => "malformed_reference",
            IssueKind::TokenMissingFromIl => "token_missing_from_il",
            IssueKind::ModuleNotInScl => "module_not_in_scl",
            IssueKind::FunctionNotInScl => "function_not_in_scl",
            IssueKind::SclFunctionNotEntry => "scl_function_not_entry",
            IssueKind::PartialModuleFunctionReference => "partial_module_function_reference",
            IssueKind::RouteStepMissingInteraction => "route_step_missing_interaction",
            IssueKind::NoMatchingInteraction => "no_matching_interaction",
            IssueKind::ModuleFunctionMismatch => "module_function_mismatch",
            IssueKind::RouteMissingExpectedStep => "route_missing_expected_step",
            IssueKind::SclFunctionMissing => "scl_function_missing",
            IssueKind::ParamCountMismatch { .. } => "param_count_mismatch",
            IssueKind::ModuleNotFound => "module_not_found",
            IssueKind::FunctionNotFound => "function_not_found",
            IssueKind::NotEntry => "not_entry",
            IssueKind::AccountModulesFetchFailed => "account_modules_fetch_failed",
            IssueKind::WalletFetchFailed => "wallet_fetch_failed",
            IssueKind::DuplicateSclFunction => "duplicate_scl_function",
            IssueKind::DuplicateTokenSymbol => "duplicate_token_symbol",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::ParamCountMismatch { expected, our } => {
                write!(f, "param_count_mismatch(expected={}, our={})", expected, our)
            }
            other => f.write_str(other.as_str()),
        }
    }
}

/// One itemized finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Finding kind
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Token symbol the finding belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Identifier the finding is about (function id, route step, address, ...)
    pub subject: String,
    /// Human-readable context
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl Issue {
    /// Build an issue without token context.
    pub fn new(kind: IssueKind, subject: impl Into<String>) -> Self {
        Self { kind, token: None, subject: subject.into(), detail: String::new() }
    }

    /// Attach the owning token.
    pub fn for_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Attach context.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(token) = &self.token {
            write!(f, " {}:", token)?;
        }
        write!(f, " {}", self.subject)?;
        if !self.detail.is_empty() {
            write!(f, " ({})", self.detail)?;
        }
        Ok(())
    }
}

/// Count issues per kind name.
pub fn count_by_kind(issues: &[Issue]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for issue in issues {
        *counts.entry(issue.kind.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

/// The component-specific part of a report.
pub trait ReportBody: Serialize {
    /// Entries of the `counts` object.
    fn counts(&self) -> BTreeMap<String, usize>;

    /// Number of itemized issues, used for strict gating.
    fn issue_count(&self) -> usize;
}

/// Fixed report envelope: timestamp, network, counts, then the body's fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<T: Serialize> {
    /// RFC 3339 generation time
    pub generated_at: String,
    /// Network key, or `offline`
    pub network: String,
    /// Summary counts
    pub counts: BTreeMap<String, usize>,
    /// Itemized body
    #[serde(flatten)]
    pub body: T,
}

impl<T: ReportBody> Report<T> {
    /// Wrap `body`, stamping the current time.
    pub fn new(network: impl Into<String>, body: T) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            network: network.into(),
            counts: body.counts(),
            body,
        }
    }

    /// Whether strict gating should fail.
    pub fn has_issues(&self) -> bool { self.body.issue_count() > 0 }
}

/// Path of the report for `command` inside `dir`.
pub fn report_path(dir: &Path, command: &str) -> PathBuf {
    dir.join(format!("{}-report.json", command))
}

/// Write `report` as pretty JSON to `<dir>/<command>-report.json`.
pub fn write_report<T: Serialize>(dir: &Path, command: &str, report: &T) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = report_path(dir, command);
    std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
    tracing::info!("wrote {}", path.display());
    Ok(path)
}
