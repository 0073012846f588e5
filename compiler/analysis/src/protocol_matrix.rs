//! Protocol Matrix Validation
//!
//! The protocol-interaction matrix is a second opinion on the interaction
//! lists: each mapping claims that certain tokens carry an interaction of a
//! given `(type, protocol)` bound to a given module and function.

use std::collections::BTreeMap;

use documents::{Interaction, MatrixMapping, ProtocolMatrix};
use registry::LoadedInteractionLists;
use serde::Serialize;
use types::parse_module_ref;

use crate::report::{count_by_kind, Issue, IssueKind, Report, ReportBody, OFFLINE_NETWORK};
use crate::{AnalysisError, AuditContext, AuditPhase, PhaseResult};

/// Body of `matrix-report.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixReport {
    /// Protocols in the matrix
    pub protocols: usize,
    /// Mappings in the matrix
    pub mappings: usize,
    /// `(mapping, token)` pairs checked
    pub checked_pairs: usize,
    /// Itemized findings
    pub issues: Vec<Issue>,
}

impl ReportBody for MatrixReport {
    fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = count_by_kind(&self.issues);
        counts.insert("protocols".into(), self.protocols);
        counts.insert("mappings".into(), self.mappings);
        counts.insert("checkedPairs".into(), self.checked_pairs);
        counts.insert("issues".into(), self.issues.len());
        counts
    }

    fn issue_count(&self) -> usize { self.issues.len() }
}

/// Matrix ↔ interaction-list validator
pub struct ProtocolMatrixValidator;

impl Default for ProtocolMatrixValidator {
    fn default() -> Self { Self::new() }
}

impl ProtocolMatrixValidator {
    /// Create a new validator
    pub fn new() -> Self { Self }

    /// Check every `(mapping, token)` pair the matrix declares.
    pub fn validate(
        &self,
        matrix: &ProtocolMatrix,
        lists: &LoadedInteractionLists,
    ) -> MatrixReport {
        let mut report = MatrixReport {
            protocols: matrix.protocols.len(),
            mappings: matrix.mapping_count(),
            checked_pairs: 0,
            issues: Vec::new(),
        };

        for protocol in &matrix.protocols {
            for mapping in &protocol.interactions {
                for token in &mapping.tokens {
                    report.checked_pairs += 1;
                    self.check_pair(&protocol.name, mapping, token, lists, &mut report.issues);
                }
            }
        }

        report
    }

    fn check_pair(
        &self,
        protocol: &str,
        mapping: &MatrixMapping,
        token: &str,
        lists: &LoadedInteractionLists,
        issues: &mut Vec<Issue>,
    ) {
        let key = mapping.key(protocol);
        let subject = key.to_string();
        let token_symbol = token.trim().to_uppercase();

        let docs = lists.by_token(token);
        if docs.is_empty() {
            issues.push(
                Issue::new(IssueKind::TokenMissingFromIl, subject)
                    .for_token(token_symbol)
                    .with_detail("no interaction list for token"),
            );
            return;
        }

        let matches: Vec<&Interaction> = docs
            .iter()
            .flat_map(|doc| doc.document.interactions.iter())
            .filter(|i| i.key() == key)
            .collect();

        if matches.is_empty() {
            issues.push(
                Issue::new(IssueKind::NoMatchingInteraction, &subject).for_token(&token_symbol),
            );
        } else if !matches.iter().any(|i| binds_expected(i, mapping)) {
            issues.push(
                Issue::new(IssueKind::ModuleFunctionMismatch, &subject)
                    .for_token(&token_symbol)
                    .with_detail(format!(
                        "expected {}::{}, found {}",
                        mapping.module,
                        mapping.function,
                        matches
                            .iter()
                            .map(|i| format!(
                                "{}::{}",
                                i.module_ref().unwrap_or("-"),
                                i.function_name().unwrap_or("-")
                            ))
                            .collect::<Vec<_>>()
                            .join(", ")
                    )),
            );
        }

        for route_key in &mapping.route_keys {
            // Matrices declare route keys across tokens; undefined ones are skipped.
            let routes: Vec<_> =
                docs.iter().filter_map(|doc| doc.document.routes.get(route_key)).collect();
            if routes.is_empty() {
                continue;
            }
            if !routes.iter().any(|steps| steps.iter().any(|step| step.key() == key)) {
                issues.push(
                    Issue::new(IssueKind::RouteMissingExpectedStep, route_key)
                        .for_token(&token_symbol)
                        .with_detail(subject.clone()),
                );
            }
        }
    }
}

/// Whether `interaction` uses the module and function `mapping` expects.
/// Modules compare in canonical form; unparseable references compare verbatim.
fn binds_expected(interaction: &Interaction, mapping: &MatrixMapping) -> bool {
    let (Some(module), Some(function)) = (interaction.module_ref(), interaction.function_name())
    else {
        return false;
    };
    if function != mapping.function.trim() {
        return false;
    }
    match (parse_module_ref(module), parse_module_ref(&mapping.module)) {
        (Ok(ours), Ok(expected)) => ours == expected,
        _ => module == mapping.module.trim(),
    }
}

impl AuditPhase for ProtocolMatrixValidator {
    fn name(&self) -> &str { "matrix" }

    fn description(&self) -> &str {
        "Check the protocol-interaction matrix against the per-token interaction lists"
    }

    fn run(&self, ctx: &mut AuditContext) -> PhaseResult {
        let matrix = ctx
            .matrix
            .as_ref()
            .ok_or_else(|| AnalysisError::MissingInput("protocol matrix".to_string()))?;

        let body = self.validate(matrix, &ctx.lists);
        let issues = body.issue_count();
        let report = Report::new(OFFLINE_NETWORK, body);
        ctx.add_report(self.name(), serde_json::to_value(&report)?, issues);
        Ok(())
    }
}
