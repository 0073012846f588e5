//! Static Consistency Validation
//!
//! Checks interaction-list references against the SCL and route steps
//! against the interactions of their own document. No network access.

use std::collections::BTreeMap;

use registry::{duplicate_tokens, FileLoadError, LoadedDocument, SclIndex, SclReader};
use serde::Serialize;
use types::parse_module_ref;

use crate::report::{count_by_kind, Issue, IssueKind, Report, ReportBody, OFFLINE_NETWORK};
use crate::{AuditContext, AuditPhase, PhaseResult};

/// Body of `validate-report.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticReport {
    /// Interaction lists checked
    pub documents: usize,
    /// Interactions declaring both module and function
    pub checked_interactions: usize,
    /// Route steps checked
    pub checked_route_steps: usize,
    /// Itemized findings
    pub issues: Vec<Issue>,
    /// Files excluded from the run
    pub load_errors: Vec<FileLoadError>,
}

impl ReportBody for StaticReport {
    fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = count_by_kind(&self.issues);
        counts.insert("documents".into(), self.documents);
        counts.insert("checkedInteractions".into(), self.checked_interactions);
        counts.insert("checkedRouteSteps".into(), self.checked_route_steps);
        counts.insert("issues".into(), self.issues.len());
        counts.insert("loadErrors".into(), self.load_errors.len());
        counts
    }

    fn issue_count(&self) -> usize { self.issues.len() }
}

/// IL ↔ SCL and route ↔ interaction validator
pub struct StaticConsistencyValidator;

impl Default for StaticConsistencyValidator {
    fn default() -> Self { Self::new() }
}

impl StaticConsistencyValidator {
    /// Create a new validator
    pub fn new() -> Self { Self }

    /// Validate every document against `scl`.
    pub fn validate(&self, scl: &SclIndex, docs: &[LoadedDocument]) -> StaticReport {
        let mut report = StaticReport {
            documents: docs.len(),
            checked_interactions: 0,
            checked_route_steps: 0,
            issues: Vec::new(),
            load_errors: Vec::new(),
        };

        for dup in scl.duplicates() {
            report.issues.push(
                Issue::new(
                    IssueKind::DuplicateSclFunction,
                    format!("{}::{}", dup.module_id, dup.function),
                )
                .with_detail(format!("declared {} times; last declaration wins", dup.occurrences)),
            );
        }

        for (token, paths) in duplicate_tokens(docs) {
            let files: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            report.issues.push(
                Issue::new(IssueKind::DuplicateTokenSymbol, &token)
                    .for_token(&token)
                    .with_detail(format!("declared by {}; lists are merged", files.join(", "))),
            );
        }

        for doc in docs {
            self.check_interactions(scl, doc, &mut report);
            self.check_routes(doc, &mut report);
        }

        report
    }

    fn check_interactions(&self, scl: &SclIndex, doc: &LoadedDocument, report: &mut StaticReport) {
        for (i, interaction) in doc.document.interactions.iter().enumerate() {
            let declared = (interaction.module_ref(), interaction.function_name());
            let (raw_module, function) = match declared {
                (None, None) => continue,
                (Some(m), Some(f)) => (m, f),
                (m, f) => {
                    report.issues.push(
                        Issue::new(
                            IssueKind::PartialModuleFunctionReference,
                            format!("interactions[{}]", i),
                        )
                        .for_token(&doc.token)
                        .with_detail(format!(
                            "{} declares module={:?} function={:?}",
                            interaction.key(),
                            m,
                            f
                        )),
                    );
                    continue;
                }
            };

            report.checked_interactions += 1;

            let module = match parse_module_ref(raw_module) {
                Ok(module) => module,
                Err(e) => {
                    report.issues.push(
                        Issue::new(IssueKind::MalformedReference, raw_module)
                            .for_token(&doc.token)
                            .with_detail(e.to_string()),
                    );
                    continue;
                }
            };

            let module_id = module.id();
            let function_id = module.function(function).id();

            // Both lookups are reported so the message names the failing one.
            if !scl.has_module(&module_id) {
                report.issues.push(
                    Issue::new(IssueKind::ModuleNotInScl, &module_id)
                        .for_token(&doc.token)
                        .with_detail(interaction.key().to_string()),
                );
            }
            match scl.get_function(&function_id) {
                None => report.issues.push(
                    Issue::new(IssueKind::FunctionNotInScl, &function_id)
                        .for_token(&doc.token)
                        .with_detail(interaction.key().to_string()),
                ),
                Some(info) if !info.is_entry => report.issues.push(
                    Issue::new(IssueKind::SclFunctionNotEntry, &function_id)
                        .for_token(&doc.token)
                        .with_detail(interaction.key().to_string()),
                ),
                Some(_) => {}
            }
        }
    }

    fn check_routes(&self, doc: &LoadedDocument, report: &mut StaticReport) {
        for (route, steps) in &doc.document.routes {
            for (i, step) in steps.iter().enumerate() {
                report.checked_route_steps += 1;
                let key = step.key();
                if !doc.document.has_interaction(&key) {
                    report.issues.push(
                        Issue::new(
                            IssueKind::RouteStepMissingInteraction,
                            format!("{}[{}]", route, i),
                        )
                        .for_token(&doc.token)
                        .with_detail(key.to_string()),
                    );
                }
            }
        }
    }
}

impl AuditPhase for StaticConsistencyValidator {
    fn name(&self) -> &str { "validate" }

    fn description(&self) -> &str {
        "Check interaction references against the SCL and route steps against interactions"
    }

    fn run(&self, ctx: &mut AuditContext) -> PhaseResult {
        let mut body = self.validate(&ctx.scl, &ctx.lists.documents);
        body.load_errors = ctx.lists.errors.clone();

        let issues = body.issue_count();
        let report = Report::new(OFFLINE_NETWORK, body);
        ctx.add_report(self.name(), serde_json::to_value(&report)?, issues);
        Ok(())
    }
}
