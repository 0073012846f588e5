//! Param-Arity Audit
//!
//! Compares the argument count an interaction sends with the parameter
//! count its SCL function declares. The interaction's own count is resolved
//! by an ordered list of strategies; the first one that yields a value wins.

use std::collections::BTreeMap;
use std::fmt;

use documents::{Interaction, ParamMatrix};
use registry::{LoadedDocument, SclIndex, SclReader};
use serde::Serialize;
use types::parse_module_ref;

use crate::report::{count_by_kind, Issue, IssueKind, Report, ReportBody, OFFLINE_NETWORK};
use crate::{AuditContext, AuditPhase, PhaseResult};

/// Where a resolved argument count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AritySource {
    /// The interaction's `params` or `arguments.schema`
    Explicit,
    /// Matrix override for `(type, platform)`
    Override,
    /// Matrix default for `type`
    Default,
    /// The SCL count itself; the comparison is a no-op
    SclDeclared,
}

impl fmt::Display for AritySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AritySource::Explicit => "explicit",
            AritySource::Override => "override",
            AritySource::Default => "default",
            AritySource::SclDeclared => "scl_declared",
        };
        f.write_str(s)
    }
}

/// Inputs available to a resolution strategy.
#[derive(Debug, Clone, Copy)]
pub struct ArityInput<'a> {
    /// Interaction under audit
    pub interaction: &'a Interaction,
    /// Parameter count declared by the SCL function
    pub scl_param_count: usize,
    /// Arity matrix, under the matrix policy
    pub matrix: Option<&'a ParamMatrix>,
}

/// A resolution strategy: `Some(count)` when it has an opinion.
pub type Strategy = fn(&ArityInput<'_>) -> Option<usize>;

/// Count the interaction declares itself.
pub fn explicit_count(input: &ArityInput<'_>) -> Option<usize> {
    input.interaction.declared_arg_count()
}

/// Matrix override for the interaction's `(type, platform)`.
pub fn override_count(input: &ArityInput<'_>) -> Option<usize> {
    input
        .matrix
        .and_then(|m| m.override_for(&input.interaction.kind, &input.interaction.platform))
}

/// Matrix default for the interaction's `type`.
pub fn default_count(input: &ArityInput<'_>) -> Option<usize> {
    input.matrix.and_then(|m| m.default_for(&input.interaction.kind))
}

/// The SCL's own count. Always resolves.
pub fn scl_declared_count(input: &ArityInput<'_>) -> Option<usize> { Some(input.scl_param_count) }

static MATRIX_STRATEGIES: [(AritySource, Strategy); 4] = [
    (AritySource::Explicit, explicit_count),
    (AritySource::Override, override_count),
    (AritySource::Default, default_count),
    (AritySource::SclDeclared, scl_declared_count),
];

static SELF_DECLARED_STRATEGIES: [(AritySource, Strategy); 2] =
    [(AritySource::Explicit, explicit_count), (AritySource::SclDeclared, scl_declared_count)];

/// Which resolution chain a run uses. Exactly one is active per run.
#[derive(Debug, Clone)]
pub enum ArityPolicy {
    /// Explicit, then matrix override, then matrix default, then SCL
    Matrix(ParamMatrix),
    /// Explicit, then SCL
    SelfDeclared,
}

impl ArityPolicy {
    /// Policy name written into the report.
    pub fn name(&self) -> &'static str {
        match self {
            ArityPolicy::Matrix(_) => "matrix",
            ArityPolicy::SelfDeclared => "self_declared",
        }
    }

    /// Strategies in priority order.
    pub fn strategies(&self) -> &'static [(AritySource, Strategy)] {
        match self {
            ArityPolicy::Matrix(_) => &MATRIX_STRATEGIES,
            ArityPolicy::SelfDeclared => &SELF_DECLARED_STRATEGIES,
        }
    }

    fn matrix(&self) -> Option<&ParamMatrix> {
        match self {
            ArityPolicy::Matrix(m) => Some(m),
            ArityPolicy::SelfDeclared => None,
        }
    }

    /// Resolve the interaction's argument count, short-circuiting on the
    /// first strategy that answers.
    pub fn resolve(
        &self,
        interaction: &Interaction,
        scl_param_count: usize,
    ) -> (usize, AritySource) {
        let input = ArityInput { interaction, scl_param_count, matrix: self.matrix() };
        self.strategies()
            .iter()
            .find_map(|(source, strategy)| strategy(&input).map(|count| (count, *source)))
            .unwrap_or((scl_param_count, AritySource::SclDeclared))
    }
}

/// One compared interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArityCheck {
    /// Owning token
    pub token: String,
    /// Canonical function id
    pub function_id: String,
    /// Interaction kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Interaction platform
    pub platform: String,
    /// SCL-declared parameter count
    pub expected: usize,
    /// Resolved interaction count
    pub our: usize,
    /// Strategy that produced `our`
    pub source: AritySource,
    /// `expected == our`
    pub ok: bool,
}

/// Body of `arity-report.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamArityReport {
    /// Policy the run used
    pub policy: String,
    /// Every compared interaction
    pub checks: Vec<ArityCheck>,
    /// Itemized findings
    pub issues: Vec<Issue>,
}

impl ReportBody for ParamArityReport {
    fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = count_by_kind(&self.issues);
        counts.insert("checked".into(), self.checks.len());
        counts.insert("ok".into(), self.checks.iter().filter(|c| c.ok).count());
        counts.insert("issues".into(), self.issues.len());
        for source in [
            AritySource::Explicit,
            AritySource::Override,
            AritySource::Default,
            AritySource::SclDeclared,
        ] {
            let n = self.checks.iter().filter(|c| c.source == source).count();
            counts.insert(format!("source_{}", source), n);
        }
        counts
    }

    fn issue_count(&self) -> usize { self.issues.len() }
}

/// Argument-count auditor
pub struct ParamArityAuditor {
    policy: ArityPolicy,
}

impl ParamArityAuditor {
    /// Create an auditor running `policy`
    pub fn new(policy: ArityPolicy) -> Self { Self { policy } }

    /// Active policy
    pub fn policy(&self) -> &ArityPolicy { &self.policy }

    /// Audit every interaction that names both a module and a function.
    pub fn audit(&self, scl: &SclIndex, docs: &[LoadedDocument]) -> ParamArityReport {
        let mut report = ParamArityReport {
            policy: self.policy.name().to_string(),
            checks: Vec::new(),
            issues: Vec::new(),
        };

        for doc in docs {
            for interaction in &doc.document.interactions {
                let (Some(raw_module), Some(function)) =
                    (interaction.module_ref(), interaction.function_name())
                else {
                    continue;
                };
                // Malformed references are the static validator's finding.
                let Ok(module) = parse_module_ref(raw_module) else { continue };
                let function_id = module.function(function).id();

                let Some(info) = scl.get_function(&function_id) else {
                    report.issues.push(
                        Issue::new(IssueKind::SclFunctionMissing, &function_id)
                            .for_token(&doc.token)
                            .with_detail(interaction.key().to_string()),
                    );
                    continue;
                };

                let expected = info.param_count;
                let (our, source) = self.policy.resolve(interaction, expected);
                if expected != our {
                    report.issues.push(
                        Issue::new(IssueKind::ParamCountMismatch { expected, our }, &function_id)
                            .for_token(&doc.token)
                            .with_detail(format!("{} ({})", interaction.key(), source)),
                    );
                }
                report.checks.push(ArityCheck {
                    token: doc.token.clone(),
                    function_id,
                    kind: interaction.kind.clone(),
                    platform: interaction.platform.clone(),
                    expected,
                    our,
                    source,
                    ok: expected == our,
                });
            }
        }

        report
    }
}

impl AuditPhase for ParamArityAuditor {
    fn name(&self) -> &str { "arity" }

    fn description(&self) -> &str {
        "Compare interaction argument counts with SCL function parameter counts"
    }

    fn run(&self, ctx: &mut AuditContext) -> PhaseResult {
        tracing::info!("arity audit using the {} policy", self.policy.name());
        let body = self.audit(&ctx.scl, &ctx.lists.documents);
        let issues = body.issue_count();
        let report = Report::new(OFFLINE_NETWORK, body);
        ctx.add_report(self.name(), serde_json::to_value(&report)?, issues);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn interaction(value: serde_json::Value) -> Interaction {
        serde_json::from_value(value).expect("valid interaction")
    }

    fn matrix() -> ParamMatrix {
        serde_json::from_value(json!({
            "defaults": [{"type": "lend", "expectedArgCount": 4}],
            "overrides": [{"type": "lend", "platform": "Echelon", "expectedArgCount": 5}]
        }))
        .expect("valid matrix")
    }

    #[test]
    fn explicit_params_win_over_matrix() {
        let i = interaction(json!({"type": "lend", "platform": "Echelon", "params": ["a", "b"]}));
        assert_eq!(ArityPolicy::Matrix(matrix()).resolve(&i, 3), (2, AritySource::Explicit));
    }

    #[test]
    fn arguments_schema_counts_as_explicit() {
        let i = interaction(json!({"type": "lend", "platform": "Echelon",
                                   "arguments": {"schema": [{}, {}, {}]}}));
        assert_eq!(ArityPolicy::SelfDeclared.resolve(&i, 1), (3, AritySource::Explicit));
    }

    #[test]
    fn override_then_default_then_scl() {
        let policy = ArityPolicy::Matrix(matrix());
        let echelon = interaction(json!({"type": "lend", "platform": "Echelon"}));
        let aries = interaction(json!({"type": "lend", "platform": "Aries"}));
        let swap = interaction(json!({"type": "swap", "platform": "Mosaic"}));

        assert_eq!(policy.resolve(&echelon, 3), (5, AritySource::Override));
        assert_eq!(policy.resolve(&aries, 3), (4, AritySource::Default));
        assert_eq!(policy.resolve(&swap, 3), (3, AritySource::SclDeclared));
    }

    #[test]
    fn self_declared_policy_ignores_matrix_values() {
        let echelon = interaction(json!({"type": "lend", "platform": "Echelon"}));
        assert_eq!(ArityPolicy::SelfDeclared.resolve(&echelon, 3), (3, AritySource::SclDeclared));
        assert_eq!(ArityPolicy::SelfDeclared.name(), "self_declared");
        assert_eq!(ArityPolicy::Matrix(matrix()).strategies().len(), 4);
    }

    #[test]
    fn strategies_are_independent_functions() {
        let i = interaction(json!({"type": "lend", "platform": "Echelon"}));
        let m = matrix();
        let input = ArityInput { interaction: &i, scl_param_count: 7, matrix: Some(&m) };
        assert_eq!(explicit_count(&input), None);
        assert_eq!(override_count(&input), Some(5));
        assert_eq!(default_count(&input), Some(4));
        assert_eq!(scl_declared_count(&input), Some(7));

        let bare = ArityInput { matrix: None, ..input };
        assert_eq!(override_count(&bare), None);
        assert_eq!(default_count(&bare), None);
    }
}
