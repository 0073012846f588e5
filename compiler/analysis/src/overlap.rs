//! Overlap and reachability reporting over the interaction lists.

use std::collections::{BTreeMap, BTreeSet};

use registry::LoadedDocument;
use serde::Serialize;

use crate::report::{Report, ReportBody, OFFLINE_NETWORK};
use crate::{AuditContext, AuditPhase, PhaseResult};

/// A route named in one token's document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RouteRef {
    /// Owning token
    pub token: String,
    /// Route name
    pub route: String,
}

/// A step sequence used by routes of more than one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedRoute {
    /// `type/platform` per step
    pub steps: Vec<String>,
    /// Routes with exactly this sequence
    pub routes: Vec<RouteRef>,
}

/// Body of `overlap-report.json`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapReport {
    /// Platforms each token can reach
    pub token_platforms: BTreeMap<String, BTreeSet<String>>,
    /// Tokens each platform serves
    pub platform_tokens: BTreeMap<String, BTreeSet<String>>,
    /// Identical step sequences shared across tokens
    pub shared_routes: Vec<SharedRoute>,
    /// Routes defined in total
    pub routes: usize,
    /// Route steps without a same-document interaction
    pub unreachable_steps: usize,
}

impl ReportBody for OverlapReport {
    fn counts(&self) -> BTreeMap<String, usize> {
        BTreeMap::from([
            ("tokens".to_string(), self.token_platforms.len()),
            ("platforms".to_string(), self.platform_tokens.len()),
            ("routes".to_string(), self.routes),
            ("sharedRoutes".to_string(), self.shared_routes.len()),
            ("unreachableSteps".to_string(), self.unreachable_steps),
        ])
    }

    // Analytics only; nothing here gates a run.
    fn issue_count(&self) -> usize { 0 }
}

/// Token/platform graph and route-sharing reporter
pub struct OverlapReporter;

impl Default for OverlapReporter {
    fn default() -> Self { Self::new() }
}

impl OverlapReporter {
    /// Create a new reporter
    pub fn new() -> Self { Self }

    /// Build the report from loaded documents.
    pub fn analyze(&self, docs: &[LoadedDocument]) -> OverlapReport {
        let mut report = OverlapReport::default();
        let mut by_sequence: BTreeMap<Vec<String>, BTreeSet<RouteRef>> = BTreeMap::new();

        for doc in docs {
            let platforms = report.token_platforms.entry(doc.token.clone()).or_default();
            for interaction in &doc.document.interactions {
                let platform = interaction.platform.trim();
                if platform.is_empty() {
                    continue;
                }
                platforms.insert(platform.to_string());
                report
                    .platform_tokens
                    .entry(platform.to_string())
                    .or_default()
                    .insert(doc.token.clone());
            }

            for (route, steps) in &doc.document.routes {
                report.routes += 1;
                let mut sequence = Vec::with_capacity(steps.len());
                for step in steps {
                    let key = step.key();
                    if !doc.document.has_interaction(&key) {
                        report.unreachable_steps += 1;
                    }
                    sequence.push(key.to_string());
                }
                by_sequence
                    .entry(sequence)
                    .or_default()
                    .insert(RouteRef { token: doc.token.clone(), route: route.clone() });
            }
        }

        report.shared_routes = by_sequence
            .into_iter()
            .filter(|(steps, routes)| {
                let tokens: BTreeSet<&String> = routes.iter().map(|r| &r.token).collect();
                !steps.is_empty() && tokens.len() > 1
            })
            .map(|(steps, routes)| SharedRoute { steps, routes: routes.into_iter().collect() })
            .collect();

        report
    }
}

impl AuditPhase for OverlapReporter {
    fn name(&self) -> &str { "overlap" }

    fn description(&self) -> &str { "Token/platform reachability and route sharing" }

    fn run(&self, ctx: &mut AuditContext) -> PhaseResult {
        let body = self.analyze(&ctx.lists.documents);
        let report = Report::new(OFFLINE_NETWORK, body);
        ctx.add_report(self.name(), serde_json::to_value(&report)?, 0);
        Ok(())
    }
}
