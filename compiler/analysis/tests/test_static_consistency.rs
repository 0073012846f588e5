mod common;

use analysis::{AuditContext, AuditPhase, IssueKind, StaticConsistencyValidator};
use common::{doc, lists, scl};
use serde_json::json;
use types::{function_id, module_id};

fn coin_scl() -> registry::SclIndex {
    scl(json!({"smartContracts": [{
        "address": "0x1", "moduleName": "coin",
        "functions": [
            {"name": "transfer", "is_entry": true, "params": ["&signer", "address", "u64"]},
            {"name": "balance", "is_entry": false, "params": ["address"]}
        ]
    }]}))
}

#[test]
fn module_and_function_lookups_are_reported_independently() {
    let docs = vec![doc("USDC", json!({"interactions": [
        {"type": "send", "platform": "Wallet", "module": "0x1::coin", "function": "transfer"},
        {"type": "send", "platform": "Wallet", "module": "0x1::coin", "function": "missing"},
        {"type": "lend", "platform": "Echelon", "module": "0x2::lending", "function": "supply"}
    ]}))];

    let report = StaticConsistencyValidator::new().validate(&coin_scl(), &docs);
    let kinds: Vec<(&IssueKind, &str)> =
        report.issues.iter().map(|i| (&i.kind, i.subject.as_str())).collect();

    let missing_fn = function_id("0x1", "coin", "missing");
    let lending = module_id("0x2", "lending");
    let supply = function_id("0x2", "lending", "supply");
    assert_eq!(
        kinds,
        vec![
            (&IssueKind::FunctionNotInScl, missing_fn.as_str()),
            (&IssueKind::ModuleNotInScl, lending.as_str()),
            (&IssueKind::FunctionNotInScl, supply.as_str()),
        ]
    );
    assert_eq!(report.checked_interactions, 3);
}

#[test]
fn padded_and_short_addresses_resolve_to_the_same_module() {
    let padded = format!("0x{}1::coin", "0".repeat(63));
    let docs = vec![doc("USDC", json!({"interactions": [
        {"type": "send", "platform": "Wallet", "module": padded, "function": "transfer"}
    ]}))];

    let report = StaticConsistencyValidator::new().validate(&coin_scl(), &docs);
    assert!(report.issues.is_empty(), "unexpected issues: {:?}", report.issues);
}

#[test]
fn descriptive_interactions_are_skipped_and_partial_ones_flagged() {
    let docs = vec![doc("MOVE", json!({"interactions": [
        {"type": "info", "platform": "Docs"},
        {"type": "stake", "platform": "Echo", "module": "0x1::coin"},
        {"type": "stake", "platform": "Echo", "function": "stake", "module": "  "}
    ]}))];

    let report = StaticConsistencyValidator::new().validate(&coin_scl(), &docs);
    assert_eq!(report.checked_interactions, 0);
    assert_eq!(report.issues.len(), 2);
    assert!(report.issues.iter().all(|i| i.kind == IssueKind::PartialModuleFunctionReference));
    assert_eq!(report.issues[0].token.as_deref(), Some("MOVE"));
}

#[test]
fn non_entry_and_malformed_references_are_reported() {
    let docs = vec![doc("USDC", json!({"interactions": [
        {"type": "view", "platform": "Wallet", "module": "0x1::coin", "function": "balance"},
        {"type": "swap", "platform": "Mosaic", "module": "router", "function": "swap"}
    ]}))];

    let report = StaticConsistencyValidator::new().validate(&coin_scl(), &docs);
    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.issues[0].kind, IssueKind::SclFunctionNotEntry);
    assert_eq!(report.issues[1].kind, IssueKind::MalformedReference);
}

#[test]
fn route_step_without_same_document_interaction() {
    let usdc = doc("USDC", json!({
        "interactions": [{"type": "swap", "platform": "Thala"}],
        "routes": {"swapThenStake": [
            {"type": "swap", "platform": "Thala"},
            {"type": "stake", "platform": "Echo"}
        ]}
    }));
    // Another token's interaction never satisfies the route.
    let moveth = doc("MOVE", json!({"interactions": [{"type": "stake", "platform": "Echo"}]}));

    let report = StaticConsistencyValidator::new().validate(&coin_scl(), &[usdc, moveth]);
    assert_eq!(report.checked_route_steps, 2);
    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.kind, IssueKind::RouteStepMissingInteraction);
    assert_eq!(issue.subject, "swapThenStake[1]");
    assert_eq!(issue.detail, "stake/Echo");
    assert_eq!(issue.token.as_deref(), Some("USDC"));
}

#[test]
fn duplicate_scl_functions_are_data_quality_issues() {
    let index = scl(json!({"smartContracts": [{
        "address": "0x1", "moduleName": "coin",
        "functions": [{"name": "transfer"}, {"name": "transfer", "is_entry": true}]
    }]}));

    let report = StaticConsistencyValidator::new().validate(&index, &[]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::DuplicateSclFunction);
}

#[test]
fn phase_records_report_with_load_errors() {
    let mut loaded = lists(vec![doc("USDC", json!({"interactions": [
        {"type": "send", "platform": "Wallet", "module": "0x1::vault", "function": "deposit"}
    ]}))]);
    loaded.errors.push(registry::FileLoadError {
        path: "broken.json".into(),
        message: "expected value".into(),
    });

    let mut ctx = AuditContext::new(coin_scl(), loaded);
    StaticConsistencyValidator::new().run(&mut ctx).expect("phase runs");

    let report = &ctx.diagnostics.reports["validate"];
    assert_eq!(report["network"], "offline");
    assert_eq!(report["counts"]["module_not_in_scl"], 1);
    assert_eq!(report["counts"]["loadErrors"], 1);
    assert_eq!(report["loadErrors"][0]["path"], "broken.json");
    assert_eq!(ctx.diagnostics.issue_count, 2);
}

#[test]
fn token_declared_by_two_lists_is_reported() {
    let docs = vec![
        registry::LoadedDocument::new(
            "a_usdc.json",
            serde_json::from_value(json!({"token": {"symbol": "USDC"}})).expect("valid IL"),
        ),
        registry::LoadedDocument::new(
            "b_usdc.json",
            serde_json::from_value(json!({"token": {"symbol": "usdc"}})).expect("valid IL"),
        ),
        doc("MOVE", json!({})),
    ];

    let report = StaticConsistencyValidator::new().validate(&coin_scl(), &docs);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::DuplicateTokenSymbol);
    assert_eq!(report.issues[0].subject, "USDC");
    let detail = &report.issues[0].detail;
    assert!(detail.contains("a_usdc.json") && detail.contains("b_usdc.json"), "{}", detail);
}
