mod common;

use analysis::{AuditContext, AuditPhase, IssueKind, ProtocolMatrixValidator};
use common::{doc, lists, scl};
use documents::ProtocolMatrix;
use serde_json::json;

fn matrix(value: serde_json::Value) -> ProtocolMatrix {
    serde_json::from_value(value).expect("valid matrix")
}

fn echelon_usdc() -> registry::LoadedInteractionLists {
    lists(vec![doc("USDC", json!({
        "token": {"symbol": "usdc"},
        "interactions": [
            {"type": "lend", "platform": "Echelon", "module": "0x1::lending", "function": "supply_v1"},
            {"type": "lend", "platform": "Echelon",
             "module": "0x0000000000000000000000000000000000000000000000000000000000000001::lending",
             "function": "supply"}
        ],
        "routes": {
            "swapThenLend": [{"type": "swap", "platform": "Mosaic"}, {"type": "lend", "platform": "Echelon"}],
            "stakeOnly": [{"type": "stake", "platform": "Echo"}]
        }
    }))])
}

#[test]
fn any_matching_interaction_satisfies_the_mapping() {
    let m = matrix(json!({"protocols": [{"name": "Echelon", "interactions": [
        {"type": "lend", "module": "0x1::lending", "function": "supply",
         "tokens": ["USDC"], "routeKeys": ["swapThenLend", "notDefinedHere"]}
    ]}]}));

    let report = ProtocolMatrixValidator::new().validate(&m, &echelon_usdc());
    assert_eq!(report.checked_pairs, 1);
    assert!(report.issues.is_empty(), "unexpected issues: {:?}", report.issues);
}

#[test]
fn missing_token_is_reported_once_and_short_circuits() {
    let m = matrix(json!({"protocols": [{"name": "Echelon", "interactions": [
        {"type": "lend", "module": "0x1::lending", "function": "supply",
         "tokens": ["WETH"], "routeKeys": ["swapThenLend"]}
    ]}]}));

    let report = ProtocolMatrixValidator::new().validate(&m, &echelon_usdc());
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::TokenMissingFromIl);
    assert_eq!(report.issues[0].token.as_deref(), Some("WETH"));
}

#[test]
fn no_matching_interaction_and_route_step_missing() {
    let m = matrix(json!({"protocols": [{"name": "Echo", "interactions": [
        {"type": "stake", "module": "0x2::staking", "function": "stake",
         "tokens": ["usdc"], "routeKeys": ["swapThenLend"]}
    ]}]}));

    let report = ProtocolMatrixValidator::new().validate(&m, &echelon_usdc());
    let kinds: Vec<_> = report.issues.iter().map(|i| i.kind.clone()).collect();
    assert_eq!(kinds, vec![IssueKind::NoMatchingInteraction, IssueKind::RouteMissingExpectedStep]);
    assert_eq!(report.issues[1].subject, "swapThenLend");
}

#[test]
fn module_function_mismatch_when_no_match_binds_expected_pair() {
    let m = matrix(json!({"protocols": [{"name": "Echelon", "interactions": [
        {"type": "lend", "module": "0x1::lending", "function": "deposit", "tokens": ["USDC"]}
    ]}]}));

    let report = ProtocolMatrixValidator::new().validate(&m, &echelon_usdc());
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::ModuleFunctionMismatch);
    assert!(report.issues[0].detail.contains("expected 0x1::lending::deposit"));
}

#[test]
fn phase_requires_a_matrix() {
    let mut ctx = AuditContext::new(scl(json!({})), echelon_usdc());
    assert!(ProtocolMatrixValidator::new().run(&mut ctx).is_err());

    let m = matrix(json!({"protocols": [{"name": "Echelon", "interactions": [
        {"type": "lend", "module": "0x1::lending", "function": "supply", "tokens": ["USDC"]}
    ]}]}));
    let mut ctx = AuditContext::new(scl(json!({})), echelon_usdc()).with_matrix(m);
    ProtocolMatrixValidator::new().run(&mut ctx).expect("phase runs");
    assert_eq!(ctx.diagnostics.reports["matrix"]["counts"]["mappings"], 1);
}

#[test]
fn lists_sharing_a_symbol_are_checked_together() {
    let split = |path: &str, value: serde_json::Value| {
        registry::LoadedDocument::new(path, serde_json::from_value(value).expect("valid IL"))
    };
    let usdc = lists(vec![
        split("a_usdc.json", json!({
            "token": {"symbol": "USDC"},
            "interactions": [{"type": "swap", "platform": "Thala"}]
        })),
        split("b_usdc.json", json!({
            "token": {"symbol": "USDC"},
            "interactions": [
                {"type": "lend", "platform": "Echelon", "module": "0x1::lending", "function": "supply"}
            ],
            "routes": {"swapThenLend": [
                {"type": "swap", "platform": "Thala"}, {"type": "lend", "platform": "Echelon"}
            ]}
        })),
    ]);
    assert_eq!(usdc.by_token("usdc").len(), 2);

    let m = matrix(json!({"protocols": [{"name": "Echelon", "interactions": [
        {"type": "lend", "module": "0x1::lending", "function": "supply",
         "tokens": ["USDC"], "routeKeys": ["swapThenLend"]}
    ]}]}));

    let report = ProtocolMatrixValidator::new().validate(&m, &usdc);
    assert_eq!(report.checked_pairs, 1);
    assert!(report.issues.is_empty(), "unexpected issues: {:?}", report.issues);
}
