mod common;

use analysis::{ArityPolicy, AritySource, AuditContext, AuditPhase, IssueKind, ParamArityAuditor};
use common::{doc, lists, scl};
use documents::ParamMatrix;
use serde_json::json;
use types::function_id;

fn transfer_scl() -> registry::SclIndex {
    scl(json!({"smartContracts": [{
        "address": "0x1", "moduleName": "coin",
        "functions": [{"name": "transfer", "is_entry": true,
                       "params": ["&signer", "address", "u64"]}]
    }]}))
}

fn param_matrix() -> ParamMatrix {
    serde_json::from_value(json!({
        "defaults": [{"type": "send", "expectedArgCount": 3}],
        "overrides": [{"type": "send", "platform": "Wallet", "expectedArgCount": 9}]
    }))
    .expect("valid matrix")
}

#[test]
fn explicit_params_mismatch_the_scl_arity() {
    let docs = vec![doc("USDC", json!({"interactions": [
        {"type": "send", "platform": "Wallet", "module": "0x1::coin", "function": "transfer",
         "params": ["recipient", "amount"]}
    ]}))];

    // Explicit params win even though the matrix override says 9.
    let auditor = ParamArityAuditor::new(ArityPolicy::Matrix(param_matrix()));
    let report = auditor.audit(&transfer_scl(), &docs);

    assert_eq!(report.policy, "matrix");
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::ParamCountMismatch { expected: 3, our: 2 });
    assert_eq!(report.issues[0].subject, function_id("0x1", "coin", "transfer"));
    assert_eq!(report.checks[0].source, AritySource::Explicit);
    assert!(!report.checks[0].ok);
}

#[test]
fn bottoming_out_at_scl_count_is_a_pass() {
    let docs = vec![doc("USDC", json!({"interactions": [
        {"type": "send", "platform": "Wallet", "module": "0x1::coin", "function": "transfer"}
    ]}))];

    let report = ParamArityAuditor::new(ArityPolicy::SelfDeclared).audit(&transfer_scl(), &docs);
    assert_eq!(report.policy, "self_declared");
    assert!(report.issues.is_empty());
    assert_eq!(report.checks[0].source, AritySource::SclDeclared);
    assert!(report.checks[0].ok);
}

#[test]
fn matrix_override_is_compared() {
    let docs = vec![doc("USDC", json!({"interactions": [
        {"type": "send", "platform": "Wallet", "module": "0x1::coin", "function": "transfer"}
    ]}))];

    let report =
        ParamArityAuditor::new(ArityPolicy::Matrix(param_matrix())).audit(&transfer_scl(), &docs);
    assert_eq!(report.issues[0].kind, IssueKind::ParamCountMismatch { expected: 3, our: 9 });
    assert_eq!(report.checks[0].source, AritySource::Override);
}

#[test]
fn missing_scl_function_skips_comparison() {
    let docs = vec![doc("USDC", json!({"interactions": [
        {"type": "send", "platform": "Wallet", "module": "0x1::coin", "function": "burn",
         "params": []}
    ]}))];

    let report = ParamArityAuditor::new(ArityPolicy::SelfDeclared).audit(&transfer_scl(), &docs);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::SclFunctionMissing);
    assert!(report.checks.is_empty());
}

#[test]
fn phase_reports_the_policy_used() {
    let loaded = lists(vec![doc("USDC", json!({"interactions": [
        {"type": "send", "platform": "Wallet", "module": "0x1::coin", "function": "transfer",
         "params": ["a", "b"]}
    ]}))]);
    let mut ctx = AuditContext::new(transfer_scl(), loaded);
    ParamArityAuditor::new(ArityPolicy::SelfDeclared).run(&mut ctx).expect("phase runs");

    let report = &ctx.diagnostics.reports["arity"];
    assert_eq!(report["policy"], "self_declared");
    assert_eq!(report["issues"][0]["kind"], "param_count_mismatch");
    assert_eq!(report["issues"][0]["expected"], 3);
    assert_eq!(report["issues"][0]["our"], 2);
    assert_eq!(report["counts"]["source_explicit"], 1);
}
