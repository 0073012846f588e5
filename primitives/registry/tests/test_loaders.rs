use std::fs;

use registry::{
    index_interactions, load_interaction_lists, load_scl, LoadMode, RegistryError, SclReader,
};
use serde_json::json;
use tempfile::TempDir;
use types::module_id;

fn write(dir: &std::path::Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
}

#[test]
fn load_scl_uses_fallback_when_primary_missing() {
    let tmp = TempDir::new().expect("tempdir");
    let fallback = tmp.path().join("generated.json");
    write(
        tmp.path(),
        "generated.json",
        &json!({"smartContracts": [{"address": "0x1", "moduleName": "coin"}]}).to_string(),
    );

    let index =
        load_scl(&tmp.path().join("missing.json"), Some(&fallback)).expect("fallback loads");
    assert!(index.has_module(&module_id("0x1", "coin")));
    assert_eq!(index.source(), Some(fallback.as_path()));
}

#[test]
fn load_scl_not_found() {
    let tmp = TempDir::new().expect("tempdir");
    let err = load_scl(&tmp.path().join("a.json"), Some(&tmp.path().join("b.json")))
        .expect_err("nothing to load");
    assert!(matches!(err, RegistryError::SclNotFound { .. }));
}

#[test]
fn load_scl_surfaces_parse_error() {
    let tmp = TempDir::new().expect("tempdir");
    write(tmp.path(), "scl.json", "{\"smartContracts\": [");
    let err = load_scl(&tmp.path().join("scl.json"), None).expect_err("invalid json");
    match err {
        RegistryError::SclParse { path, .. } => assert!(path.ends_with("scl.json")),
        other => panic!("expected SclParse, got {:?}", other),
    }
}

#[test]
fn tolerant_load_skips_bad_files_in_name_order() {
    let tmp = TempDir::new().expect("tempdir");
    write(tmp.path(), "b_usdc.json", &json!({"token": {"symbol": "USDC"}}).to_string());
    write(tmp.path(), "a_move.json", &json!({"interactions": []}).to_string());
    write(tmp.path(), "c_broken.json", "not json");
    write(tmp.path(), "notes.txt", "ignored");

    let loaded = load_interaction_lists(tmp.path(), LoadMode::Tolerant).expect("dir exists");
    let tokens: Vec<_> = loaded.documents.iter().map(|d| d.token.as_str()).collect();
    assert_eq!(tokens, vec!["A_MOVE", "USDC"]);
    assert_eq!(loaded.errors.len(), 1);
    assert!(loaded.errors[0].path.ends_with("c_broken.json"));
    assert_eq!(loaded.by_token("usdc").len(), 1);
    assert!(loaded.duplicate_tokens().is_empty());
}

#[test]
fn atomic_load_fails_on_bad_file() {
    let tmp = TempDir::new().expect("tempdir");
    write(tmp.path(), "ok.json", "{}");
    write(tmp.path(), "zz.json", "[1,");

    let err = load_interaction_lists(tmp.path(), LoadMode::Atomic).expect_err("atomic");
    assert!(matches!(err, RegistryError::DocumentParse { .. }));
}

#[test]
fn missing_directory_is_fatal() {
    let tmp = TempDir::new().expect("tempdir");
    let err = load_interaction_lists(&tmp.path().join("nope"), LoadMode::Tolerant)
        .expect_err("missing dir");
    assert!(matches!(err, RegistryError::InteractionDirNotFound(_)));
}

#[test]
fn index_over_loaded_directory() {
    let tmp = TempDir::new().expect("tempdir");
    write(
        tmp.path(),
        "usdc.json",
        &json!({"interactions": [
            {"type": "lend", "platform": "Echelon", "module": "0x1::lending", "function": "supply"}
        ]})
        .to_string(),
    );

    let loaded = load_interaction_lists(tmp.path(), LoadMode::Tolerant).expect("load");
    let index = index_interactions(&loaded.documents);
    assert_eq!(index.modules.len(), 1);
    assert_eq!(index.functions.len(), 1);
    assert!(index.by_token.contains_key("USDC"));
}

#[test]
fn null_routes_do_not_drop_the_document() {
    let tmp = TempDir::new().expect("tempdir");
    write(
        tmp.path(),
        "move.json",
        &json!({
            "token": {"symbol": "MOVE"},
            "interactions": [{"type": "stake", "platform": "Echo", "module": "0x1::stake", "function": "add"}],
            "routes": null
        })
        .to_string(),
    );

    let loaded = load_interaction_lists(tmp.path(), LoadMode::Tolerant).expect("load");
    assert!(loaded.errors.is_empty(), "unexpected errors: {:?}", loaded.errors);
    assert_eq!(loaded.documents.len(), 1);
    assert_eq!(loaded.documents[0].document.interactions.len(), 1);
}
