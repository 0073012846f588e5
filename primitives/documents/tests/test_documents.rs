use documents::{from_file, to_file, SmartContractList};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn scl_rewrite_preserves_uninterpreted_fields() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("scl.json");
    let raw = json!({
        "name": "FiHub Movement Smart Contract List",
        "logoURI": "ipfs://logo",
        "version": {"major": 1, "minor": 0, "patch": 3},
        "smartContracts": [{
            "chainId": 1,
            "address": "0x1",
            "moduleName": "coin",
            "platform": "Movement",
            "functions": [{"name": "transfer", "visibility": "public", "is_entry": true,
                           "params": ["&signer", "address", "u64"], "return": [],
                           "audited": false}],
            "extensions": {"audited": false, "friends": []},
            "security": {"auditScore": 90}
        }]
    });
    std::fs::write(&path, raw.to_string()).expect("write fixture");

    let scl: SmartContractList = from_file(&path).expect("parse scl");
    assert_eq!(scl.smart_contracts.len(), 1);
    assert_eq!(scl.function_count(), 1);
    assert!(scl.smart_contracts[0].functions[0].is_entry);
    assert_eq!(scl.version.map(|v| v.patch), Some(3));

    let out = dir.path().join("nested").join("out.json");
    to_file(&scl, &out).expect("write scl");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("read back")).expect("json");
    assert_eq!(written["logoURI"], "ipfs://logo");
    assert_eq!(written["smartContracts"][0]["security"]["auditScore"], 90);
    assert_eq!(written["smartContracts"][0]["functions"][0]["audited"], false);
}

#[test]
fn from_file_reports_invalid_json() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").expect("write fixture");
    assert!(from_file::<SmartContractList>(&path).is_err());
}
