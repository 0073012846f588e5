mod common;

use analysis::{ChainClient, IssueKind, SclFetcher};
use common::{addr, dyn_transport, MockTransport};
use documents::SeedList;
use registry::SclReader;
use serde_json::json;

fn seed() -> SeedList {
    serde_json::from_value(json!({"protocols": [
        {"name": "Echelon", "addresses": [
            {"address": "0xEC"}, {"address": "not-an-address"}, {"label": "no address"}
        ]},
        {"name": "Other", "addresses": [{"address": "0x00ec"}, {"address": "0xdead"}]}
    ]}))
    .expect("valid seed")
}

#[test]
fn seed_addresses_are_filtered_deduplicated_and_sorted() {
    let mock = MockTransport::new().shared();
    let fetcher = SclFetcher::new(ChainClient::new(dyn_transport(mock)), 126).expect("pattern");

    let (accepted, rejected) = fetcher.seed_addresses(&seed());
    let keys: Vec<_> = accepted.keys().cloned().collect();
    assert_eq!(keys, vec![addr("0xec"), addr("0xdead")]);
    assert_eq!(accepted[&addr("0xec")], "Echelon");
    assert_eq!(rejected, vec!["not-an-address".to_string()]);
}

#[tokio::test]
async fn builds_scl_entries_and_skips_failed_addresses() {
    let mock = MockTransport::new()
        .ok(
            &format!("/accounts/{}/modules", addr("0xec")),
            json!([{"bytecode": "0x00", "abi": {
                "address": "0xec", "name": "lending_pool", "friends": ["0xec::admin"],
                "exposed_functions": [{"name": "supply", "visibility": "public", "is_entry": true,
                    "params": ["&signer", "u64"], "return": [], "generic_type_params": [{"constraints": []}],
                    "acquires": ["Pool"]}],
                "structs": [
                    {"name": "Pool", "abilities": ["key"], "fields": [{"name": "total", "type": "u64"}]},
                    {"name": "Receipt", "abilities": ["store", "drop"], "fields": []}
                ]
            }}]),
        )
        .status(&format!("/accounts/{}/modules", addr("0xdead")), 404)
        .shared();
    let fetcher = SclFetcher::new(ChainClient::new(dyn_transport(mock)), 126).expect("pattern");

    let (list, report) = fetcher.fetch(&seed()).await;

    assert_eq!(list.smart_contracts.len(), 1);
    let entry = &list.smart_contracts[0];
    assert_eq!(entry.chain_id, Some(126));
    assert_eq!(entry.address, addr("0xec"));
    assert_eq!(entry.module_name, "lending_pool");
    assert_eq!(entry.platform, "Echelon");
    assert_eq!(entry.name, "Echelon Lending Pool");
    assert_eq!(entry.functions[0].params.len(), 2);
    assert_eq!(entry.functions[0].generic_type_params.len(), 1);
    assert_eq!(entry.functions[0].extra["acquires"], json!(["Pool"]));
    assert_eq!(entry.functions[0].extra["auditors"], json!([]));
    assert!(entry.structs[0].is_resource);
    assert!(!entry.structs[1].is_resource);
    assert_eq!(entry.extensions["friends"], json!(["0xec::admin"]));
    assert_eq!(list.version.map(|v| v.major), Some(1));

    assert_eq!(report.addresses, 2);
    assert_eq!(report.modules, 1);
    assert_eq!(report.functions, 1);
    assert_eq!(report.fetch_errors.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::AccountModulesFetchFailed);

    // The generated list loads back through the registry index.
    let index = registry::SclIndex::from_list(&list);
    assert!(index.has_module(&types::module_id("0xec", "lending_pool")));
}
