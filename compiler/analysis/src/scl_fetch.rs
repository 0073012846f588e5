//! SCL generation from a seed list of protocol addresses.
//!
//! Each seed address is asked for its published modules and every module
//! becomes one SCL entry. Failed addresses are reported and skipped.

use std::collections::{BTreeMap, BTreeSet};

use documents::{
    FunctionDescriptor, ListVersion, ModuleAbi, MoveStruct, SeedList, SmartContractEntry,
    SmartContractList, StructDescriptor,
};
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use types::normalize_address;

use crate::chain::{ChainClient, ModuleCache};
use crate::onchain::FetchError;
use crate::report::{count_by_kind, Issue, IssueKind, ReportBody};

/// Seed addresses must look like this before normalization.
pub const SEED_ADDRESS_PATTERN: &str = r"^0x[0-9a-fA-F]+$";

/// Body of `fetch-scl-report.json`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchReport {
    /// Where the generated SCL was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Distinct valid addresses fetched
    pub addresses: usize,
    /// Seed entries rejected by the address pattern
    pub rejected: Vec<String>,
    /// Modules written
    pub modules: usize,
    /// Functions written
    pub functions: usize,
    /// Failed address fetches
    pub fetch_errors: Vec<FetchError>,
    /// Itemized findings
    pub issues: Vec<Issue>,
}

impl ReportBody for FetchReport {
    fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = count_by_kind(&self.issues);
        counts.insert("addresses".into(), self.addresses);
        counts.insert("rejected".into(), self.rejected.len());
        counts.insert("modules".into(), self.modules);
        counts.insert("functions".into(), self.functions);
        counts.insert("fetchErrors".into(), self.fetch_errors.len());
        counts
    }

    fn issue_count(&self) -> usize { self.issues.len() }
}

/// Builds an SCL document from live module ABIs.
pub struct SclFetcher {
    client: ChainClient,
    chain_id: u64,
    address_pattern: Regex,
}

impl SclFetcher {
    /// Create a fetcher stamping entries with `chain_id`.
    pub fn new(client: ChainClient, chain_id: u64) -> crate::Result<Self> {
        let address_pattern = Regex::new(SEED_ADDRESS_PATTERN)?;
        Ok(Self { client, chain_id, address_pattern })
    }

    /// Valid canonical addresses with their protocol, sorted by address, plus
    /// the rejected raw values. An address seeded by two protocols keeps the
    /// first one in seed order.
    pub fn seed_addresses(&self, seed: &SeedList) -> (BTreeMap<String, String>, Vec<String>) {
        let mut accepted = BTreeMap::new();
        let mut rejected = Vec::new();

        for protocol in &seed.protocols {
            for entry in &protocol.addresses {
                let Some(raw) = entry.address.as_deref().map(str::trim) else { continue };
                if !self.address_pattern.is_match(raw) {
                    rejected.push(raw.to_string());
                    continue;
                }
                accepted.entry(normalize_address(raw)).or_insert_with(|| protocol.name.clone());
            }
        }

        (accepted, rejected)
    }

    /// Fetch every seed address and assemble the list.
    pub async fn fetch(&self, seed: &SeedList) -> (SmartContractList, FetchReport) {
        let (addresses, rejected) = self.seed_addresses(seed);
        let mut report =
            FetchReport { addresses: addresses.len(), rejected, ..Default::default() };

        let keys: BTreeSet<String> = addresses.keys().cloned().collect();
        tracing::info!("fetching modules for {} seed addresses", keys.len());
        let cache = ModuleCache::populate(&self.client, &keys).await;

        for (address, error) in cache.failures() {
            report.issues.push(
                Issue::new(IssueKind::AccountModulesFetchFailed, address).with_detail(error),
            );
            report.fetch_errors.push(FetchError {
                scope: "modules".to_string(),
                address: address.to_string(),
                error: error.to_string(),
            });
        }

        let mut contracts = Vec::new();
        for (address, platform) in &addresses {
            for abi in cache.modules_at(address) {
                contracts.push(self.entry(address, platform, abi));
            }
        }

        report.modules = contracts.len();
        report.functions = contracts.iter().map(|c| c.functions.len()).sum();

        let list = SmartContractList {
            name: Some("Smart Contract List".to_string()),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            version: Some(ListVersion { major: 1, minor: 0, patch: 0 }),
            smart_contracts: contracts,
            extra: Map::new(),
        };
        (list, report)
    }

    fn entry(&self, address: &str, platform: &str, abi: &ModuleAbi) -> SmartContractEntry {
        let mut extensions = Map::new();
        extensions.insert("audited".into(), Value::Bool(false));
        extensions.insert("verified".into(), Value::Bool(true));
        extensions.insert("friends".into(), json!(abi.friends));

        SmartContractEntry {
            chain_id: Some(self.chain_id),
            address: address.to_string(),
            module_name: abi.name.clone(),
            platform: platform.to_string(),
            name: display_name(platform, &abi.name),
            tags: Vec::new(),
            functions: abi
                .exposed_functions
                .iter()
                .map(|f| {
                    let mut extra = Map::new();
                    extra.insert("acquires".into(), json!(f.acquires));
                    extra.insert("audited".into(), Value::Bool(false));
                    extra.insert("verified".into(), Value::Bool(true));
                    extra.insert("auditors".into(), json!([]));
                    FunctionDescriptor {
                        name: f.name.clone(),
                        visibility: f.visibility.clone(),
                        is_entry: f.is_entry,
                        params: f.params.clone(),
                        returns: f.returns.clone(),
                        generic_type_params: f.generic_type_params.clone(),
                        extra,
                    }
                })
                .collect(),
            structs: abi.structs.iter().map(struct_descriptor).collect(),
            extensions,
            extra: Map::new(),
        }
    }
}

fn struct_descriptor(s: &MoveStruct) -> StructDescriptor {
    StructDescriptor {
        name: s.name.clone(),
        abilities: s.abilities.clone(),
        fields: s.fields.clone(),
        is_resource: s.abilities.iter().any(|a| a == "key"),
    }
}

/// `"{platform} {Module Name}"`, title-casing the snake_case module name.
fn display_name(platform: &str, module: &str) -> String {
    let title: Vec<String> = module
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                }
                None => String::new(),
            }
        })
        .collect();
    format!("{} {}", platform, title.join(" ")).trim().to_string()
}
