//! On-Chain Registry Verification
//!
//! Grounds the interaction lists in live chain state: wallet activity is
//! compared with the declared function set, and every declared module and
//! function is looked up in the module ABIs published at its address.

use std::collections::{BTreeMap, BTreeSet};

use registry::InteractionIndex;
use serde::Serialize;
use types::{normalize_address, parse_function_ref, parse_module_ref, FunctionRef, ModuleRef};

use crate::chain::{
    fetch_failure_message, ChainClient, FunctionCheck, FunctionStatus, ModuleCache, ModuleCheck,
};
use crate::report::{count_by_kind, Issue, IssueKind, ReportBody};

/// Entry functions observed in one wallet's recent transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletObservation {
    /// Canonical wallet address
    pub wallet: String,
    /// Transactions inspected
    pub transactions: usize,
    /// Distinct canonical function ids, sorted
    pub functions: Vec<String>,
}

/// Observed functions split by interaction-list coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observed {
    /// Observed and declared
    pub in_il: Vec<String>,
    /// Observed but not declared; a coverage gap, not an error
    pub not_in_il: Vec<String>,
}

/// A failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchError {
    /// `wallet` or `modules`
    pub scope: String,
    /// Canonical address
    pub address: String,
    /// Error message
    pub error: String,
}

/// Body of `verify-report.json`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnchainReport {
    /// REST endpoint queried
    pub endpoint: String,
    /// Per-wallet observations, in configured order
    pub wallets: Vec<WalletObservation>,
    /// Union of observed functions, partitioned
    pub observed: Observed,
    /// Module existence per declared module
    pub modules: Vec<ModuleCheck>,
    /// Entry check per declared function
    pub functions: Vec<FunctionCheck>,
    /// Every failed fetch
    pub fetch_errors: Vec<FetchError>,
    /// Itemized findings
    pub issues: Vec<Issue>,
}

impl ReportBody for OnchainReport {
    fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = count_by_kind(&self.issues);
        counts.insert("wallets".into(), self.wallets.len());
        counts.insert(
            "walletErrors".into(),
            self.fetch_errors.iter().filter(|e| e.scope == "wallet").count(),
        );
        counts.insert("observedInIl".into(), self.observed.in_il.len());
        counts.insert("observedNotInIl".into(), self.observed.not_in_il.len());
        counts.insert("modules".into(), self.modules.len());
        counts.insert("modulesMissing".into(), self.modules.iter().filter(|m| !m.exists).count());
        counts.insert("functions".into(), self.functions.len());
        counts.insert(
            "functionsOk".into(),
            self.functions.iter().filter(|f| f.status == FunctionStatus::Ok).count(),
        );
        counts.insert("fetchErrors".into(), self.fetch_errors.len());
        counts.insert("issues".into(), self.issues.len());
        counts
    }

    fn issue_count(&self) -> usize { self.issues.len() }
}

/// Live-chain verifier
pub struct OnchainVerifier {
    client: ChainClient,
    tx_limit: usize,
}

impl OnchainVerifier {
    /// Create a verifier fetching up to `tx_limit` transactions per wallet
    pub fn new(client: ChainClient, tx_limit: usize) -> Self { Self { client, tx_limit } }

    /// Verify the declared references in `index` and sample `wallets`.
    pub async fn verify(&self, index: &InteractionIndex, wallets: &[String]) -> OnchainReport {
        let mut report =
            OnchainReport { endpoint: self.client.endpoint().to_string(), ..Default::default() };

        let observed = self.observe_wallets(wallets, &mut report).await;
        let (in_il, not_in_il): (Vec<String>, Vec<String>) =
            observed.into_iter().partition(|f| index.functions.contains(f));
        report.observed = Observed { in_il, not_in_il };

        let modules: Vec<ModuleRef> =
            index.modules.iter().filter_map(|id| parse_module_ref(id).ok()).collect();
        let functions: Vec<FunctionRef> =
            index.functions.iter().filter_map(|id| parse_function_ref(id).ok()).collect();

        let addresses: BTreeSet<String> = modules
            .iter()
            .map(|m| m.address.clone())
            .chain(functions.iter().map(|f| f.module.address.clone()))
            .collect();
        tracing::info!("fetching modules for {} addresses", addresses.len());
        let cache = ModuleCache::populate(&self.client, &addresses).await;

        for (address, error) in cache.failures() {
            report.fetch_errors.push(FetchError {
                scope: "modules".to_string(),
                address: address.to_string(),
                error: error.to_string(),
            });
            report.issues.push(
                Issue::new(IssueKind::AccountModulesFetchFailed, address).with_detail(error),
            );
        }

        for module in &modules {
            let check = cache.check_module(module);
            if check.reason.as_deref() == Some("module_not_found") {
                report.issues.push(Issue::new(IssueKind::ModuleNotFound, &check.module));
            }
            report.modules.push(check);
        }

        for function in &functions {
            let check = cache.check_function(function);
            match check.status {
                FunctionStatus::FunctionNotFound => {
                    report.issues.push(Issue::new(IssueKind::FunctionNotFound, &check.function))
                }
                FunctionStatus::NotEntry => {
                    report.issues.push(Issue::new(IssueKind::NotEntry, &check.function))
                }
                // Already itemized per module or per address.
                FunctionStatus::Ok
                | FunctionStatus::ModuleNotFound
                | FunctionStatus::AccountModulesFetchFailed => {}
            }
            report.functions.push(check);
        }

        report
    }

    /// Fetch wallets one after another; a failure is recorded and skipped.
    async fn observe_wallets(
        &self,
        wallets: &[String],
        report: &mut OnchainReport,
    ) -> BTreeSet<String> {
        let mut observed = BTreeSet::new();

        for raw in wallets {
            let wallet = normalize_address(raw);
            if wallet.is_empty() {
                continue;
            }
            match self.client.account_transactions(&wallet, self.tx_limit).await {
                Ok(transactions) => {
                    let functions: BTreeSet<String> = transactions
                        .iter()
                        .filter_map(|tx| tx.entry_function())
                        .map(canonical_function)
                        .collect();
                    tracing::debug!(
                        "wallet {}: {} transactions, {} entry functions",
                        wallet,
                        transactions.len(),
                        functions.len()
                    );
                    observed.extend(functions.iter().cloned());
                    report.wallets.push(WalletObservation {
                        wallet,
                        transactions: transactions.len(),
                        functions: functions.into_iter().collect(),
                    });
                }
                Err(e) => {
                    tracing::warn!("transactions for {} failed: {}", wallet, e);
                    let message = fetch_failure_message(&e);
                    report.issues.push(
                        Issue::new(IssueKind::WalletFetchFailed, &wallet).with_detail(&message),
                    );
                    report.fetch_errors.push(FetchError {
                        scope: "wallet".to_string(),
                        address: wallet,
                        error: message,
                    });
                }
            }
        }

        observed
    }
}

/// Canonical id of an observed entry function; unparseable ids are kept verbatim.
fn canonical_function(raw: &str) -> String {
    parse_function_ref(raw).map(|f| f.id()).unwrap_or_else(|_| raw.trim().to_string())
}
