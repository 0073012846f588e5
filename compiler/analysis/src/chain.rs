//! Typed access to the chain node's account endpoints, and the per-address
//! module cache the verifier and fetcher share.

use std::collections::{BTreeMap, BTreeSet};

use documents::{AccountModule, ModuleAbi, Transaction};
use futures::future::join_all;
use serde::Serialize;
use transport::{DynTransport, TransportError};
use types::{FunctionRef, ModuleRef};

/// Client for `GET /accounts/{address}/...`.
#[derive(Clone)]
pub struct ChainClient {
    transport: DynTransport,
}

impl ChainClient {
    /// Wrap a transport.
    pub fn new(transport: DynTransport) -> Self { Self { transport } }

    /// Base URL of the underlying transport.
    pub fn endpoint(&self) -> &str { self.transport.endpoint() }

    /// Module ABIs published at `address`. Modules without an ABI are dropped.
    pub async fn account_modules(&self, address: &str) -> Result<Vec<ModuleAbi>, TransportError> {
        let value = self.transport.get(&format!("/accounts/{}/modules", address)).await?;
        let modules: Vec<AccountModule> = decode(value)?;
        Ok(modules.into_iter().filter_map(AccountModule::into_abi).collect())
    }

    /// The most recent `limit` transactions sent by `address`.
    pub async fn account_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, TransportError> {
        let value = self
            .transport
            .get(&format!("/accounts/{}/transactions?limit={}", address, limit))
            .await?;
        decode(value)
    }
}

/// Decode a JSON body that arrived intact but may not have the expected shape.
fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|e| TransportError::InvalidFormat(e.to_string()))
}

/// Message recorded for a failed account fetch. A 404 means the node does
/// not know the account at all.
pub fn fetch_failure_message(error: &TransportError) -> String {
    if error.is_not_found() {
        format!("account not found: {}", error)
    } else {
        error.to_string()
    }
}

/// Outcome of a module existence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleCheck {
    /// Canonical module id
    pub module: String,
    /// Whether the module is published
    pub exists: bool,
    /// `module_not_found` or `account_modules_fetch_failed` when `exists` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Per-function verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionStatus {
    /// Present and an entry function
    Ok,
    /// The module is not published
    ModuleNotFound,
    /// The module does not expose the function
    FunctionNotFound,
    /// Present but not an entry function
    NotEntry,
    /// The address's modules could not be fetched
    AccountModulesFetchFailed,
}

/// Outcome of a function entry check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCheck {
    /// Canonical function id
    pub function: String,
    /// Verification status
    pub status: FunctionStatus,
}

/// Module ABIs per canonical address, fetched once per run.
///
/// A failed fetch is stored as its error message and never retried.
#[derive(Debug, Clone, Default)]
pub struct ModuleCache {
    entries: BTreeMap<String, Result<BTreeMap<String, ModuleAbi>, String>>,
}

impl ModuleCache {
    /// Fetch the module list of every address concurrently.
    pub async fn populate(client: &ChainClient, addresses: &BTreeSet<String>) -> Self {
        let fetches = addresses.iter().map(|address| async move {
            let result = client.account_modules(address).await.map_err(|e| {
                tracing::warn!("module fetch for {} failed: {}", address, e);
                fetch_failure_message(&e)
            });
            (address.clone(), result)
        });

        let mut cache = Self::default();
        for (address, result) in join_all(fetches).await {
            cache.insert(address, result);
        }
        cache
    }

    /// Record the fetch result for `address`.
    pub fn insert(&mut self, address: String, result: Result<Vec<ModuleAbi>, String>) {
        let entry =
            result.map(|modules| modules.into_iter().map(|m| (m.name.clone(), m)).collect());
        self.entries.insert(address, entry);
    }

    /// Addresses whose fetch failed, with the error.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(a, r)| r.as_ref().err().map(|e| (a.as_str(), e.as_str())))
    }

    /// Modules fetched for `address`, sorted by name. Empty when the fetch failed.
    pub fn modules_at(&self, address: &str) -> impl Iterator<Item = &ModuleAbi> {
        self.entries.get(address).and_then(|r| r.as_ref().ok()).into_iter().flat_map(|m| m.values())
    }

    /// The ABI of `module`, or the reason it is unavailable.
    pub fn module(&self, module: &ModuleRef) -> Result<&ModuleAbi, FunctionStatus> {
        match self.entries.get(&module.address) {
            Some(Ok(modules)) => modules.get(&module.name).ok_or(FunctionStatus::ModuleNotFound),
            Some(Err(_)) | None => Err(FunctionStatus::AccountModulesFetchFailed),
        }
    }

    /// Check whether `module` is published.
    pub fn check_module(&self, module: &ModuleRef) -> ModuleCheck {
        let reason = match self.module(module) {
            Ok(_) => None,
            Err(FunctionStatus::ModuleNotFound) => Some("module_not_found"),
            Err(_) => Some("account_modules_fetch_failed"),
        };
        ModuleCheck {
            module: module.id(),
            exists: reason.is_none(),
            reason: reason.map(str::to_string),
        }
    }

    /// Check whether `function` is exposed as an entry function.
    pub fn check_function(&self, function: &FunctionRef) -> FunctionCheck {
        let status = match self.module(&function.module) {
            Err(status) => status,
            Ok(abi) => match abi.exposed_functions.iter().find(|f| f.name == function.name) {
                None => FunctionStatus::FunctionNotFound,
                Some(f) if !f.is_entry => FunctionStatus::NotEntry,
                Some(_) => FunctionStatus::Ok,
            },
        };
        FunctionCheck { function: function.id(), status }
    }
}
