#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use documents::{InteractionListDocument, SmartContractList};
use registry::{LoadedDocument, LoadedInteractionLists, SclIndex};
use serde_json::Value;
use transport::{DynTransport, Transport, TransportError};

pub fn scl(value: Value) -> SclIndex {
    let list: SmartContractList = serde_json::from_value(value).expect("valid SCL");
    SclIndex::from_list(&list)
}

pub fn doc(token: &str, value: Value) -> LoadedDocument {
    let document: InteractionListDocument = serde_json::from_value(value).expect("valid IL");
    LoadedDocument::new(format!("{}.json", token.to_lowercase()), document)
}

pub fn lists(docs: Vec<LoadedDocument>) -> LoadedInteractionLists {
    LoadedInteractionLists { documents: docs, errors: Vec::new() }
}

/// In-memory transport answering from a path → response table.
/// Unknown paths answer 404.
#[derive(Default)]
pub struct MockTransport {
    responses: BTreeMap<String, Result<Value, u16>>,
    pub requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self { Self::default() }

    pub fn ok(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Ok(body));
        self
    }

    pub fn status(mut self, path: &str, status: u16) -> Self {
        self.responses.insert(path.to_string(), Err(status));
        self
    }

    pub fn shared(self) -> Arc<Self> { Arc::new(self) }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests.lock().expect("lock").iter().filter(|p| p.as_str() == path).count()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.requests.lock().expect("lock").push(path.to_string());
        match self.responses.get(path) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => {
                Err(TransportError::Status { status: *status, body: "mock".to_string() })
            }
            None => Err(TransportError::Status { status: 404, body: "not found".to_string() }),
        }
    }

    fn endpoint(&self) -> &str { "mock://node/v1" }
}

pub fn dyn_transport(mock: Arc<MockTransport>) -> DynTransport { mock }

/// `0x` + 64 hex digits for a short address.
pub fn addr(short: &str) -> String { types::normalize_address(short) }
