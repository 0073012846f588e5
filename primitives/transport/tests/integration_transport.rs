//! Consumer-side usage of the shared transport API.

use std::sync::Arc;

use transport::{DynTransport, Transport, TransportError};

struct DummyTransport;

#[async_trait::async_trait]
impl transport::Transport for DummyTransport {
    async fn get(&self, path: &str) -> Result<serde_json::Value, TransportError> {
        if path.contains("missing") {
            Err(TransportError::Status { status: 404, body: "not found".to_string() })
        } else {
            Ok(serde_json::json!([{"name": "coin"}]))
        }
    }

    fn endpoint(&self) -> &str { "dummy://" }
}

#[tokio::test]
async fn consumer_can_call_transport() {
    let t = DummyTransport;
    let v = t.get("/accounts/0x1/modules").await.expect("ok");
    assert_eq!(v[0]["name"], "coin");
}

#[tokio::test]
async fn consumer_sees_status_error() {
    let t: DynTransport = Arc::new(DummyTransport);
    let err = t.get("/accounts/missing/modules").await.expect_err("should err");
    assert!(err.is_not_found());
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        _ => panic!("unexpected error variant"),
    }
    assert_eq!(t.endpoint(), "dummy://");
}
