#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `sclkit-transport`: Chain-node communication layer
//!
//! This crate defines the transport abstraction the on-chain verifier and
//! the SCL fetcher talk through.
//!
//! ## Core Concepts
//!
//! ### `Transport` Trait
//! A read-only REST interface: `get` issues a request for a path relative to
//! the node's base URL and returns the decoded JSON body as a
//! [`serde_json::Value`]. Backends such as `sclkit-http` perform the actual
//! I/O; tests substitute in-memory transports.
//!
//! ### `TransportError`
//! Enumerates the failure classes a caller needs to tell apart. The
//! verifier converts every one of them into a per-item error record rather
//! than aborting a run.
//!
//! ### `DynTransport`
//! A type-erased (`Arc<dyn Transport>`) handle so that clients and tests can
//! operate over any backend without knowing which one is in use.
//!
//! ## Example
//! ```no_run
//! use transport::{DynTransport, TransportError};
//!
//! async fn demo(transport: DynTransport) -> Result<(), TransportError> {
//!     let modules = transport.get("/accounts/0x1/modules").await?;
//!     println!("{} modules", modules.as_array().map(|a| a.len()).unwrap_or(0));
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Type alias for structured error handling in transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Canonical error type for all transport implementations.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// Connection-level failure (refused, DNS, TLS).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The node answered with a non-success status code.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Failure to serialize or deserialize a JSON payload.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response body decoded but does not have the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Any other error not covered by the specific variants above.
    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self { TransportError::Serialization(err.to_string()) }
}

impl TransportError {
    /// Whether the node reported the resource as absent (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}

/// Read-only REST transport to a chain node.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `path` (relative to the base URL, query string included) and
    /// return the decoded JSON body.
    async fn get(&self, path: &str) -> Result<Value>;

    /// Returns the configured base URL or a symbolic name for mocks.
    fn endpoint(&self) -> &str;
}

/// Type alias for a shared, dynamically dispatched transport instance.
///
/// ```
/// use transport::{DynTransport, Transport};
///
/// fn use_transport(t: DynTransport) {
///     println!("Using endpoint: {}", t.endpoint());
/// }
/// ```
pub type DynTransport = Arc<dyn Transport>;

/// Join a base URL and a request path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
