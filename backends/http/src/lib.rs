#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `sclkit-http`: HTTP transport backend
//!
//! A concrete [`transport::Transport`] over [`reqwest::Client`] for the
//! chain nodes' REST API.
//!
//! - Every request is bounded by a client-wide timeout
//! - Non-success statuses become [`TransportError::Status`]
//! - No retries: callers record a failure and move on
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//!
//! use sclkit_http::HttpTransport;
//! use transport::Transport;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = HttpTransport::with_timeout(
//!     "https://full.mainnet.movementinfra.xyz/v1",
//!     Duration::from_secs(15),
//! )
//! .unwrap();
//!
//! let modules = transport.get("/accounts/0x1/modules").await.unwrap();
//! println!("{:#?}", modules);
//! # });
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use transport::{join_url, Transport, TransportError};

/// Request timeout used by [`HttpTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// A concrete implementation of the [`Transport`] trait using HTTP.
///
/// `HttpTransport` performs no schema validation; it returns the decoded
/// body as a [`serde_json::Value`] and normalizes failures into
/// [`TransportError`] variants.
#[derive(Clone)]
pub struct HttpTransport {
    /// The underlying HTTP client used to perform requests.
    client: reqwest::Client,
    /// Base URL of the REST API (e.g. `https://fullnode.mainnet.aptoslabs.com/v1`).
    url: String,
    /// Client-wide request timeout.
    timeout: Duration,
}

impl HttpTransport {
    /// Constructs a transport with [`DEFAULT_TIMEOUT`].
    ///
    /// # Example
    /// ```
    /// use sclkit_http::HttpTransport;
    /// use transport::Transport;
    ///
    /// let transport = HttpTransport::new("http://127.0.0.1:8080/v1").unwrap();
    /// assert_eq!(transport.endpoint(), "http://127.0.0.1:8080/v1");
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Constructs a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns [`TransportError::Other`] if the TLS backend cannot be initialized.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let url_string = url.into();
        logging::trace("HTTP", &format!("→ initializing HTTP transport for {}", url_string));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, url: url_string, timeout })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration { self.timeout }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Issues `GET {base}/{path}` and decodes the JSON body.
    ///
    /// # Errors
    /// - [`TransportError::Timeout`] if the request exceeds the timeout
    /// - [`TransportError::Http`] if the connection fails
    /// - [`TransportError::Status`] for non-2xx responses
    /// - [`TransportError::Serialization`] if the body is not JSON
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let url = join_url(&self.url, path);
        logging::trace("HTTP", &format!("→ GET {}", url));

        let resp = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("HTTP Transport - Request to {} failed: {}", url, e);
            if e.is_timeout() {
                TransportError::Timeout(format!("{} after {:?}", url, self.timeout))
            } else {
                TransportError::Http(e.to_string())
            }
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            tracing::error!("HTTP Transport - Failed to read body: {}", e);
            TransportError::Serialization(e.to_string())
        })?;

        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), body: text });
        }

        serde_json::from_str(&text)
            .map_err(|e| TransportError::Serialization(format!("{} (body: {})", e, text)))
    }

    /// Returns the configured base URL.
    fn endpoint(&self) -> &str { &self.url }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let url = "http://127.0.0.1:8080/v1";
        let transport = HttpTransport::new(url).expect("client builds");

        assert_eq!(transport.url, url);
        assert_eq!(transport.endpoint(), url);
        assert_eq!(transport.timeout(), DEFAULT_TIMEOUT);

        let short = HttpTransport::with_timeout(url, Duration::from_millis(250))
            .expect("client builds");
        assert_eq!(short.timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_get_unreachable() {
        // Port 9 (discard) is not expected to run an HTTP server.
        let transport = HttpTransport::with_timeout("http://127.0.0.1:9/v1", Duration::from_secs(2))
            .expect("client builds");
        let result = transport.get("/accounts/0x1/modules").await;

        match result {
            Err(TransportError::Http(_)) | Err(TransportError::Timeout(_)) => {}
            other => panic!("expected connection failure, got {:?}", other),
        }
    }
}
