//! Production transport implementation using reqwest.

use super::{Exchange, RawResponse, Transport, TransportError};

/// Production transport backed by `reqwest::Client`.
///
/// This is a thin wrapper that implements the [`Transport`] trait. It
/// inherits reqwest's connection pooling and rustls TLS; pooled connections
/// are checked back in or torn down by reqwest on every exit path, including
/// cancellation.
///
/// # Example
///
/// ```no_run
/// use webclient::web::{ReqwestTransport, WebClient};
///
/// let client = WebClient::with_transport(ReqwestTransport::new());
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates a transport from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (proxies, TLS, pool
    /// limits, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    async fn exchange(&self, request: &Exchange) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .inner
            .request(request.method.clone(), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_builder() {
                TransportError::InvalidUrl(e.to_string())
            } else if e.is_decode() {
                TransportError::Protocol(e.to_string())
            } else {
                TransportError::Connection(Box::new(e))
            }
        })?;

        let version = response.version();
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Connection(Box::new(e))
                }
            })?
            .to_vec();

        Ok(RawResponse {
            version,
            status,
            headers,
            body,
        })
    }
}
