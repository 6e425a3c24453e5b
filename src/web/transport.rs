//! Exchange descriptor, raw response, and the transport trait.

use std::time::Duration;

use crate::headers::CaseInsensitiveMap;

use super::TransportError;

/// The frozen, immutable snapshot of one request used to perform one
/// network call.
///
/// A terminal send operation freezes the builder's configuration into an
/// `Exchange` and hands it to the dispatcher; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// HTTP method.
    pub method: http::Method,
    /// Absolute target: scheme, host, port, substituted path, query string.
    pub url: url::Url,
    /// Outbound headers.
    pub headers: CaseInsensitiveMap,
    /// Outbound body bytes, if any.
    pub body: Option<Vec<u8>>,
    /// Deadline for the whole exchange. `None` disables the check entirely.
    pub deadline: Option<Duration>,
}

/// The untyped result of one completed exchange.
///
/// Header pairs are kept in wire occurrence order with duplicates intact so
/// the response wrapper can extract every `Set-Cookie` value in order before
/// collapsing the rest into a case-insensitive map.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Protocol version of the response.
    pub version: http::Version,
    /// Status code.
    pub status: http::StatusCode,
    /// Raw header pairs in occurrence order, duplicates preserved.
    pub headers: Vec<(String, String)>,
    /// Response body, fully buffered. Empty for bodyless responses.
    pub body: Vec<u8>,
}

/// Trait for performing one HTTP exchange.
///
/// # Design
///
/// This trait abstracts the network transport, enabling:
/// - Dependency injection for testing with mock transports
/// - Swapping HTTP libraries without changing calling code
/// - Adding cross-cutting concerns (logging, metrics) via decorators
///
/// Connection management, TLS, and redirect policy are the implementation's
/// concern. A transport may serve many concurrent exchanges; dropping the
/// returned future must abort the underlying I/O without leaking a pooled
/// connection.
///
/// # Example
///
/// ```ignore
/// use webclient::web::{Transport, Exchange, RawResponse, TransportError};
///
/// struct MockTransport {
///     response: RawResponse,
/// }
///
/// impl Transport for MockTransport {
///     async fn exchange(&self, _req: &Exchange) -> Result<RawResponse, TransportError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Performs one exchange and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when:
    /// - The target cannot be reached ([`TransportError::Connection`])
    /// - The response is not valid HTTP ([`TransportError::Protocol`])
    /// - The transport's own deadline elapses ([`TransportError::Timeout`])
    /// - The URL cannot be used ([`TransportError::InvalidUrl`])
    fn exchange(
        &self,
        request: &Exchange,
    ) -> impl std::future::Future<Output = Result<RawResponse, TransportError>> + Send;
}
