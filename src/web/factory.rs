//! Client factory producing pre-seeded request builders.

use std::sync::Arc;

use crate::codec::Json;

use super::dispatch::Dispatcher;
use super::{HttpRequest, ReqwestTransport, RequestOptions, Transport};

/// Shared state behind a [`WebClient`]: the dispatcher wrapping the
/// transport.
#[derive(Debug)]
pub(crate) struct ClientInner<C> {
    pub(crate) dispatcher: Dispatcher<C>,
}

/// Factory for HTTP requests.
///
/// A `WebClient` seeds every request builder with its default target
/// ([`RequestOptions`]) and JSON configuration. Cloning is cheap; clones
/// share the same transport, while each clone carries its own copy of the
/// configuration and can be reconfigured independently.
///
/// The default response codec is the raw-bytes codec; swap it per request
/// with [`HttpRequest::decode_as`].
///
/// # Example
///
/// ```no_run
/// use webclient::web::{RequestOptions, WebClient};
///
/// # async fn example() -> Result<(), webclient::web::Error> {
/// let client = WebClient::new().with_defaults(
///     RequestOptions::new()
///         .with_host("api.example.com")
///         .with_port(443)
///         .with_ssl(true),
/// );
///
/// let response = client.get("/v1/status").send().await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WebClient<C = ReqwestTransport> {
    inner: Arc<ClientInner<C>>,
    defaults: RequestOptions,
    json: Json,
}

impl<C> Clone for WebClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            defaults: self.defaults.clone(),
            json: self.json,
        }
    }
}

impl WebClient<ReqwestTransport> {
    /// Creates a client with the reqwest transport, default request options,
    /// and compact JSON output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }
}

impl Default for WebClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> WebClient<C> {
    /// Creates a client over the given transport.
    #[must_use]
    pub fn with_transport(transport: C) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                dispatcher: Dispatcher::new(transport),
            }),
            defaults: RequestOptions::default(),
            json: Json::new(),
        }
    }

    /// Replaces the default request options.
    ///
    /// Only this client is affected; clones made earlier keep their own
    /// configuration.
    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replaces the JSON configuration used for outbound bodies.
    ///
    /// Only this client is affected; clones made earlier keep their own
    /// configuration.
    #[must_use]
    pub fn with_json(mut self, json: Json) -> Self {
        self.json = json;
        self
    }

    /// Returns the default request options.
    #[must_use]
    pub fn default_options(&self) -> &RequestOptions {
        &self.defaults
    }
}

impl<C: Transport> WebClient<C> {
    /// Creates a request with the given method and relative URI, using the
    /// client's default host and port.
    #[must_use]
    pub fn request(&self, method: http::Method, uri: &str) -> HttpRequest<Vec<u8>, C> {
        HttpRequest::new(
            Arc::clone(&self.inner),
            self.json,
            method,
            self.defaults.ssl,
            self.defaults.host.clone(),
            self.defaults.port,
            uri,
        )
    }

    /// Creates a request from explicit target options.
    #[must_use]
    pub fn request_with(
        &self,
        method: http::Method,
        options: &RequestOptions,
    ) -> HttpRequest<Vec<u8>, C> {
        HttpRequest::new(
            Arc::clone(&self.inner),
            self.json,
            method,
            options.ssl,
            options.host.clone(),
            options.port,
            options.uri.clone(),
        )
    }

    /// Creates a request addressed by an absolute URI.
    ///
    /// An unparseable or non-HTTP URI is recorded as a builder error and
    /// surfaced by the terminal send, keeping the factory fluent.
    #[must_use]
    pub fn request_abs(&self, method: http::Method, absolute_uri: &str) -> HttpRequest<Vec<u8>, C> {
        match parse_absolute(absolute_uri) {
            Ok(options) => self.request_with(method, &options),
            Err(reason) => {
                let mut request = self.request(method, "");
                request.record_invalid_url(reason);
                request
            }
        }
    }

    /// Creates a GET request to the default host and port.
    #[must_use]
    pub fn get(&self, uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request(http::Method::GET, uri)
    }

    /// Creates a GET request from an absolute URI.
    #[must_use]
    pub fn get_abs(&self, absolute_uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request_abs(http::Method::GET, absolute_uri)
    }

    /// Creates a POST request to the default host and port.
    #[must_use]
    pub fn post(&self, uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request(http::Method::POST, uri)
    }

    /// Creates a POST request from an absolute URI.
    #[must_use]
    pub fn post_abs(&self, absolute_uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request_abs(http::Method::POST, absolute_uri)
    }

    /// Creates a PUT request to the default host and port.
    #[must_use]
    pub fn put(&self, uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request(http::Method::PUT, uri)
    }

    /// Creates a PUT request from an absolute URI.
    #[must_use]
    pub fn put_abs(&self, absolute_uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request_abs(http::Method::PUT, absolute_uri)
    }

    /// Creates a DELETE request to the default host and port.
    #[must_use]
    pub fn delete(&self, uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request(http::Method::DELETE, uri)
    }

    /// Creates a DELETE request from an absolute URI.
    #[must_use]
    pub fn delete_abs(&self, absolute_uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request_abs(http::Method::DELETE, absolute_uri)
    }

    /// Creates a PATCH request to the default host and port.
    #[must_use]
    pub fn patch(&self, uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request(http::Method::PATCH, uri)
    }

    /// Creates a PATCH request from an absolute URI.
    #[must_use]
    pub fn patch_abs(&self, absolute_uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request_abs(http::Method::PATCH, absolute_uri)
    }

    /// Creates a HEAD request to the default host and port.
    #[must_use]
    pub fn head(&self, uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request(http::Method::HEAD, uri)
    }

    /// Creates a HEAD request from an absolute URI.
    #[must_use]
    pub fn head_abs(&self, absolute_uri: &str) -> HttpRequest<Vec<u8>, C> {
        self.request_abs(http::Method::HEAD, absolute_uri)
    }
}

/// Splits an absolute HTTP(S) URI into request options.
fn parse_absolute(absolute_uri: &str) -> Result<RequestOptions, String> {
    let url = url::Url::parse(absolute_uri).map_err(|e| format!("{absolute_uri:?}: {e}"))?;

    let ssl = match url.scheme() {
        "http" => false,
        "https" => true,
        other => return Err(format!("{absolute_uri:?}: unsupported scheme {other:?}")),
    };
    let host = url
        .host_str()
        .ok_or_else(|| format!("{absolute_uri:?}: missing host"))?
        .to_string();
    let port = url
        .port_or_known_default()
        .ok_or_else(|| format!("{absolute_uri:?}: missing port"))?;

    let uri = match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    };

    Ok(RequestOptions {
        host,
        port,
        ssl,
        uri,
    })
}
