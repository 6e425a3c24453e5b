//! Fluent request builder and terminal send operations.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::codec::{BodyCodec, Json};
use crate::headers::{CaseInsensitiveMap, InvalidKeyError};

use super::factory::ClientInner;
use super::{Error, Exchange, HttpResponse, ReqwestTransport, Transport};

/// A builder-level error recorded by a fluent setter.
///
/// Fluent setters cannot return `Result` without breaking chaining, so the
/// first configuration error is held here and surfaced by the terminal send
/// before any network I/O.
#[derive(Debug, Clone)]
pub(crate) enum Deferred {
    InvalidKey(InvalidKeyError),
    InvalidUrl(String),
}

impl From<Deferred> for Error {
    fn from(deferred: Deferred) -> Self {
        match deferred {
            Deferred::InvalidKey(e) => Self::InvalidKey(e),
            Deferred::InvalidUrl(reason) => Self::InvalidUrl(reason),
        }
    }
}

/// One outbound HTTP request under construction.
///
/// Created by a [`WebClient`](super::WebClient) pre-seeded with its default
/// method, host, port, and URI. Fluent setters consume and return the
/// builder; [`decode_as`](Self::decode_as) instead borrows it and forks a
/// deep copy bound to a different result type, so the original stays usable.
/// Terminal operations consume the builder, which makes reuse after send a
/// compile error rather than a runtime one.
///
/// The URI is a path template: `{name}` segments are substituted from the
/// path parameters (matched case-insensitively) and percent-encoded when the
/// target URL is assembled.
///
/// # Example
///
/// ```no_run
/// use webclient::codec::BodyCodec;
/// use webclient::web::WebClient;
///
/// # async fn example() -> Result<(), webclient::web::Error> {
/// let client = WebClient::new();
/// let response = client
///     .get("/v1/items/{id}")
///     .host("api.example.com")
///     .port(443)
///     .ssl(true)
///     .add_path_param("id", "42")
///     .add_query_param("limit", "10")
///     .decode_as(BodyCodec::json_object())
///     .send()
///     .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpRequest<T, C = ReqwestTransport> {
    client: Arc<ClientInner<C>>,
    json: Json,
    method: http::Method,
    ssl: bool,
    host: String,
    port: u16,
    uri: String,
    headers: CaseInsensitiveMap,
    query_params: CaseInsensitiveMap,
    path_params: CaseInsensitiveMap,
    timeout_ms: i64,
    codec: BodyCodec<T>,
    deferred: Option<Deferred>,
}

impl<C> HttpRequest<Vec<u8>, C> {
    /// Seeds a builder with the raw-bytes codec and the given target.
    pub(crate) fn new(
        client: Arc<ClientInner<C>>,
        json: Json,
        method: http::Method,
        ssl: bool,
        host: impl Into<String>,
        port: u16,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            client,
            json,
            method,
            ssl,
            host: host.into(),
            port,
            uri: uri.into(),
            headers: CaseInsensitiveMap::new(),
            query_params: CaseInsensitiveMap::new(),
            path_params: CaseInsensitiveMap::new(),
            timeout_ms: -1,
            codec: BodyCodec::buffer(),
            deferred: None,
        }
    }
}

impl<T, C> HttpRequest<T, C> {
    /// Records the first builder-level configuration error.
    fn record(&mut self, deferred: Deferred) {
        if self.deferred.is_none() {
            self.deferred = Some(deferred);
        }
    }

    pub(crate) fn record_invalid_url(&mut self, reason: impl Into<String>) {
        self.record(Deferred::InvalidUrl(reason.into()));
    }

    /// Configures the request to use a new method.
    #[must_use]
    pub fn method(mut self, value: http::Method) -> Self {
        self.method = value;
        self
    }

    /// Configures the request to use a new host.
    #[must_use]
    pub fn host(mut self, value: impl Into<String>) -> Self {
        self.host = value.into();
        self
    }

    /// Configures the request to use a new port.
    #[must_use]
    pub fn port(mut self, value: u16) -> Self {
        self.port = value;
        self
    }

    /// Configures whether the exchange is TLS-wrapped (`https`).
    #[must_use]
    pub fn ssl(mut self, value: bool) -> Self {
        self.ssl = value;
        self
    }

    /// Configures the request to use a new URI template.
    #[must_use]
    pub fn uri(mut self, value: impl Into<String>) -> Self {
        self.uri = value.into();
        self
    }

    /// Configures the exchange deadline in milliseconds.
    ///
    /// If no response arrives within the deadline the send fails with
    /// [`Error::Timeout`]. Zero or a negative value disables the deadline
    /// entirely.
    #[must_use]
    pub fn timeout(mut self, millis: i64) -> Self {
        self.timeout_ms = millis;
        self
    }

    /// Adds or replaces an HTTP header.
    ///
    /// An empty or blank name is a configuration error surfaced by the
    /// terminal send, before any network I/O.
    #[must_use]
    pub fn put_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        if let Err(e) = self.headers.insert(name, value) {
            self.record(Deferred::InvalidKey(e));
        }
        self
    }

    /// Adds or replaces many HTTP headers.
    #[must_use]
    pub fn put_headers<K, V, I>(mut self, headers: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        if let Err(e) = self.headers.try_extend(headers) {
            self.record(Deferred::InvalidKey(e));
        }
        self
    }

    /// Adds or replaces a query parameter.
    #[must_use]
    pub fn add_query_param(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        if let Err(e) = self.query_params.insert(name, value) {
            self.record(Deferred::InvalidKey(e));
        }
        self
    }

    /// Adds or replaces many query parameters.
    #[must_use]
    pub fn add_query_params<K, V, I>(mut self, params: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        if let Err(e) = self.query_params.try_extend(params) {
            self.record(Deferred::InvalidKey(e));
        }
        self
    }

    /// Adds or replaces a path parameter, substituted into the URI template
    /// by name.
    #[must_use]
    pub fn add_path_param(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        if let Err(e) = self.path_params.insert(name, value) {
            self.record(Deferred::InvalidKey(e));
        }
        self
    }

    /// Adds or replaces many path parameters.
    #[must_use]
    pub fn add_path_params<K, V, I>(mut self, params: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        if let Err(e) = self.path_params.try_extend(params) {
            self.record(Deferred::InvalidKey(e));
        }
        self
    }

    /// Forks this request with a different response codec.
    ///
    /// Returns a new builder whose declared result type is `U`, sharing all
    /// other configuration through a deep copy. The original builder remains
    /// independently usable, so one configured request can be forked for
    /// concurrent sends with different decodings.
    #[must_use]
    pub fn decode_as<U>(&self, codec: BodyCodec<U>) -> HttpRequest<U, C> {
        HttpRequest {
            client: Arc::clone(&self.client),
            json: self.json,
            method: self.method.clone(),
            ssl: self.ssl,
            host: self.host.clone(),
            port: self.port,
            uri: self.uri.clone(),
            headers: self.headers.clone(),
            query_params: self.query_params.clone(),
            path_params: self.path_params.clone(),
            timeout_ms: self.timeout_ms,
            codec,
            deferred: self.deferred.clone(),
        }
    }

    /// Substitutes path parameters into one segment of the URI template.
    ///
    /// `{name}` tokens with no matching parameter are left verbatim. The
    /// substituted value is raw text; percent-encoding happens when the
    /// segment is appended to the URL.
    fn substituted(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                // Unterminated token, keep the tail as-is
                out.push('{');
                rest = after;
                break;
            };
            let name = &after[..end];
            match self.path_params.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }

    /// Assembles the absolute target URL.
    ///
    /// The URI template is split into its path and inline query parts
    /// before any substitution, so a parameter value containing `?` or `/`
    /// stays percent-encoded inside its path segment instead of leaking
    /// into the query string or spanning segments. Percent-encoding of
    /// segments and appended query pairs is handled by the `url` crate.
    fn build_url(&self) -> Result<url::Url, Error> {
        let scheme = if self.ssl { "https" } else { "http" };
        let base = format!("{scheme}://{}:{}/", self.host, self.port);
        let mut url = url::Url::parse(&base)
            .map_err(|e| Error::InvalidUrl(format!("cannot address {base:?}: {e}")))?;

        let (path_template, inline_query) = match self.uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.uri.as_str(), None),
        };

        if !path_template.is_empty() {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidUrl(format!("cannot address {base:?}")))?;
            segments.clear();
            for segment in path_template.trim_start_matches('/').split('/') {
                segments.push(&self.substituted(segment));
            }
        }
        if let Some(query) = inline_query {
            url.set_query(Some(query));
        }
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query_params {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    /// Freezes the configuration into an immutable exchange descriptor.
    fn freeze(self, body: Option<Vec<u8>>) -> Result<Exchange, Error> {
        let url = self.build_url()?;
        let deadline = if self.timeout_ms > 0 {
            u64::try_from(self.timeout_ms).ok().map(Duration::from_millis)
        } else {
            None
        };

        Ok(Exchange {
            method: self.method,
            url,
            headers: self.headers,
            body,
            deadline,
        })
    }
}

impl<T, C: Transport> HttpRequest<T, C> {
    /// Sends the request without a body.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for builder configuration problems (surfaced before
    /// any network I/O), transport failures, deadline expiry, or a response
    /// body that does not match the selected codec.
    pub async fn send(self) -> Result<HttpResponse<T>, Error> {
        self.dispatch(None).await
    }

    /// Sends the request with a raw byte body.
    ///
    /// No `Content-Type` is implied; set one with
    /// [`put_header`](Self::put_header) if the server needs it.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_buffer(self, body: Vec<u8>) -> Result<HttpResponse<T>, Error> {
        self.dispatch(Some(body)).await
    }

    /// Sends the request with a body encoded as JSON and the content type
    /// set to `application/json`.
    ///
    /// Accepts anything serializable, including `serde_json::Value` for
    /// free-form documents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the body cannot be serialized (before
    /// any network I/O); otherwise see [`send`](Self::send).
    pub async fn send_json<B: Serialize + ?Sized>(
        mut self,
        body: &B,
    ) -> Result<HttpResponse<T>, Error> {
        let bytes = self.json.encode(body)?;
        self.headers
            .insert(http::header::CONTENT_TYPE.as_str(), "application/json")?;
        self.dispatch(Some(bytes)).await
    }

    /// Sends the request with a body encoded as a URL-encoded form and the
    /// content type set to `application/x-www-form-urlencoded`.
    ///
    /// When the content type header was previously set to
    /// `multipart/form-data` it is left untouched instead.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_form<K, V, I>(mut self, form: I) -> Result<HttpResponse<T>, Error>
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let content_type = http::header::CONTENT_TYPE.as_str();
        let multipart = self.headers.get(content_type).is_some_and(|value| {
            value
                .trim()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        });
        if !multipart {
            self.headers
                .insert(content_type, "application/x-www-form-urlencoded")?;
        }

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in form {
            serializer.append_pair(name.as_ref(), value.as_ref());
        }
        let body = serializer.finish().into_bytes();

        self.dispatch(Some(body)).await
    }

    /// Surfaces any deferred builder error, freezes the exchange, and hands
    /// it to the dispatcher.
    async fn dispatch(mut self, body: Option<Vec<u8>>) -> Result<HttpResponse<T>, Error> {
        if let Some(deferred) = self.deferred.take() {
            return Err(deferred.into());
        }

        let codec = self.codec.clone();
        let client = Arc::clone(&self.client);
        let exchange = self.freeze(body)?;
        client.dispatcher.dispatch(exchange, &codec).await
    }
}
